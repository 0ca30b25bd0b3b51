#![forbid(unsafe_code)]

//! Observable state container with lens cursors and snapshot history.
//!
//! This crate provides a small set of composable primitives for holding
//! application state as a single source of truth:
//!
//! - [`Observable`]: the capability contract — read, replace, subscribe.
//! - [`Atom`]: root store owning the canonical state value; replacement is
//!   whole-state and atomic, subscribers see `(previous, new)`.
//! - [`Cursor`]: an observable *view* of one field of a parent observable
//!   through a [`Lens`]; reads and writes round-trip through the parent.
//! - [`History`]: append-only log of every value an observable has held,
//!   with restore-by-index for time travel.
//! - [`lens!`]: compile-time builder for typed field-path accessors.
//!
//! # Architecture
//!
//! All types use `Rc<RefCell<..>>` for single-threaded shared ownership;
//! handles are cheap clones aliasing the same inner state, and nothing here
//! is `Send`. Notification is synchronous and in registration order.
//! Subscriber callbacks are stored as `Weak` function pointers kept alive by
//! [`Subscription`] RAII guards, and pruned lazily during notification.
//!
//! There is no ambient or global store: every atom, cursor, and history is
//! an explicit value passed by the caller.
//!
//! # Example
//!
//! ```
//! use atomlens::{lens, Atom, History, Observable, ObservableExt};
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     count: i32,
//!     name: String,
//! }
//!
//! let atom = Atom::new(AppState::default());
//! let history = History::new(&atom);
//!
//! let count = atom.cursor(lens!(AppState => count));
//! count.set(1);
//! atom.update(|state| state.count += 1);
//!
//! assert_eq!(atom.get().count, 2);
//! assert_eq!(history.len(), 3);
//!
//! history.restore(0).unwrap();
//! assert_eq!(atom.get().count, 0);
//! ```

pub mod atom;
pub mod cursor;
pub mod history;
pub mod lens;
pub mod observable;

pub use atom::Atom;
pub use cursor::{Cursor, NotifyPolicy, ObservableExt};
pub use history::{History, HistoryError};
pub use lens::Lens;
pub use observable::{ChangeCallback, Observable, Subscription};
