#![forbid(unsafe_code)]

//! Root state store with change notification and version tracking.
//!
//! # Design
//!
//! [`Atom<S>`] owns the canonical state value in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). Cloning an `Atom` creates a new handle to the
//! **same** inner state — both handles see the same value and share
//! subscribers. Alongside the current value it retains the value immediately
//! before the last replacement, which is what subscribers receive as the
//! `previous` argument.
//!
//! # Re-entrancy
//!
//! A subscriber callback may call `set` on the atom it is being notified
//! from. Such re-entrant writes are **queued** and applied after the current
//! notification pass completes, in FIFO order, each with its own full
//! notification pass. Notification passes therefore never interleave, and
//! `set` never fails.
//!
//! # Invariants
//!
//! 1. `version` increments by exactly 1 on each `set`, including a `set`
//!    carrying an unchanged value.
//! 2. `previous()` equals the value before the most recent `set` (the
//!    initial value before any `set`).
//! 3. Subscribers are notified in registration order; a subscriber added
//!    during a pass is first called on the next `set`.
//! 4. Dead subscribers (dropped [`Subscription`] guards) are pruned lazily.
//!
//! # Performance
//!
//! | Operation     | Complexity                  |
//! |---------------|-----------------------------|
//! | `get()`       | O(clone of S)               |
//! | `set()`       | O(S_subs) callback fan-out  |
//! | `subscribe()` | O(1) amortized              |

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::trace;

use crate::observable::{ChangeCallback, Observable, SubscriberSet, Subscription};

/// Shared interior for [`Atom<S>`].
struct AtomInner<S> {
    value: S,
    /// Value immediately before the last `set`.
    previous: S,
    /// Bumped once per `set`.
    version: u64,
    subscribers: SubscriberSet<S>,
    /// True while a notification pass is running on this atom.
    notifying: bool,
    /// Writes issued re-entrantly from subscriber callbacks, applied FIFO
    /// after the current pass.
    pending: VecDeque<S>,
}

/// Root observable store holding one canonical state value.
///
/// The whole value is replaced atomically via [`set`](Observable::set) or
/// [`update`](Observable::update); focused access to sub-fields goes through
/// [`Cursor`](crate::Cursor).
pub struct Atom<S> {
    inner: Rc<RefCell<AtomInner<S>>>,
}

// Manual Clone: shares the same Rc.
impl<S> Clone for Atom<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: std::fmt::Debug + 'static> std::fmt::Debug for Atom<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Atom")
            .field("value", &inner.value)
            .field("previous", &inner.previous)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<S: Clone + 'static> Atom<S> {
    /// Create a new atom with the given initial value.
    ///
    /// `previous()` reports the initial value until the first `set`.
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self {
            inner: Rc::new(RefCell::new(AtomInner {
                previous: initial.clone(),
                value: initial,
                version: 0,
                subscribers: SubscriberSet::new(),
                notifying: false,
                pending: VecDeque::new(),
            })),
        }
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// The value immediately before the last `set` (the initial value if no
    /// `set` has happened yet).
    #[must_use]
    pub fn previous(&self) -> S {
        self.inner.borrow().previous.clone()
    }

    /// Number of `set` calls applied so far. Useful for dirty-checking.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Apply one replacement and run its notification pass.
    ///
    /// Callbacks run outside any interior borrow, so they may freely call
    /// `get`, `subscribe`, or (queued) `set` on this atom.
    fn apply(&self, value: S) {
        let (previous, current, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            let previous = std::mem::replace(&mut inner.value, value);
            inner.previous = previous.clone();
            inner.version += 1;
            let callbacks = inner.subscribers.live();
            trace!(
                version = inner.version,
                subscribers = callbacks.len(),
                "atom value replaced"
            );
            (previous, inner.value.clone(), callbacks)
        };
        for cb in &callbacks {
            cb(&previous, &current);
        }
    }
}

impl<S: Clone + 'static> Observable<S> for Atom<S> {
    fn get(&self) -> S {
        self.inner.borrow().value.clone()
    }

    fn set(&self, value: S) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.notifying {
                // Re-entrant write from a subscriber callback: defer.
                inner.pending.push_back(value);
                return;
            }
            inner.notifying = true;
        }
        self.apply(value);
        loop {
            let next = self.inner.borrow_mut().pending.pop_front();
            match next {
                Some(deferred) => self.apply(deferred),
                None => break,
            }
        }
        self.inner.borrow_mut().notifying = false;
    }

    fn subscribe_boxed(&self, callback: ChangeCallback<S>) -> Subscription {
        self.inner.borrow_mut().subscribers.register(callback)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
