#![forbid(unsafe_code)]

//! Capability contract for observable values plus subscription plumbing.
//!
//! # Design
//!
//! [`Observable<T>`] is the single capability shared by the root store
//! ([`Atom`](crate::Atom)) and the derived view ([`Cursor`](crate::Cursor)):
//! read the current value, replace it wholesale, and register change
//! callbacks. Composition over hierarchy — a `Cursor` holds an `Observable`
//! handle rather than inheriting from one.
//!
//! Subscriber callbacks receive `(previous, new)` by reference on every
//! replacement. They are stored as `Weak` function pointers; the strong `Rc`
//! lives inside the [`Subscription`] guard handed back to the caller, so
//! dropping the guard unsubscribes. Dead entries are pruned lazily during
//! notification.
//!
//! # Invariants
//!
//! 1. `get()` after `set(v)` returns a value equal to `v`.
//! 2. Every `set` notifies, including a `set` carrying a value equal to the
//!    current one. There is no equality short-circuit.
//! 3. Subscribers are notified in registration order.
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.

use std::rc::{Rc, Weak};

/// Boxed change callback, the object-safe currency of [`Observable`].
///
/// Arguments are `(previous, new)`.
pub type ChangeCallback<T> = Box<dyn Fn(&T, &T)>;

/// A subscriber callback stored as a strong `Rc` inside the guard, handed to
/// the subscriber list as `Weak`.
pub(crate) type CallbackRc<T> = Rc<dyn Fn(&T, &T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T, &T)>;

/// A value that can be read, replaced wholesale, and observed.
///
/// Implemented by [`Atom`](crate::Atom) (root store, owns the value) and
/// [`Cursor`](crate::Cursor) (derived view, round-trips through a parent).
pub trait Observable<T: Clone + 'static> {
    /// Get a clone of the current value. No side effects.
    fn get(&self) -> T;

    /// Replace the current value unconditionally and notify all live
    /// subscribers with `(previous, new)`, in registration order,
    /// synchronously within this call.
    ///
    /// A `set` carrying a value equal to the current one still counts as a
    /// change and still notifies.
    fn set(&self, value: T);

    /// Object-safe subscription entry point. Prefer [`subscribe`](Observable::subscribe)
    /// on concrete types.
    fn subscribe_boxed(&self, callback: ChangeCallback<T>) -> Subscription;

    /// Subscribe to future replacements. The callback is invoked with
    /// `(previous, new)` on every `set` after registration; past replacements
    /// are not replayed.
    ///
    /// Returns a [`Subscription`] guard. Dropping the guard unsubscribes.
    fn subscribe(&self, callback: impl Fn(&T, &T) + 'static) -> Subscription
    where
        Self: Sized,
    {
        self.subscribe_boxed(Box::new(callback))
    }

    /// Read-modify-write convenience: clones the current value, applies
    /// `mutate` in place, then passes the result to [`set`](Observable::set).
    fn update(&self, mutate: impl FnOnce(&mut T))
    where
        Self: Sized,
    {
        let mut value = self.get();
        mutate(&mut value);
        self.set(value);
    }
}

/// Registration-order subscriber list shared by `Atom` and `Cursor`.
///
/// Entries are weak; [`live`](SubscriberSet::live) prunes dead ones and
/// returns upgraded callbacks so the caller can invoke them without holding
/// any interior borrow.
pub(crate) struct SubscriberSet<T> {
    entries: Vec<CallbackWeak<T>>,
}

impl<T: 'static> SubscriberSet<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a callback, returning the guard that keeps it alive.
    pub(crate) fn register(&mut self, callback: ChangeCallback<T>) -> Subscription {
        let strong: CallbackRc<T> = Rc::from(callback);
        self.entries.push(Rc::downgrade(&strong));
        // `Rc<dyn Fn(&T, &T)>` cannot coerce to `Rc<dyn Any>` directly, so the
        // guard wraps the Rc itself in a `Box<dyn Any>`.
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Prune dead entries and return the live callbacks in registration order.
    pub(crate) fn live(&mut self) -> Vec<CallbackRc<T>> {
        self.entries.retain(|w| w.strong_count() > 0);
        self.entries.iter().filter_map(Weak::upgrade).collect()
    }

    /// Number of registered entries, including dead ones not yet pruned.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the guard drops the strong `Rc`, so the `Weak` in the subscriber
/// list fails to upgrade on the next notification cycle and is pruned.
pub struct Subscription {
    /// Type-erased strong reference keeping the callback `Rc` alive.
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    /// Keep the callback alive for the rest of the program.
    ///
    /// Leaks the guard deliberately; use for subscriptions that should never
    /// be removed instead of stashing the guard somewhere it is never read.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
