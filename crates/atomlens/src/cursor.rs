#![forbid(unsafe_code)]

//! Derived observable addressing one field of a parent observable.
//!
//! # Design
//!
//! [`Cursor<S, V>`] owns no state. It holds a handle to a parent
//! [`Observable<S>`] plus a [`Lens<S, V>`], and every read or write
//! round-trips through the parent: `get` re-derives the field from the
//! parent's current value, `set` reads the whole state, writes the field
//! through the lens, and replaces the whole state via the parent's `set`.
//! The parent's own subscribers therefore fire (with the whole `S`) on every
//! cursor write, in addition to the cursor's subscribers (with just the `V`).
//!
//! Because a cursor implements `Observable<V>` itself, cursors nest: a cursor
//! can be built over another cursor, and a [`History`](crate::History) can
//! watch a cursor.
//!
//! # Notification policy
//!
//! Whether a cursor's subscribers should fire when the addressed field
//! changes through a *different* path (a direct parent `set`, or a sibling
//! cursor) is a policy choice, selected at construction:
//!
//! - [`NotifyPolicy::OwnWrites`] (default, [`Cursor::new`]): subscribers fire
//!   only from this cursor's own `set`, once per `set` including ones that
//!   leave the field value unchanged.
//! - [`NotifyPolicy::ParentChanges`] ([`Cursor::watching_parent`]): the
//!   cursor watches the parent and fires whenever the addressed field's value
//!   actually changes, via any path. Requires `V: PartialEq`. The cursor's
//!   own `set` then notifies solely through the parent watch, so a write
//!   never fires subscribers twice.
//!
//! Staleness is never observable on `get` under either policy: reads always
//! re-derive from the parent's current value.

use std::cell::RefCell;
use std::rc::Rc;

use crate::lens::Lens;
use crate::observable::{ChangeCallback, Observable, SubscriberSet, Subscription};

/// When a cursor fires its own subscribers. See the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyPolicy {
    /// Fire only from this cursor's own `set`.
    #[default]
    OwnWrites,
    /// Fire whenever the addressed field's value changes via any path.
    ParentChanges,
}

/// An observable view of one field of a parent observable.
///
/// Cheap to clone; clones share the parent handle and the subscriber list.
/// Two independently constructed cursors over the same field are independent
/// observation points that always converge through the shared parent.
pub struct Cursor<S, V> {
    parent: Rc<dyn Observable<S>>,
    lens: Lens<S, V>,
    subscribers: Rc<RefCell<SubscriberSet<V>>>,
    policy: NotifyPolicy,
    /// Keeps the parent watch alive for `ParentChanges` cursors.
    _parent_watch: Option<Rc<Subscription>>,
}

// Manual Clone: shares parent, lens, and subscriber list.
impl<S, V> Clone for Cursor<S, V> {
    fn clone(&self) -> Self {
        Self {
            parent: Rc::clone(&self.parent),
            lens: self.lens.clone(),
            subscribers: Rc::clone(&self.subscribers),
            policy: self.policy,
            _parent_watch: self._parent_watch.clone(),
        }
    }
}

impl<S, V: 'static> std::fmt::Debug for Cursor<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("policy", &self.policy)
            .field("subscriber_count", &self.subscribers.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<S: Clone + 'static, V: Clone + 'static> Cursor<S, V> {
    /// Build a cursor over `parent` focused through `lens`, with the default
    /// [`NotifyPolicy::OwnWrites`] policy.
    ///
    /// The parent handle is cloned; both handles address the same shared
    /// state.
    pub fn new<O>(parent: &O, lens: Lens<S, V>) -> Self
    where
        O: Observable<S> + Clone + 'static,
    {
        let parent: Rc<dyn Observable<S>> = Rc::new(parent.clone());
        Self {
            parent,
            lens,
            subscribers: Rc::new(RefCell::new(SubscriberSet::new())),
            policy: NotifyPolicy::OwnWrites,
            _parent_watch: None,
        }
    }

    /// This cursor's notification policy.
    #[must_use]
    pub fn policy(&self) -> NotifyPolicy {
        self.policy
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn notify(&self, previous: &V, value: &V) {
        let callbacks = self.subscribers.borrow_mut().live();
        for cb in &callbacks {
            cb(previous, value);
        }
    }
}

impl<S: Clone + 'static, V: Clone + PartialEq + 'static> Cursor<S, V> {
    /// Build a cursor with the [`NotifyPolicy::ParentChanges`] policy: its
    /// subscribers fire whenever the addressed field's value changes through
    /// any mutation path, compared by `PartialEq` on the field.
    pub fn watching_parent<O>(parent: &O, lens: Lens<S, V>) -> Self
    where
        O: Observable<S> + Clone + 'static,
    {
        let parent: Rc<dyn Observable<S>> = Rc::new(parent.clone());
        let subscribers = Rc::new(RefCell::new(SubscriberSet::new()));

        let weak_subs = Rc::downgrade(&subscribers);
        let watch_lens = lens.clone();
        let watch = parent.subscribe_boxed(Box::new(move |previous: &S, value: &S| {
            let before = watch_lens.get(previous);
            let after = watch_lens.get(value);
            if before != after
                && let Some(subs) = weak_subs.upgrade()
            {
                let callbacks = subs.borrow_mut().live();
                for cb in &callbacks {
                    cb(&before, &after);
                }
            }
        }));

        Self {
            parent,
            lens,
            subscribers,
            policy: NotifyPolicy::ParentChanges,
            _parent_watch: Some(Rc::new(watch)),
        }
    }
}

impl<S: Clone + 'static, V: Clone + 'static> Observable<V> for Cursor<S, V> {
    fn get(&self) -> V {
        let state = self.parent.get();
        self.lens.get(&state)
    }

    fn set(&self, value: V) {
        let mut state = self.parent.get();
        let previous = self.lens.get(&state);
        self.lens.put(&mut state, value.clone());
        self.parent.set(state);
        // Under ParentChanges the write above already flowed through the
        // parent watch; notifying here as well would double-fire.
        if self.policy == NotifyPolicy::OwnWrites {
            self.notify(&previous, &value);
        }
    }

    fn subscribe_boxed(&self, callback: ChangeCallback<V>) -> Subscription {
        self.subscribers.borrow_mut().register(callback)
    }
}

/// Cursor-construction sugar available on every cloneable observable.
pub trait ObservableExt<T: Clone + 'static>: Observable<T> + Clone + Sized + 'static {
    /// Build an [`NotifyPolicy::OwnWrites`] cursor over `self`.
    fn cursor<V: Clone + 'static>(&self, lens: Lens<T, V>) -> Cursor<T, V> {
        Cursor::new(self, lens)
    }
}

impl<T: Clone + 'static, O: Observable<T> + Clone + 'static> ObservableExt<T> for O {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
