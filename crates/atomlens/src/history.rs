#![forbid(unsafe_code)]

//! Append-only snapshot log with restore-by-index.
//!
//! # Design
//!
//! [`History<T>`] watches any [`Observable<T>`] — an atom or a cursor. At
//! construction it records the observable's current value as entry 0, then
//! subscribes; every notification appends the post-change value. The log only
//! ever grows: [`restore`](History::restore) writes a recorded snapshot back
//! through the observable's `set`, which itself appends a new entry equal to
//! the restored one. There is no truncation, rewind, or eviction.
//!
//! A history over an [`NotifyPolicy::OwnWrites`](crate::NotifyPolicy) cursor
//! records only that cursor's own writes; attach the history to a
//! [`watching_parent`](crate::Cursor::watching_parent) cursor to record field
//! changes arriving through any path.
//!
//! # Invariants
//!
//! 1. Entry 0 is the observable's value at construction time, always.
//! 2. `len()` is monotonically non-decreasing; an unchanged-value `set`
//!    still appends (the atom notifies on every `set`).
//! 3. A recorded entry never mutates: `get(k)` is stable for any `k < len()`
//!    once recorded.
//! 4. `restore(i)` then `get(len() - 1)` equals `get(i)`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::observable::{Observable, Subscription};

/// Errors from indexed history access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// Requested snapshot index is outside `[0, len)`.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of recorded entries at the time of the call.
        len: usize,
    },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "snapshot index {index} out of range ({len} entries recorded)")
            }
        }
    }
}

impl std::error::Error for HistoryError {}

/// Append-only log of every value an observable has held since the history
/// was created, supporting read-by-index and restore-by-index.
pub struct History<T> {
    source: Rc<dyn Observable<T>>,
    entries: Rc<RefCell<Vec<T>>>,
    /// Keeps the recording callback alive for the history's lifetime.
    _recorder: Subscription,
}

impl<T> fmt::Debug for History<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("len", &self.entries.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> History<T> {
    /// Attach a history to `source`, recording its current value as entry 0.
    ///
    /// The source handle is cloned; the history observes the same shared
    /// state as the caller's handle.
    pub fn new<O>(source: &O) -> Self
    where
        O: Observable<T> + Clone + 'static,
    {
        let source: Rc<dyn Observable<T>> = Rc::new(source.clone());
        let entries = Rc::new(RefCell::new(vec![source.get()]));

        let weak = Rc::downgrade(&entries);
        let recorder = source.subscribe_boxed(Box::new(move |_previous: &T, value: &T| {
            // Only the post-change value is recorded.
            if let Some(entries) = weak.upgrade() {
                entries.borrow_mut().push(value.clone());
            }
        }));

        Self {
            source,
            entries,
            _recorder: recorder,
        }
    }

    /// Number of recorded entries. At least 1, monotonically non-decreasing.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the log holds no entries. Always false for a live history
    /// (entry 0 is recorded at construction); provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// The snapshot at `index`.
    ///
    /// # Errors
    ///
    /// [`HistoryError::IndexOutOfRange`] if `index >= len()`. No clamping.
    pub fn get(&self, index: usize) -> Result<T, HistoryError> {
        let entries = self.entries.borrow();
        entries
            .get(index)
            .cloned()
            .ok_or(HistoryError::IndexOutOfRange {
                index,
                len: entries.len(),
            })
    }

    /// The most recently recorded snapshot.
    #[must_use]
    pub fn latest(&self) -> T {
        let entries = self.entries.borrow();
        // The log is never empty: entry 0 is recorded at construction and
        // entries are never removed.
        entries[entries.len() - 1].clone()
    }

    /// Restore the observable to the snapshot at `index` by writing it back
    /// through the observable's `set`.
    ///
    /// The write notifies subscribers as usual, so the history itself appends
    /// a fresh entry equal to the restored snapshot — restoring grows the
    /// log, it never rewinds it.
    ///
    /// # Errors
    ///
    /// [`HistoryError::IndexOutOfRange`] if `index >= len()`; the observable
    /// is left untouched.
    pub fn restore(&self, index: usize) -> Result<(), HistoryError> {
        let snapshot = self.get(index)?;
        debug!(index, "restoring snapshot");
        self.source.set(snapshot);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
