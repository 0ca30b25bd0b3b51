//! Property-based invariant tests for the atom/cursor/history core.
//!
//! These verify contracts that must hold for any sequence of writes:
//!
//! 1. `get()` after a sequence of `set`s equals the last value set.
//! 2. Subscriber invocation count equals the number of `set` calls made
//!    after subscription.
//! 3. Each notification's `previous` argument equals the value immediately
//!    before that `set`; `new` equals the value passed to it.
//! 4. A cursor write round-trips and leaves unrelated fields unchanged.
//! 5. History length equals 1 + number of `set`s since attachment, and every
//!    entry matches the value written at that point.
//! 6. Restoring any recorded index appends an entry equal to the restored
//!    one (idempotent replay), never rewinding the log.
//! 7. Recorded entries are stable across later writes and restores.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use atomlens::{lens, Atom, History, Observable, ObservableExt};
use proptest::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct Pair {
    left: i32,
    right: i32,
}

proptest! {
    #[test]
    fn last_set_wins(initial in any::<i32>(), values in prop::collection::vec(any::<i32>(), 1..64)) {
        let atom = Atom::new(initial);
        for &v in &values {
            atom.set(v);
        }
        prop_assert_eq!(atom.get(), *values.last().unwrap());
        prop_assert_eq!(atom.version(), values.len() as u64);
    }

    #[test]
    fn notification_count_equals_set_count(values in prop::collection::vec(any::<i32>(), 0..64)) {
        let atom = Atom::new(0);
        let count = Rc::new(Cell::new(0usize));
        let count_clone = Rc::clone(&count);
        let _sub = atom.subscribe(move |_, _| count_clone.set(count_clone.get() + 1));

        for &v in &values {
            atom.set(v);
        }
        prop_assert_eq!(count.get(), values.len());
    }

    #[test]
    fn notification_arguments_track_the_write_sequence(
        initial in any::<i32>(),
        values in prop::collection::vec(any::<i32>(), 1..64),
    ) {
        let atom = Atom::new(initial);
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = Rc::clone(&log);
        let _sub = atom.subscribe(move |prev, value| log_clone.borrow_mut().push((*prev, *value)));

        for &v in &values {
            atom.set(v);
        }

        let mut expected_prev = initial;
        for (i, &v) in values.iter().enumerate() {
            prop_assert_eq!(log.borrow()[i], (expected_prev, v));
            expected_prev = v;
        }
    }

    #[test]
    fn cursor_roundtrip_preserves_siblings(
        left in any::<i32>(),
        right in any::<i32>(),
        new_left in any::<i32>(),
    ) {
        let atom = Atom::new(Pair { left, right });
        let cursor = atom.cursor(lens!(Pair => left));

        cursor.set(new_left);
        prop_assert_eq!(cursor.get(), new_left);
        prop_assert_eq!(atom.get(), Pair { left: new_left, right });
    }

    #[test]
    fn history_records_the_full_write_sequence(
        initial in any::<i32>(),
        values in prop::collection::vec(any::<i32>(), 0..64),
    ) {
        let atom = Atom::new(initial);
        let history = History::new(&atom);

        for &v in &values {
            atom.set(v);
        }

        prop_assert_eq!(history.len(), values.len() + 1);
        prop_assert_eq!(history.get(0), Ok(initial));
        for (i, &v) in values.iter().enumerate() {
            prop_assert_eq!(history.get(i + 1), Ok(v));
        }
    }

    #[test]
    fn restore_is_idempotent_replay(
        values in prop::collection::vec(any::<i32>(), 1..32),
        pick in any::<prop::sample::Index>(),
    ) {
        let atom = Atom::new(0);
        let history = History::new(&atom);
        for &v in &values {
            atom.set(v);
        }

        let len_before = history.len();
        let index = pick.index(len_before);
        history.restore(index).unwrap();

        prop_assert_eq!(history.len(), len_before + 1);
        prop_assert_eq!(history.get(history.len() - 1), history.get(index));
        prop_assert_eq!(atom.get(), history.get(index).unwrap());
    }

    #[test]
    fn recorded_entries_never_mutate(
        values in prop::collection::vec(any::<i32>(), 1..32),
        pick in any::<prop::sample::Index>(),
        later in any::<i32>(),
    ) {
        let atom = Atom::new(0);
        let history = History::new(&atom);
        for &v in &values {
            atom.set(v);
        }

        let snapshot: Vec<_> = (0..history.len()).map(|i| history.get(i).unwrap()).collect();

        atom.set(later);
        history.restore(pick.index(snapshot.len())).unwrap();

        for (i, entry) in snapshot.iter().enumerate() {
            prop_assert_eq!(history.get(i).unwrap(), *entry);
        }
    }
}
