#![forbid(unsafe_code)]

//! Accessor values addressing one sub-field of a larger state value.
//!
//! A [`Lens<S, V>`] is an explicit pair of pure functions: read field `V` out
//! of state `S`, and write a `V` back into an `S`. Lenses are `Rc`-backed and
//! cheap to clone, compose with [`then`](Lens::then) for nested paths, and are
//! usually built with the [`lens!`] macro rather than by hand.
//!
//! Both halves must address the same logical field: for any state `s` and
//! value `v`, `get` after `put(s, v)` returns `v` and no other field of `s`
//! is touched. The library cannot check this; the `lens!` macro guarantees it
//! by construction.

use std::rc::Rc;

/// A pure read/write accessor pair focusing one field of `S`.
pub struct Lens<S, V> {
    read: Rc<dyn Fn(&S) -> V>,
    write: Rc<dyn Fn(&mut S, V)>,
}

// Manual Clone: shares the same function Rcs.
impl<S, V> Clone for Lens<S, V> {
    fn clone(&self) -> Self {
        Self {
            read: Rc::clone(&self.read),
            write: Rc::clone(&self.write),
        }
    }
}

impl<S, V> std::fmt::Debug for Lens<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lens").finish_non_exhaustive()
    }
}

impl<S: 'static, V: 'static> Lens<S, V> {
    /// Build a lens from a read function and a write function.
    ///
    /// Both must be pure and address the same logical field.
    pub fn new(read: impl Fn(&S) -> V + 'static, write: impl Fn(&mut S, V) + 'static) -> Self {
        Self {
            read: Rc::new(read),
            write: Rc::new(write),
        }
    }

    /// Read the focused field out of `source`.
    pub fn get(&self, source: &S) -> V {
        (self.read)(source)
    }

    /// Write `value` into the focused field of `target`.
    pub fn put(&self, target: &mut S, value: V) {
        (self.write)(target, value)
    }

    /// Compose with a lens from `V` to a deeper field `W`, yielding a lens
    /// from `S` straight to `W`.
    #[must_use]
    pub fn then<W: 'static>(&self, next: Lens<V, W>) -> Lens<S, W> {
        let outer_read = self.clone();
        let outer_write = self.clone();
        let next_read = next.clone();
        Lens::new(
            move |source: &S| next_read.get(&outer_read.get(source)),
            move |target: &mut S, value: W| {
                let mut mid = outer_write.get(target);
                next.put(&mut mid, value);
                outer_write.put(target, mid);
            },
        )
    }
}

/// Build a typed [`Lens`] over a named (possibly nested) field path.
///
/// ```
/// use atomlens::{lens, Lens};
///
/// #[derive(Clone)]
/// struct Inner { value: f64 }
/// #[derive(Clone)]
/// struct State { count: i32, inner: Inner }
///
/// let count: Lens<State, i32> = lens!(State => count);
/// let nested: Lens<State, f64> = lens!(State => inner.value);
///
/// let mut state = State { count: 0, inner: Inner { value: 0.5 } };
/// nested.put(&mut state, 3.33);
/// assert_eq!(nested.get(&state), 3.33);
/// assert_eq!(count.get(&state), 0);
/// ```
///
/// The field type must be `Clone`. Paths resolve at compile time; a typo in
/// the path is a compile error, not a runtime lookup failure.
#[macro_export]
macro_rules! lens {
    ($state:ty => $($field:ident).+) => {
        $crate::Lens::<$state, _>::new(
            |state: &$state| state.$($field).+.clone(),
            |state: &mut $state, value| state.$($field).+ = value,
        )
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
