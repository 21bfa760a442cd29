//! Constrained sets of caller-defined items.
//!
//! A [`Set<T>`] bundles a [`Registry`] with a projection from raw assignments
//! to `T`. Iterating the set enumerates the satisfying assignments and maps
//! each one through the projection, lazily, as it is pulled.
//!
//! # Example
//!
//! ```
//! use fdset::constraint::Constraint;
//! use fdset::set::Set;
//!
//! // All points strictly above the diagonal of a 3x3 grid.
//! let mut points = Set::new(|v: &[i64]| (v[0], v[1]));
//! let x = points.declare(Constraint::between(0, 2));
//! points.declare(Constraint::between(0, 2) & Constraint::greater_than(x));
//!
//! let all: Vec<(i64, i64)> = points.iter().unwrap().collect();
//! assert_eq!(all, vec![(0, 1), (0, 2), (1, 2)]);
//! ```

use std::fmt;
use std::iter::FusedIterator;

use crate::constraint::Constraint;
use crate::error::Result;
use crate::registry::Registry;
use crate::search::Solutions;
use crate::types::Var;

/// A set of items described by constrained variables and a projection.
pub struct Set<T> {
    registry: Registry,
    projection: Box<dyn Fn(&[i64]) -> T>,
}

/// The iterator returned by [`Set::iter`].
pub type Iter<'a, T> = Projected<'a, &'a dyn Fn(&[i64]) -> T>;

impl<T> Set<T> {
    /// Creates an empty set with the given projection.
    pub fn new(projection: impl Fn(&[i64]) -> T + 'static) -> Self {
        Set {
            registry: Registry::new(),
            projection: Box::new(projection),
        }
    }

    /// Declares a new variable. See [`Registry::declare`].
    pub fn declare(&mut self, constraint: Constraint) -> Var {
        self.registry.declare(constraint)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Enumerates the items of this set in the lexicographic order of their
    /// underlying assignments.
    ///
    /// Fails if a declaration refers to a variable declared after it.
    pub fn iter(&self) -> Result<Iter<'_, T>> {
        let projection: &dyn Fn(&[i64]) -> T = &*self.projection;
        self.registry.project(projection)
    }

    /// Enumerates the raw assignments, bypassing the projection.
    pub fn solutions(&self) -> Result<Solutions<'_>> {
        self.registry.solutions()
    }
}

impl<T> fmt::Debug for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Set")
            .field("variables", &self.registry.len())
            .finish()
    }
}

/// Solutions mapped through a projection.
///
/// Created by [`Registry::project`] and [`Set::iter`]. The projection sees the
/// enumerator's own buffer, so no assignment is copied.
pub struct Projected<'a, F> {
    solutions: Solutions<'a>,
    projection: F,
}

impl<'a, F> Projected<'a, F> {
    pub(crate) fn new(solutions: Solutions<'a>, projection: F) -> Self {
        Projected { solutions, projection }
    }

    /// Whether another item is available. See [`Solutions::has_next`].
    pub fn has_next(&mut self) -> bool {
        self.solutions.has_next()
    }
}

impl<T, F> Iterator for Projected<'_, F>
where
    F: Fn(&[i64]) -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.solutions.has_next() {
            return None;
        }
        let item = (self.projection)(self.solutions.current()?);
        self.solutions.advance();
        Some(item)
    }
}

impl<T, F> FusedIterator for Projected<'_, F> where F: Fn(&[i64]) -> T {}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::error::Error;

    #[test]
    fn test_projection_to_strings() {
        let mut set = Set::new(|v: &[i64]| format!("{}-{}", v[0], v[1]));
        set.declare(Constraint::between(1, 2));
        set.declare(Constraint::between(0, 1));
        let all: Vec<String> = set.iter().unwrap().collect();
        assert_eq!(all, vec!["1-0", "1-1", "2-0", "2-1"]);
    }

    #[test]
    fn test_repeated_iteration_is_identical() {
        let mut set = Set::new(|v: &[i64]| v.to_vec());
        let x = set.declare(Constraint::between(0, 3));
        set.declare(Constraint::between(0, 3) & (Constraint::less_than(x) | Constraint::greater_than(x)));
        let first: Vec<_> = set.iter().unwrap().collect();
        let second: Vec<_> = set.iter().unwrap().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 12);
    }

    #[test]
    fn test_concurrent_enumerators_share_declarations() {
        let mut set = Set::new(|v: &[i64]| v[0]);
        set.declare(Constraint::between(0, 2));
        let mut a = set.iter().unwrap();
        let mut b = set.iter().unwrap();
        assert_eq!(a.next(), Some(0));
        assert_eq!(a.next(), Some(1));
        assert_eq!(b.next(), Some(0));
        assert_eq!(a.next(), Some(2));
        assert_eq!(a.next(), None);
        assert_eq!(b.next(), Some(1));
    }

    #[test]
    fn test_forward_reference_fails() {
        let mut other = Set::new(|_: &[i64]| ());
        other.declare(Constraint::between(0, 1));
        let y = other.declare(Constraint::between(0, 1));

        let mut set = Set::new(|v: &[i64]| v[0]);
        set.declare(Constraint::at_least(y));
        set.declare(Constraint::between(0, 1));
        assert_eq!(set.iter().err(), Some(Error::ForwardReference { index: 0, pivot: 1 }));
    }

    #[test]
    fn test_has_next() {
        let mut set = Set::new(|v: &[i64]| v[0]);
        set.declare(Constraint::between(1, 0));
        let mut iter = set.iter().unwrap();
        assert!(!iter.has_next());
        assert_eq!(iter.next(), None);
    }
}
