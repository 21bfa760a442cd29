//! Lazy enumeration of satisfying assignments.
//!
//! [`Solutions`] walks the solution space of a validated declaration list in
//! strictly ascending lexicographic order. It is a small state machine:
//!
//! - **Seeking**: nothing computed yet. The first query runs
//!   `find_least_solution` from variable 0.
//! - **Ready**: the assignment buffer holds a full solution that has not been
//!   emitted yet.
//! - **Exhausted**: terminal. The buffers are released.
//!
//! # Search
//!
//! Variables are assigned left to right. For each position the enumerator
//! records the least feasible value and, in a parallel `limits` buffer, the end
//! of the feasible run that value belongs to. Stepping a position increments
//! its value while it is below the limit; at the limit, the position jumps to
//! the start of the next feasible run, if its constraint has one. Whenever a
//! position has nothing left, the search backtracks to the position on its
//! left. Since every constraint only reads positions to its left, the values
//! (and limits) of a prefix stay valid while its suffix is being explored.
//!
//! Both buffers are allocated once, with one slot per variable.
//!
//! # Example
//!
//! ```
//! use fdset::constraint::Constraint;
//! use fdset::registry::Registry;
//!
//! let mut registry = Registry::new();
//! let x = registry.declare(Constraint::between(1, 3));
//! registry.declare(Constraint::between(0, 3) & Constraint::greater_than(x));
//!
//! let mut solutions = registry.solutions().unwrap();
//! assert!(solutions.has_next());
//! assert_eq!(solutions.current(), Some(&[1, 2][..]));
//! let all: Vec<_> = solutions.collect();
//! assert_eq!(all, vec![vec![1, 2], vec![1, 3], vec![2, 3]]);
//! ```
//!
//! Note: a variable whose constraint leaves its upper side open ranges up to
//! [`HI`][crate::types::HI], so the enumeration is effectively infinite unless
//! every dimension is bounded.

use std::iter::FusedIterator;

use log::{debug, trace};

use crate::constraint::Constraint;
use crate::types::{HI, LO};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum State {
    Seeking,
    Ready,
    Exhausted,
}

/// An iterator over the satisfying assignments of a declaration list.
///
/// Created by [`Registry::solutions`][crate::registry::Registry::solutions].
/// See the [module documentation](self) for details.
#[derive(Debug)]
pub struct Solutions<'a> {
    constraints: &'a [Constraint],
    /// Current value of each variable; only the assigned prefix is meaningful.
    values: Vec<i64>,
    /// End of the feasible run each assigned value belongs to.
    limits: Vec<i64>,
    state: State,
    /// Number of solutions emitted so far.
    emitted: usize,
}

impl<'a> Solutions<'a> {
    /// Creates an enumerator over already validated constraints.
    pub(crate) fn new(constraints: &'a [Constraint]) -> Self {
        let n = constraints.len();
        Solutions {
            constraints,
            values: vec![0; n],
            limits: vec![0; n],
            state: State::Seeking,
            emitted: 0,
        }
    }

    /// Number of variables in each assignment.
    pub fn width(&self) -> usize {
        self.constraints.len()
    }

    /// Number of solutions emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Whether another solution is available.
    ///
    /// On the first call this runs the search for the least solution.
    pub fn has_next(&mut self) -> bool {
        self.resolve();
        self.state == State::Ready
    }

    /// Whether the enumeration has finished.
    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    /// The pending solution, if one has been found and not yet emitted.
    ///
    /// This does not run the search; call [`has_next`][Solutions::has_next]
    /// first.
    pub fn current(&self) -> Option<&[i64]> {
        match self.state {
            State::Ready => Some(&self.values),
            State::Seeking | State::Exhausted => None,
        }
    }

    /// Discards the pending solution and searches for the next one.
    pub fn advance(&mut self) {
        self.resolve();
        if self.state != State::Ready {
            return;
        }
        self.emitted += 1;
        if self.next_solution() {
            trace!("next solution: {:?}", self.values);
        } else {
            self.exhaust();
        }
    }

    fn resolve(&mut self) {
        if self.state != State::Seeking {
            return;
        }
        debug!("searching for the least solution over {} variables", self.width());
        if self.find_least_solution(0) {
            trace!("least solution: {:?}", self.values);
            self.state = State::Ready;
        } else {
            self.exhaust();
        }
    }

    fn exhaust(&mut self) {
        debug!("exhausted after {} solutions", self.emitted);
        self.state = State::Exhausted;
        self.values = Vec::new();
        self.limits = Vec::new();
    }

    /// Assigns the least feasible values to positions `v..`, given the prefix
    /// `..v`. Never touches the prefix.
    fn find_least_solution(&mut self, v: usize) -> bool {
        self.search(v, v, false)
    }

    /// Moves to the lexicographically next full assignment.
    fn next_solution(&mut self) -> bool {
        self.search(0, self.width(), true)
    }

    /// Depth-first search over positions `floor..`.
    ///
    /// Positions below `depth` hold a valid prefix. When `backtracking`, the
    /// position left of `depth` is stepped first; otherwise position `depth` is
    /// filled with its least value.
    fn search(&mut self, floor: usize, mut depth: usize, mut backtracking: bool) -> bool {
        let n = self.width();
        loop {
            if backtracking {
                if depth == floor {
                    return false;
                }
                depth -= 1;
                if self.step(depth) {
                    depth += 1;
                    backtracking = false;
                }
            } else if depth == n {
                return true;
            } else if self.first(depth) {
                depth += 1;
            } else {
                backtracking = true;
            }
        }
    }

    /// Assigns position `v` its least feasible value.
    fn first(&mut self, v: usize) -> bool {
        let constraint = &self.constraints[v];
        match constraint.greatest_lower_bound(LO, &self.values) {
            Some(value) => self.assign(v, value),
            None => {
                trace!("x{}: unsat", v);
                false
            }
        }
    }

    /// Assigns position `v` its next feasible value above the current one.
    fn step(&mut self, v: usize) -> bool {
        let value = self.values[v];
        let limit = self.limits[v];
        if value < limit {
            self.values[v] = value + 1;
            return true;
        }
        if limit == HI {
            return false;
        }
        match self.constraints[v].greatest_lower_bound(limit + 1, &self.values) {
            Some(next) => {
                trace!("x{}: jump {} -> {}", v, limit, next);
                self.assign(v, next)
            }
            None => false,
        }
    }

    /// Sets position `v` to a feasible `value` and records the end of its run.
    fn assign(&mut self, v: usize, value: i64) -> bool {
        match self.constraints[v].least_upper_bound(value, &self.values) {
            Some(limit) => {
                self.values[v] = value;
                self.limits[v] = limit;
                true
            }
            None => false,
        }
    }
}

impl Iterator for Solutions<'_> {
    type Item = Vec<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        let result = self.values.clone();
        self.advance();
        Some(result)
    }
}

impl FusedIterator for Solutions<'_> {}
