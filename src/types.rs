//! Variable handles and the sentinel bounds of the value domain.
//!
//! Values are `i64`. The two sentinels stand in for "unbounded" and sit one
//! unit inside the machine extremes on the low side, so that tightening a
//! strict bound against an unbounded side never wraps around.

use std::fmt;

/// Sentinel for an unbounded lower side.
pub const LO: i64 = i64::MIN + 1;

/// Sentinel for an unbounded upper side.
pub const HI: i64 = i64::MAX;

/// A declared variable (0-indexed).
///
/// Handles are only minted by [`Registry::declare`][crate::registry::Registry::declare],
/// in declaration order. The index doubles as the position of the variable in
/// every assignment vector produced by the enumerator.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(usize);

impl Var {
    pub(crate) fn new(index: usize) -> Self {
        Var(index)
    }

    /// Returns the raw index of this variable.
    pub fn index(self) -> usize {
        self.0
    }

    /// Reads the value of this variable from an assignment.
    ///
    /// # Panics
    ///
    /// Panics if the assignment is shorter than `index + 1`.
    pub fn value(self, values: &[i64]) -> i64 {
        values[self.0]
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Var> for usize {
    fn from(var: Var) -> Self {
        var.0
    }
}

/// Raises a value to at least `LO`.
///
/// `HI` is `i64::MAX`, so this is all it takes to bring an `i64` into `[LO, HI]`.
pub fn raise_to_lo(value: i64) -> i64 {
    value.max(LO)
}
