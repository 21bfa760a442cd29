//! The constraint language.
//!
//! A [`Constraint`] describes the feasible values of a single variable in terms
//! of the values of variables declared before it. Every variant answers the
//! same two questions about a candidate value `v`, given the current prefix
//! assignment:
//!
//! - [`greatest_lower_bound`][Constraint::greatest_lower_bound]: what is the
//!   least feasible value `>= v`?
//! - [`least_upper_bound`][Constraint::least_upper_bound]: if `v` is feasible,
//!   how far does the block of feasible values starting at `v` extend?
//!
//! Both return `None` when no such value exists (the constraint is UNSAT in
//! that direction). A union of disjoint ranges is thus described as a sequence
//! of runs, and the enumerator jumps from the end of one run straight to the
//! start of the next.
//!
//! # Example
//!
//! ```
//! use fdset::constraint::Constraint;
//! use fdset::registry::Registry;
//!
//! let mut registry = Registry::new();
//! let x = registry.declare(Constraint::between(0, 5));
//! // y in [-2, 2] and y != x
//! let y = registry.declare(Constraint::between(-2, 2) & (Constraint::less_than(x) | Constraint::greater_than(x)));
//!
//! let c = registry.constraint(y);
//! // With x = 0, the feasible values of y are [-2, -1] and [1, 2].
//! assert_eq!(c.greatest_lower_bound(-5, &[0]), Some(-2));
//! assert_eq!(c.least_upper_bound(-2, &[0]), Some(-1));
//! assert_eq!(c.greatest_lower_bound(0, &[0]), Some(1));
//! assert_eq!(c.least_upper_bound(0, &[0]), None);
//! ```

use std::fmt;
use std::ops::{BitAnd, BitOr};

use num_bigint::BigInt;

use crate::expr::{Bound, LinearExpr};
use crate::types::{raise_to_lo, Var, HI, LO};

/// A constraint on the value of one variable.
///
/// See the [module documentation](self) for the bound protocol.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Constraint {
    /// `lower <= v <= upper`.
    StaticRange { lower: i64, upper: i64 },
    /// Every clause holds.
    Conjunction(Vec<Constraint>),
    /// At least one clause holds.
    Disjunction(Vec<Constraint>),
    /// `v >= e`.
    RelaxedLowerBound(LinearExpr),
    /// `v > e`.
    StrictLowerBound(LinearExpr),
    /// `v <= e`.
    RelaxedUpperBound(LinearExpr),
    /// `v < e`.
    StrictUpperBound(LinearExpr),
    /// `v == e`.
    Congruence(LinearExpr),
    /// `v >= c1*x1 + ... + cn*xn`.
    LinearLowerBound(Vec<(i64, Var)>),
}

/// A closed interval `[lo, hi]`, empty when `lo > hi`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Interval {
    lo: i64,
    hi: i64,
}

impl Interval {
    const EMPTY: Interval = Interval { lo: HI, hi: LO };

    fn new(lo: i64, hi: i64) -> Self {
        Interval { lo: raise_to_lo(lo), hi }
    }

    /// `[bound, HI]`.
    fn at_least(bound: Bound) -> Self {
        match bound {
            Bound::Below => Interval::new(LO, HI),
            Bound::Within(lo) => Interval::new(lo, HI),
            Bound::Above => Interval::EMPTY,
        }
    }

    /// `[LO, bound]`.
    fn at_most(bound: Bound) -> Self {
        match bound {
            Bound::Below => Interval::EMPTY,
            Bound::Within(hi) => Interval::new(LO, hi),
            Bound::Above => Interval::new(LO, HI),
        }
    }

    fn glb(self, candidate: i64) -> Option<i64> {
        let v = candidate.max(self.lo);
        (v <= self.hi).then_some(v)
    }

    fn lub(self, candidate: i64) -> Option<i64> {
        (self.lo <= candidate && candidate <= self.hi).then_some(self.hi)
    }
}

impl Constraint {
    /// `lower <= v <= upper`. An inverted range is unsatisfiable.
    pub fn between(lower: i64, upper: i64) -> Self {
        Constraint::StaticRange { lower, upper }
    }

    /// Any value in `[LO, HI]`.
    pub fn unbounded() -> Self {
        Constraint::StaticRange { lower: LO, upper: HI }
    }

    /// Conjunction of the given clauses. No clauses means no restriction.
    pub fn and(clauses: impl IntoIterator<Item = Constraint>) -> Self {
        Constraint::Conjunction(clauses.into_iter().collect())
    }

    /// Disjunction of the given clauses. No clauses means unsatisfiable.
    pub fn or(clauses: impl IntoIterator<Item = Constraint>) -> Self {
        Constraint::Disjunction(clauses.into_iter().collect())
    }

    /// `v >= var`.
    pub fn at_least(var: Var) -> Self {
        Constraint::LinearLowerBound(vec![(1, var)])
    }

    /// `v >= c1*x1 + ... + cn*xn`.
    pub fn linear_at_least(terms: impl IntoIterator<Item = (i64, Var)>) -> Self {
        Constraint::LinearLowerBound(terms.into_iter().collect())
    }

    /// `v >= e`.
    pub fn greater_or_equal(e: impl Into<LinearExpr>) -> Self {
        Constraint::RelaxedLowerBound(e.into())
    }

    /// `v > e`.
    pub fn greater_than(e: impl Into<LinearExpr>) -> Self {
        Constraint::StrictLowerBound(e.into())
    }

    /// `v <= e`.
    pub fn less_or_equal(e: impl Into<LinearExpr>) -> Self {
        Constraint::RelaxedUpperBound(e.into())
    }

    /// `v < e`.
    pub fn less_than(e: impl Into<LinearExpr>) -> Self {
        Constraint::StrictUpperBound(e.into())
    }

    /// `v == e`.
    pub fn equal(e: impl Into<LinearExpr>) -> Self {
        Constraint::Congruence(e.into())
    }

    /// The highest-indexed variable this constraint depends on, or `None` if it
    /// depends on no variable at all.
    pub fn pivot(&self) -> Option<usize> {
        match self {
            Constraint::StaticRange { .. } => None,
            Constraint::Conjunction(clauses) | Constraint::Disjunction(clauses) => {
                clauses.iter().filter_map(Constraint::pivot).max()
            }
            Constraint::RelaxedLowerBound(e)
            | Constraint::StrictLowerBound(e)
            | Constraint::RelaxedUpperBound(e)
            | Constraint::StrictUpperBound(e)
            | Constraint::Congruence(e) => e.pivot(),
            Constraint::LinearLowerBound(terms) => terms.iter().map(|&(_, var)| var.index()).max(),
        }
    }

    /// The interval described by a single-range variant, `None` for the
    /// compound ones.
    ///
    /// Bounds are compared exactly: a lower bound above `HI`, an upper bound
    /// below `LO` or an equality target outside `[LO, HI]` leaves nothing.
    fn interval(&self, values: &[i64]) -> Option<Interval> {
        let interval = match self {
            Constraint::StaticRange { lower, upper } => Interval::new(*lower, *upper),
            Constraint::RelaxedLowerBound(e) => Interval::at_least(e.bound(values)),
            Constraint::StrictLowerBound(e) => match e.bound(values) {
                Bound::Within(v) => match v.checked_add(1) {
                    Some(lo) => Interval::new(lo, HI),
                    None => Interval::EMPTY,
                },
                bound => Interval::at_least(bound),
            },
            Constraint::RelaxedUpperBound(e) => Interval::at_most(e.bound(values)),
            Constraint::StrictUpperBound(e) => match e.bound(values) {
                // `Within` is never below LO, so this cannot underflow.
                Bound::Within(v) => Interval::new(LO, v - 1),
                bound => Interval::at_most(bound),
            },
            Constraint::Congruence(e) => match e.bound(values) {
                Bound::Within(v) => Interval::new(v, v),
                Bound::Below | Bound::Above => Interval::EMPTY,
            },
            Constraint::LinearLowerBound(terms) => {
                let sum: BigInt = terms
                    .iter()
                    .map(|&(coefficient, var)| BigInt::from(coefficient) * var.value(values))
                    .sum();
                Interval::at_least(Bound::of(&sum))
            }
            Constraint::Conjunction(_) | Constraint::Disjunction(_) => return None,
        };
        Some(interval)
    }

    /// The least feasible value `>= candidate`, or `None` if there is none.
    ///
    /// `values` must hold an assignment of at least every variable up to the
    /// [pivot][Constraint::pivot].
    pub fn greatest_lower_bound(&self, candidate: i64, values: &[i64]) -> Option<i64> {
        match self {
            Constraint::Conjunction(clauses) => {
                // Push the candidate up until every clause accepts it.
                let mut v = raise_to_lo(candidate);
                loop {
                    let mut moved = false;
                    for clause in clauses {
                        let w = clause.greatest_lower_bound(v, values)?;
                        if w != v {
                            v = w;
                            moved = true;
                        }
                    }
                    if !moved {
                        return Some(v);
                    }
                }
            }
            Constraint::Disjunction(clauses) => clauses
                .iter()
                .filter_map(|clause| clause.greatest_lower_bound(candidate, values))
                .min(),
            _ => self.interval(values)?.glb(candidate),
        }
    }

    /// For a feasible `candidate`, the greatest `u` such that every value in
    /// `[candidate, u]` is feasible. `None` if `candidate` itself is infeasible.
    ///
    /// `values` must hold an assignment of at least every variable up to the
    /// [pivot][Constraint::pivot].
    pub fn least_upper_bound(&self, candidate: i64, values: &[i64]) -> Option<i64> {
        if candidate < LO {
            return None;
        }
        match self {
            Constraint::Conjunction(clauses) => {
                let mut u = HI;
                for clause in clauses {
                    u = u.min(clause.least_upper_bound(candidate, values)?);
                }
                Some(u)
            }
            Constraint::Disjunction(clauses) => {
                let run_end = |v: i64| {
                    clauses
                        .iter()
                        .filter_map(|clause| clause.least_upper_bound(v, values))
                        .max()
                };
                let mut u = run_end(candidate)?;
                // Merge with clauses whose runs touch or overlap this one.
                while u < HI {
                    match run_end(u + 1) {
                        Some(next) => u = next,
                        None => break,
                    }
                }
                Some(u)
            }
            _ => self.interval(values)?.lub(candidate),
        }
    }

    /// The least feasible value, or `None` if the constraint is unsatisfiable
    /// under `values`.
    pub fn lower_bound(&self, values: &[i64]) -> Option<i64> {
        self.greatest_lower_bound(LO, values)
    }

    /// The end of the first feasible run, or `None` if the constraint is
    /// unsatisfiable under `values`.
    pub fn upper_bound(&self, values: &[i64]) -> Option<i64> {
        let lower = self.lower_bound(values)?;
        self.least_upper_bound(lower, values)
    }

    /// Whether `value` is feasible under `values`.
    pub fn accepts(&self, value: i64, values: &[i64]) -> bool {
        self.greatest_lower_bound(value, values) == Some(value)
    }

    /// Renders the constraint using the given variable names.
    ///
    /// Variables without a name fall back to `x{index}`.
    pub fn display_with<'a>(&'a self, names: &'a [String]) -> Named<'a> {
        Named { constraint: self, names }
    }

    pub(crate) fn fmt_with(&self, f: &mut fmt::Formatter<'_>, name: &dyn Fn(usize) -> String) -> fmt::Result {
        match self {
            Constraint::StaticRange { lower, upper } if *lower <= LO && *upper >= HI => write!(f, "unbounded"),
            Constraint::StaticRange { lower, upper } => write!(f, "between({}, {})", lower, upper),
            Constraint::Conjunction(clauses) => fmt_clauses(f, "and", clauses, name),
            Constraint::Disjunction(clauses) => fmt_clauses(f, "or", clauses, name),
            Constraint::RelaxedLowerBound(e) => fmt_relation(f, ">=", e, name),
            Constraint::StrictLowerBound(e) => fmt_relation(f, ">", e, name),
            Constraint::RelaxedUpperBound(e) => fmt_relation(f, "<=", e, name),
            Constraint::StrictUpperBound(e) => fmt_relation(f, "<", e, name),
            Constraint::Congruence(e) => fmt_relation(f, "==", e, name),
            Constraint::LinearLowerBound(terms) => {
                write!(f, ">= ")?;
                if terms.is_empty() {
                    return write!(f, "0");
                }
                for (k, &(coefficient, var)) in terms.iter().enumerate() {
                    if k > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "{}*{}", coefficient, name(var.index()))?;
                }
                Ok(())
            }
        }
    }
}

fn fmt_clauses(
    f: &mut fmt::Formatter<'_>,
    op: &str,
    clauses: &[Constraint],
    name: &dyn Fn(usize) -> String,
) -> fmt::Result {
    write!(f, "{}(", op)?;
    for (k, clause) in clauses.iter().enumerate() {
        if k > 0 {
            write!(f, ", ")?;
        }
        clause.fmt_with(f, name)?;
    }
    write!(f, ")")
}

fn fmt_relation(f: &mut fmt::Formatter<'_>, op: &str, e: &LinearExpr, name: &dyn Fn(usize) -> String) -> fmt::Result {
    write!(f, "{} ", op)?;
    e.fmt_with(f, name)
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, &|i| format!("x{}", i))
    }
}

/// Display adapter returned by [`Constraint::display_with`].
pub struct Named<'a> {
    constraint: &'a Constraint,
    names: &'a [String],
}

impl fmt::Display for Named<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names;
        self.constraint.fmt_with(f, &|i| match names.get(i) {
            Some(name) => name.clone(),
            None => format!("x{}", i),
        })
    }
}

impl BitAnd for Constraint {
    type Output = Constraint;

    fn bitand(self, rhs: Self) -> Self::Output {
        match self {
            Constraint::Conjunction(mut clauses) => {
                clauses.push(rhs);
                Constraint::Conjunction(clauses)
            }
            lhs => Constraint::and([lhs, rhs]),
        }
    }
}

impl BitOr for Constraint {
    type Output = Constraint;

    fn bitor(self, rhs: Self) -> Self::Output {
        match self {
            Constraint::Disjunction(mut clauses) => {
                clauses.push(rhs);
                Constraint::Disjunction(clauses)
            }
            lhs => Constraint::or([lhs, rhs]),
        }
    }
}
