//! Sparse polynomial expressions over declared variables.
//!
//! A [`LinearExpr`] is a sum of [`Term`]s, each a coefficient times a multiset
//! of variables. Expressions are kept in normal form: terms over the same
//! multiset are merged, zero coefficients are dropped and the remaining terms
//! are sorted by their (sorted) variable list, so structural equality is
//! semantic equality. The constant term is the one with an empty variable list
//! and therefore always comes first.
//!
//! Despite the name, terms may repeat a variable (`x*x`); the constraint
//! engine only ever asks an expression to [`evaluate`][LinearExpr::evaluate]
//! itself against a partial assignment.
//!
//! # Example
//!
//! ```
//! use fdset::expr::LinearExpr;
//! use fdset::registry::Registry;
//! use fdset::constraint::Constraint;
//!
//! let mut registry = Registry::new();
//! let x = registry.declare(Constraint::between(0, 9));
//! let y = registry.declare(Constraint::between(0, 9));
//!
//! let e = x * 2 + y - 1;
//! assert_eq!(e.evaluate(&[3, 4]), 9);
//! assert_eq!(e.to_string(), "-1 + 2*x0 + x1");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::{BigInt, Sign};

use crate::types::{Var, HI, LO};

/// A single monomial: `coefficient * x_i * x_j * ...`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Term {
    coefficient: BigInt,
    /// Sorted variable indices; an index repeated `k` times is raised to `k`.
    vars: Vec<usize>,
}

impl Term {
    /// Creates a term. The variable list is sorted into canonical order.
    pub fn new(coefficient: impl Into<BigInt>, vars: impl IntoIterator<Item = Var>) -> Self {
        let mut vars: Vec<usize> = vars.into_iter().map(Var::index).collect();
        vars.sort_unstable();
        Term {
            coefficient: coefficient.into(),
            vars,
        }
    }

    /// Creates a constant term.
    pub fn constant(coefficient: impl Into<BigInt>) -> Self {
        Term {
            coefficient: coefficient.into(),
            vars: Vec::new(),
        }
    }

    pub fn coefficient(&self) -> &BigInt {
        &self.coefficient
    }

    /// Sorted variable indices of this term.
    pub fn vars(&self) -> &[usize] {
        &self.vars
    }

    pub fn is_constant(&self) -> bool {
        self.vars.is_empty()
    }

    /// Total degree of the monomial.
    pub fn degree(&self) -> usize {
        self.vars.len()
    }

    fn is_zero(&self) -> bool {
        self.coefficient == BigInt::ZERO
    }

    /// Exact value of this term under the given assignment.
    ///
    /// # Panics
    ///
    /// Panics if the assignment does not cover every variable of the term.
    pub fn evaluate_exact(&self, values: &[i64]) -> BigInt {
        self.vars
            .iter()
            .fold(self.coefficient.clone(), |acc, &i| acc * values[i])
    }

    fn evaluate_checked(&self, values: &[i64]) -> Option<i64> {
        let coefficient = i64::try_from(&self.coefficient).ok()?;
        self.vars
            .iter()
            .try_fold(coefficient, |acc, &i| acc.checked_mul(values[i]))
    }

    fn multiply(&self, other: &Term) -> Term {
        let mut vars = Vec::with_capacity(self.vars.len() + other.vars.len());
        vars.extend_from_slice(&self.vars);
        vars.extend_from_slice(&other.vars);
        vars.sort_unstable();
        Term {
            coefficient: &self.coefficient * &other.coefficient,
            vars,
        }
    }

    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, name: &dyn Fn(usize) -> String) -> fmt::Result {
        if self.vars.is_empty() {
            return write!(f, "{}", self.coefficient);
        }
        let one = BigInt::from(1);
        if self.coefficient == -one.clone() {
            write!(f, "-")?;
        } else if self.coefficient != one {
            write!(f, "{}*", self.coefficient)?;
        }
        for (k, &i) in self.vars.iter().enumerate() {
            if k > 0 {
                write!(f, "*")?;
            }
            write!(f, "{}", name(i))?;
        }
        Ok(())
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.vars
            .cmp(&other.vars)
            .then_with(|| self.coefficient.cmp(&other.coefficient))
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, &|i| format!("x{}", i))
    }
}

/// A polynomial in normal form. See the [module documentation](self).
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct LinearExpr {
    terms: Vec<Term>,
}

impl LinearExpr {
    /// The zero expression (no terms).
    pub fn zero() -> Self {
        LinearExpr { terms: Vec::new() }
    }

    pub fn constant(value: impl Into<BigInt>) -> Self {
        LinearExpr::zero().add_term(Term::constant(value))
    }

    pub fn var(var: Var) -> Self {
        LinearExpr::zero().add_term(Term::new(1, [var]))
    }

    /// A single monomial `coefficient * vars[0] * vars[1] * ...`.
    pub fn term(coefficient: impl Into<BigInt>, vars: impl IntoIterator<Item = Var>) -> Self {
        LinearExpr::zero().add_term(Term::new(coefficient, vars))
    }

    /// Builds the normal form of a sum of terms.
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
        terms.into_iter().fold(LinearExpr::zero(), LinearExpr::add_term)
    }

    /// Terms in canonical order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether the expression mentions no variables.
    pub fn is_constant(&self) -> bool {
        self.terms.iter().all(Term::is_constant)
    }

    /// Coefficient of the constant term (zero if absent).
    pub fn constant_part(&self) -> BigInt {
        match self.terms.first() {
            Some(t) if t.is_constant() => t.coefficient.clone(),
            _ => BigInt::ZERO,
        }
    }

    /// The highest variable index this expression refers to, if any.
    pub fn pivot(&self) -> Option<usize> {
        self.terms.iter().filter_map(|t| t.vars.last().copied()).max()
    }

    /// Adds a single term, merging it with an existing term over the same
    /// variables. A merged coefficient of zero removes the term entirely.
    pub fn add_term(mut self, term: Term) -> Self {
        match self.terms.binary_search_by(|t| t.vars.cmp(&term.vars)) {
            Ok(i) => {
                self.terms[i].coefficient += term.coefficient;
                if self.terms[i].is_zero() {
                    self.terms.remove(i);
                }
            }
            Err(i) => {
                if !term.is_zero() {
                    self.terms.insert(i, term);
                }
            }
        }
        self
    }

    /// Multiplies every coefficient by `factor`.
    pub fn scale(&self, factor: impl Into<BigInt>) -> Self {
        let factor = factor.into();
        if factor == BigInt::ZERO {
            return LinearExpr::zero();
        }
        LinearExpr {
            terms: self
                .terms
                .iter()
                .map(|t| Term {
                    coefficient: &t.coefficient * &factor,
                    vars: t.vars.clone(),
                })
                .collect(),
        }
    }

    fn multiply(&self, other: &LinearExpr) -> LinearExpr {
        let mut result = LinearExpr::zero();
        for a in &self.terms {
            for b in &other.terms {
                result = result.add_term(a.multiply(b));
            }
        }
        result
    }

    /// Exact value of the expression under the given assignment.
    ///
    /// # Panics
    ///
    /// Panics if the assignment does not cover every referenced variable.
    pub fn evaluate_exact(&self, values: &[i64]) -> BigInt {
        self.terms.iter().map(|t| t.evaluate_exact(values)).sum()
    }

    /// Value of the expression under the given assignment, saturated into the
    /// sentinel range `[LO, HI]`.
    ///
    /// # Panics
    ///
    /// Panics if the assignment does not cover every referenced variable.
    pub fn evaluate(&self, values: &[i64]) -> i64 {
        match self.bound(values) {
            Bound::Below => LO,
            Bound::Within(v) => v,
            Bound::Above => HI,
        }
    }

    /// Where the exact value of the expression falls relative to `[LO, HI]`.
    pub(crate) fn bound(&self, values: &[i64]) -> Bound {
        let fast = self
            .terms
            .iter()
            .try_fold(0i64, |acc, t| acc.checked_add(t.evaluate_checked(values)?));
        match fast {
            Some(v) => Bound::of_i64(v),
            None => Bound::of(&self.evaluate_exact(values)),
        }
    }

    /// Renders the expression using the given variable names.
    ///
    /// Variables without a name fall back to `x{index}`.
    pub fn display_with<'a>(&'a self, names: &'a [String]) -> Named<'a> {
        Named { expr: self, names }
    }

    pub(crate) fn fmt_with(&self, f: &mut fmt::Formatter<'_>, name: &dyn Fn(usize) -> String) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (k, t) in self.terms.iter().enumerate() {
            if k > 0 {
                write!(f, " + ")?;
            }
            t.fmt_with(f, name)?;
        }
        Ok(())
    }
}

/// Position of an exact value relative to the sentinel range `[LO, HI]`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Bound {
    Below,
    Within(i64),
    Above,
}

impl Bound {
    pub(crate) fn of(value: &BigInt) -> Self {
        match i64::try_from(value) {
            Ok(v) => Bound::of_i64(v),
            Err(_) if value.sign() == Sign::Minus => Bound::Below,
            Err(_) => Bound::Above,
        }
    }

    fn of_i64(value: i64) -> Self {
        if value < LO {
            Bound::Below
        } else {
            Bound::Within(value)
        }
    }
}

impl fmt::Display for LinearExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, &|i| format!("x{}", i))
    }
}

/// Display adapter returned by [`LinearExpr::display_with`].
pub struct Named<'a> {
    expr: &'a LinearExpr,
    names: &'a [String],
}

impl fmt::Display for Named<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names;
        self.expr.fmt_with(f, &|i| match names.get(i) {
            Some(name) => name.clone(),
            None => format!("x{}", i),
        })
    }
}

impl From<Var> for LinearExpr {
    fn from(var: Var) -> Self {
        LinearExpr::var(var)
    }
}

impl From<i64> for LinearExpr {
    fn from(value: i64) -> Self {
        LinearExpr::constant(value)
    }
}

impl From<i32> for LinearExpr {
    fn from(value: i32) -> Self {
        LinearExpr::constant(value)
    }
}

impl From<Term> for LinearExpr {
    fn from(term: Term) -> Self {
        LinearExpr::zero().add_term(term)
    }
}

impl<T: Into<LinearExpr>> Add<T> for LinearExpr {
    type Output = LinearExpr;

    fn add(self, rhs: T) -> Self::Output {
        rhs.into().terms.into_iter().fold(self, LinearExpr::add_term)
    }
}

impl<T: Into<LinearExpr>> Sub<T> for LinearExpr {
    type Output = LinearExpr;

    fn sub(self, rhs: T) -> Self::Output {
        self + (-rhs.into())
    }
}

impl<T: Into<LinearExpr>> Mul<T> for LinearExpr {
    type Output = LinearExpr;

    fn mul(self, rhs: T) -> Self::Output {
        self.multiply(&rhs.into())
    }
}

impl Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> Self::Output {
        self.scale(-1)
    }
}

impl<T: Into<LinearExpr>> Add<T> for Var {
    type Output = LinearExpr;

    fn add(self, rhs: T) -> Self::Output {
        LinearExpr::var(self) + rhs
    }
}

impl<T: Into<LinearExpr>> Sub<T> for Var {
    type Output = LinearExpr;

    fn sub(self, rhs: T) -> Self::Output {
        LinearExpr::var(self) - rhs
    }
}

impl<T: Into<LinearExpr>> Mul<T> for Var {
    type Output = LinearExpr;

    fn mul(self, rhs: T) -> Self::Output {
        LinearExpr::var(self) * rhs
    }
}

impl Neg for Var {
    type Output = LinearExpr;

    fn neg(self) -> Self::Output {
        -LinearExpr::var(self)
    }
}
