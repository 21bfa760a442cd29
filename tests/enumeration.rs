//! End-to-end enumeration tests.
//!
//! Tests cover the declaration surface, enumeration order, and the handling of
//! unsatisfiable and invalid declaration lists.

use fdset::constraint::Constraint;
use fdset::registry::Registry;
use fdset::set::Set;
use fdset::types::{Var, HI, LO};
use fdset::Error;
use num_bigint::BigUint;

// ─── Static Ranges ─────────────────────────────────────────────────────────────

#[test]
fn binary_pairs_in_order() {
    let mut set = Set::new(|v: &[i64]| (v[0], v[1]));
    set.declare(Constraint::between(0, 1));
    set.declare(Constraint::between(0, 1));

    let all: Vec<_> = set.iter().unwrap().collect();
    assert_eq!(all, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
}

#[test]
fn static_count_matches_enumeration() {
    let mut registry = Registry::new();
    registry.declare(Constraint::between(-1, 1));
    registry.declare(Constraint::between(10, 13));
    registry.declare(Constraint::between(0, 1));

    let count = registry.solutions().unwrap().count();
    assert_eq!(count, 3 * 4 * 2);
    assert_eq!(registry.static_count(), Some(BigUint::from(count)));
}

#[test]
fn inverted_range_yields_nothing() {
    let mut set = Set::new(|v: &[i64]| v[0]);
    set.declare(Constraint::between(3, 1));

    let mut iter = set.iter().unwrap();
    assert!(!iter.has_next());
    assert_eq!(iter.count(), 0);
}

#[test]
fn unsat_suffix_yields_nothing() {
    let mut registry = Registry::new();
    registry.declare(Constraint::between(0, 100));
    registry.declare(Constraint::or([]));
    assert_eq!(registry.solutions().unwrap().count(), 0);
}

// ─── Relative Constraints ──────────────────────────────────────────────────────

#[test]
fn not_equal_skips_diagonal() {
    let mut set = Set::new(|v: &[i64]| (v[0], v[1]));
    let x = set.declare(Constraint::between(0, 5));
    set.declare(Constraint::and([
        Constraint::between(-2, 2),
        Constraint::or([Constraint::less_than(x), Constraint::greater_than(x)]),
    ]));

    let all: Vec<_> = set.iter().unwrap().collect();
    assert!(all.iter().all(|&(x, y)| x != y));

    let expected: Vec<_> = (0..=5)
        .flat_map(|x| (-2..=2).map(move |y| (x, y)))
        .filter(|&(x, y)| x != y)
        .collect();
    assert_eq!(all, expected);
}

#[test]
fn ordered_triples() {
    // x <= y <= z within [0, 3]
    let mut set = Set::new(|v: &[i64]| [v[0], v[1], v[2]]);
    let x = set.declare(Constraint::between(0, 3));
    let y = set.declare(Constraint::between(0, 3) & Constraint::at_least(x));
    set.declare(Constraint::between(0, 3) & Constraint::greater_or_equal(y));

    let all: Vec<_> = set.iter().unwrap().collect();
    // Multisets of size 3 over 4 values.
    assert_eq!(all.len(), 20);
    assert!(all.iter().all(|t| t[0] <= t[1] && t[1] <= t[2]));
    assert!(all.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn sum_constraint() {
    // x + y == 4 with x, y in [0, 4]
    let mut set = Set::new(|v: &[i64]| (v[0], v[1]));
    let x = set.declare(Constraint::between(0, 4));
    set.declare(Constraint::between(0, 4) & Constraint::equal(-x + 4));

    let all: Vec<_> = set.iter().unwrap().collect();
    assert_eq!(all, vec![(0, 4), (1, 3), (2, 2), (3, 1), (4, 0)]);
}

#[test]
fn squares_below_bound() {
    // y == x * x, y < 10
    let mut set = Set::new(|v: &[i64]| v[1]);
    let x = set.declare(Constraint::between(-5, 5));
    set.declare(Constraint::equal(x * x) & Constraint::less_than(10));

    let all: Vec<_> = set.iter().unwrap().collect();
    assert_eq!(all, vec![9, 4, 1, 0, 1, 4, 9]);
}

#[test]
fn linear_lower_bound_chain() {
    // y >= 2*x, y <= 2*x + 1
    let mut set = Set::new(|v: &[i64]| (v[0], v[1]));
    let x = set.declare(Constraint::between(0, 2));
    set.declare(Constraint::linear_at_least([(2, x)]) & Constraint::less_or_equal(x * 2 + 1));

    let all: Vec<_> = set.iter().unwrap().collect();
    assert_eq!(all, vec![(0, 0), (0, 1), (1, 2), (1, 3), (2, 4), (2, 5)]);
}

// ─── Bounds Beyond the Sentinels ───────────────────────────────────────────────

/// Solutions of `y ~ make(x)` for `x` fixed to `x_value`.
fn with_fixed_x(x_value: i64, make: impl Fn(Var) -> Constraint) -> Vec<Vec<i64>> {
    let mut registry = Registry::new();
    let x = registry.declare(Constraint::between(x_value, x_value));
    registry.declare(make(x));
    registry.solutions().unwrap().collect()
}

#[test]
fn lower_bound_above_hi_has_no_solution() {
    // y >= 3 * i64::MAX
    assert!(with_fixed_x(3, |x| Constraint::linear_at_least([(i64::MAX, x)])).is_empty());
    assert!(with_fixed_x(3, |x| Constraint::greater_or_equal(x * i64::MAX)).is_empty());
    assert!(with_fixed_x(3, |x| Constraint::greater_than(x * i64::MAX)).is_empty());
}

#[test]
fn upper_bound_below_lo_has_no_solution() {
    // y <= -3 * i64::MAX
    assert!(with_fixed_x(-3, |x| Constraint::less_or_equal(x * i64::MAX)).is_empty());
    assert!(with_fixed_x(-3, |x| Constraint::less_than(x * i64::MAX)).is_empty());
}

#[test]
fn equality_outside_sentinels_has_no_solution() {
    assert!(with_fixed_x(3, |x| Constraint::equal(x * i64::MAX)).is_empty());
    assert!(with_fixed_x(-3, |x| Constraint::equal(x * i64::MAX)).is_empty());
}

#[test]
fn bounds_at_the_sentinels_stay_feasible() {
    assert_eq!(with_fixed_x(1, |x| Constraint::equal(x * i64::MAX)), vec![vec![1, HI]]);
    assert_eq!(with_fixed_x(-1, |x| Constraint::equal(x * i64::MAX)), vec![vec![-1, LO]]);
    assert_eq!(
        with_fixed_x(1, |x| Constraint::linear_at_least([(i64::MAX, x)])),
        vec![vec![1, HI]]
    );
}

// ─── Disjunctions ──────────────────────────────────────────────────────────────

#[test]
fn disjoint_union_depends_on_prefix() {
    // y in [x - 10, x - 9] or [x + 9, x + 10]
    let mut set = Set::new(|v: &[i64]| (v[0], v[1]));
    let x = set.declare(Constraint::between(0, 1));
    set.declare(Constraint::or([
        Constraint::greater_or_equal(x - 10) & Constraint::less_or_equal(x - 9),
        Constraint::greater_or_equal(x + 9) & Constraint::less_or_equal(x + 10),
    ]));

    let all: Vec<_> = set.iter().unwrap().collect();
    assert_eq!(
        all,
        vec![
            (0, -10),
            (0, -9),
            (0, 9),
            (0, 10),
            (1, -9),
            (1, -8),
            (1, 10),
            (1, 11),
        ]
    );
}

#[test]
fn overlapping_union_has_no_duplicates() {
    let mut registry = Registry::new();
    registry.declare(Constraint::between(0, 5) | Constraint::between(3, 8) | Constraint::between(8, 9));
    let all: Vec<_> = registry.solutions().unwrap().map(|v| v[0]).collect();
    assert_eq!(all, (0..=9).collect::<Vec<_>>());
}

// ─── Protocol ──────────────────────────────────────────────────────────────────

#[test]
fn fresh_enumerators_repeat_the_sequence() {
    let mut registry = Registry::new();
    let x = registry.declare(Constraint::between(0, 4));
    registry.declare(Constraint::between(0, 4) & Constraint::greater_than(x));

    let first: Vec<_> = registry.solutions().unwrap().collect();
    let second: Vec<_> = registry.solutions().unwrap().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 10);
}

#[test]
fn early_termination() {
    let mut registry = Registry::new();
    registry.declare(Constraint::unbounded());
    let first: Vec<_> = registry.solutions().unwrap().take(2).map(|v| v[0]).collect();
    assert_eq!(first, vec![LO, LO + 1]);
}

#[test]
fn projection_runs_once_per_solution() {
    use std::cell::Cell;
    use std::rc::Rc;

    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let mut set = Set::new(move |v: &[i64]| {
        counter.set(counter.get() + 1);
        v[0]
    });
    set.declare(Constraint::between(0, 9));

    let mut iter = set.iter().unwrap();
    assert!(iter.has_next());
    assert_eq!(calls.get(), 0);
    let first: Vec<_> = iter.by_ref().take(3).collect();
    assert_eq!(first, vec![0, 1, 2]);
    assert_eq!(calls.get(), 3);
}

// ─── Invalid Declarations ──────────────────────────────────────────────────────

#[test]
fn forward_reference_is_rejected() {
    let mut donor = Registry::new();
    let _ = donor.declare(Constraint::between(0, 1));
    let _ = donor.declare(Constraint::between(0, 1));
    let later = donor.declare(Constraint::between(0, 1));

    let mut registry = Registry::new();
    registry.declare(Constraint::between(0, 1));
    registry.declare(Constraint::between(0, 1) & Constraint::less_than(later));
    registry.declare(Constraint::between(0, 1));

    let err = registry.solutions().unwrap_err();
    assert_eq!(err, Error::ForwardReference { index: 1, pivot: 2 });
    assert_eq!(err.to_string(), "constraint 1 depends on variable 2");
}

#[test]
fn self_reference_is_rejected() {
    let mut donor = Registry::new();
    let own = donor.declare(Constraint::between(0, 1));

    let mut set = Set::new(|v: &[i64]| v[0]);
    set.declare(Constraint::equal(own));
    assert!(matches!(
        set.iter().err(),
        Some(Error::ForwardReference { index: 0, pivot: 0 })
    ));
}
