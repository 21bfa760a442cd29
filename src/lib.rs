//! # fdset: finite-domain constraint sets
//!
//! **`fdset`** enumerates every integer assignment satisfying a list of per-variable
//! constraints, lazily and in lexicographic order.
//!
//! ## How it works
//!
//! Variables are declared one at a time, each together with the constraint that governs
//! it. A constraint may depend on variables declared *earlier* (e.g. "greater than `x`"),
//! never on later ones. The enumerator therefore fixes variables strictly left to right:
//! it asks each constraint for the feasible values given the prefix, takes the least one,
//! and backtracks when a suffix runs dry.
//!
//! ## Key Features
//!
//! - **Combinators**: ranges, relative bounds over polynomial expressions, conjunction
//!   and disjunction, see [`Constraint`][crate::constraint::Constraint].
//! - **Lazy**: solutions are produced on demand by a pull-based iterator; unbounded
//!   dimensions are fine as long as the caller stops pulling.
//! - **Complete unions**: disjunctions over disjoint ranges are enumerated in full; the
//!   search jumps over the gaps.
//! - **Overflow-free**: bounds are evaluated exactly and compared against the sentinel
//!   range [`LO`][crate::types::LO]..=[`HI`][crate::types::HI]; a bound that lies past
//!   the range on its unsatisfiable side admits no value.
//!
//! ## Basic Usage
//!
//! ```rust
//! use fdset::constraint::Constraint;
//! use fdset::set::Set;
//!
//! // Pairs (x, y) with x in [0, 5], y in [-2, 2] and y != x.
//! let mut pairs = Set::new(|v: &[i64]| (v[0], v[1]));
//! let x = pairs.declare(Constraint::between(0, 5));
//! pairs.declare(Constraint::between(-2, 2) & (Constraint::less_than(x) | Constraint::greater_than(x)));
//!
//! let all: Vec<_> = pairs.iter()?.collect();
//! assert!(all.iter().all(|&(x, y)| x != y));
//! assert_eq!(all[0], (0, -2));
//! # Ok::<(), fdset::Error>(())
//! ```
//!
//! ## Core Components
//!
//! - **[`registry`]**: declaring variables, validating declaration order.
//! - **[`search`]**: the enumerator.
//! - **[`set`]**: projecting assignments into caller-defined items.
//! - **[`expr`]**: polynomial expressions used inside bounds.

pub mod constraint;
pub mod error;
pub mod expr;
pub mod registry;
pub mod render;
pub mod search;
pub mod set;
pub mod types;

pub use error::{Error, Result};
