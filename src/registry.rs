//! Declaration of variables and their governing constraints.
//!
//! A [`Registry`] hands out one [`Var`] per declared constraint, in order. A
//! constraint may only refer to variables declared *before* it (its
//! [pivot][Constraint::pivot] must be smaller than its own index). This is what
//! lets the enumerator fix variables strictly left to right: by the time a
//! variable is assigned, everything its constraint reads is already known.
//!
//! The check runs whenever an enumerator is requested. Enumerators borrow the
//! registry, so it is frozen for as long as any of them is alive.
//!
//! # Example
//!
//! ```
//! use fdset::constraint::Constraint;
//! use fdset::registry::Registry;
//!
//! let mut registry = Registry::new();
//! let x = registry.declare(Constraint::between(0, 1));
//! let _y = registry.declare(Constraint::between(0, 1));
//!
//! let all: Vec<Vec<i64>> = registry.solutions().unwrap().collect();
//! assert_eq!(all, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
//! assert_eq!(x.index(), 0);
//! ```

use log::debug;
use num_bigint::{BigInt, BigUint};

use crate::constraint::Constraint;
use crate::error::{Error, Result};
use crate::search::Solutions;
use crate::set::Projected;
use crate::types::{Var, LO};

/// An ordered list of variable declarations.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    constraints: Vec<Constraint>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new variable governed by `constraint` and returns its handle.
    pub fn declare(&mut self, constraint: Constraint) -> Var {
        let var = Var::new(self.constraints.len());
        debug!("declare({} ~ {})", var, constraint);
        self.constraints.push(constraint);
        var
    }

    /// Number of declared variables.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// The constraint governing `var`.
    ///
    /// # Panics
    ///
    /// Panics if `var` was not declared in this registry.
    pub fn constraint(&self, var: Var) -> &Constraint {
        &self.constraints[var.index()]
    }

    /// The constraint governing `var`, if it was declared here.
    pub fn get(&self, var: Var) -> Option<&Constraint> {
        self.constraints.get(var.index())
    }

    /// All declarations, in order.
    pub fn iter(&self) -> impl Iterator<Item = (Var, &Constraint)> + '_ {
        self.constraints.iter().enumerate().map(|(i, c)| (Var::new(i), c))
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Checks that every constraint only refers to variables declared before it.
    pub fn validate(&self) -> Result<()> {
        for (index, constraint) in self.constraints.iter().enumerate() {
            if let Some(pivot) = constraint.pivot() {
                if pivot >= index {
                    debug!("validate: constraint {} depends on variable {}", index, pivot);
                    return Err(Error::ForwardReference { index, pivot });
                }
            }
        }
        Ok(())
    }

    /// Returns a lazy enumerator over all satisfying assignments, in
    /// lexicographic order.
    ///
    /// Fails if the declarations violate the ordering requirement.
    pub fn solutions(&self) -> Result<Solutions<'_>> {
        self.validate()?;
        Ok(Solutions::new(&self.constraints))
    }

    /// Like [`solutions`][Registry::solutions], but maps every assignment
    /// through `projection` instead of yielding the raw values.
    pub fn project<T, F>(&self, projection: F) -> Result<Projected<'_, F>>
    where
        F: Fn(&[i64]) -> T,
    {
        Ok(Projected::new(self.solutions()?, projection))
    }

    /// The exact number of solutions, when every declaration is a static range.
    ///
    /// Returns `None` as soon as any declaration depends on other variables or
    /// is compound; counting those requires enumeration.
    pub fn static_count(&self) -> Option<BigUint> {
        let mut count = BigUint::from(1u32);
        for constraint in &self.constraints {
            match *constraint {
                Constraint::StaticRange { lower, upper } => {
                    let lower = lower.max(LO);
                    let width = if lower <= upper {
                        let width: BigInt = BigInt::from(upper) - BigInt::from(lower) + BigInt::from(1);
                        width.to_biguint()?
                    } else {
                        BigUint::ZERO
                    };
                    count *= width;
                }
                _ => return None,
            }
        }
        Some(count)
    }
}
