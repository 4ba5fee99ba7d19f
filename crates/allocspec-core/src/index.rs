//! Reverse index from variables to the constraints that reference them.
//!
//! Both cascading removals (resource and node) ask the same question:
//! "which constraints mention any of these variables?". The index answers it
//! in one place so the engine never re-derives it per change kind.

use std::collections::{BTreeSet, HashMap};

use crate::domain::Constraint;

/// Variable id -> positions of referencing constraints.
///
/// Built by a single scan over a constraint slice; positions are indices
/// into that slice. Both the lhs and a linear-expression rhs are scanned.
///
/// # Example
///
/// ```
/// use allocspec_core::{Constraint, LinearExpr, Operator, ReferenceIndex};
///
/// let constraints = vec![
///     Constraint::new("C0001", LinearExpr::var("food[A]"), Operator::Eq, 3),
///     Constraint::new("C0002", LinearExpr::var("food[B]"), Operator::Gt, LinearExpr::var("food[A]")),
///     Constraint::new("C0003", LinearExpr::var("water[B]"), Operator::Eq, 5),
/// ];
/// let index = ReferenceIndex::build(&constraints);
///
/// assert_eq!(index.referencing_ids(["food[A]"]), vec!["C0001", "C0002"]);
/// assert!(!index.is_referenced("water[A]"));
/// ```
#[derive(Debug)]
pub struct ReferenceIndex<'a> {
    constraints: &'a [Constraint],
    by_var: HashMap<&'a str, BTreeSet<usize>>,
}

impl<'a> ReferenceIndex<'a> {
    pub fn build(constraints: &'a [Constraint]) -> Self {
        let mut by_var: HashMap<&'a str, BTreeSet<usize>> = HashMap::new();
        for (pos, constraint) in constraints.iter().enumerate() {
            for var in constraint.variables() {
                by_var.entry(var).or_default().insert(pos);
            }
        }
        Self {
            constraints,
            by_var,
        }
    }

    pub fn is_referenced(&self, var: &str) -> bool {
        self.by_var.contains_key(var)
    }

    /// Positions of constraints referencing any variable in `vars`, ascending.
    pub fn referencing<'v, I>(&self, vars: I) -> BTreeSet<usize>
    where
        I: IntoIterator<Item = &'v str>,
    {
        vars.into_iter()
            .filter_map(|v| self.by_var.get(v))
            .flatten()
            .copied()
            .collect()
    }

    /// Ids of constraints referencing any variable in `vars`, in document order.
    pub fn referencing_ids<'v, I>(&self, vars: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'v str>,
    {
        self.referencing(vars)
            .into_iter()
            .map(|pos| self.constraints[pos].id.as_str())
            .collect()
    }
}
