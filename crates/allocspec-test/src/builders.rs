//! Terse constructors for test specifications.
//!
//! # Example
//!
//! ```
//! use allocspec_core::Operator;
//! use allocspec_test::builders::{cmp, grid_spec};
//!
//! let mut spec = grid_spec(&["food"], &["A", "B"]);
//! spec.constraints.push(cmp("C0001", "food[A]", Operator::Ge, 2));
//! assert_eq!(spec.check_invariants(), Ok(()));
//! ```

use allocspec_core::{Constraint, LinearExpr, Operator, Resource, Specification, Variable};

/// `var op rhs` with a constant right-hand side.
pub fn cmp(id: &str, var: &str, op: Operator, rhs: i64) -> Constraint {
    Constraint::new(id, LinearExpr::var(var), op, rhs)
}

/// `var op Σ rhs_vars` with an expression right-hand side.
pub fn cmp_expr(id: &str, var: &str, op: Operator, rhs_vars: &[&str]) -> Constraint {
    Constraint::new(id, LinearExpr::var(var), op, sum(rhs_vars))
}

/// Unit-coefficient sum of the given variables.
pub fn sum(vars: &[&str]) -> LinearExpr {
    vars.iter()
        .fold(LinearExpr::default(), |expr, var| expr.plus(*var, 1))
}

/// A specification holding every `resource × node` variable and no
/// constraints or edges, at version 1.
pub fn grid_spec(resources: &[&str], nodes: &[&str]) -> Specification {
    let mut spec = Specification::new();
    spec.resources = resources.iter().map(|r| Resource::named(*r)).collect();
    spec.locations.nodes = nodes.iter().map(|n| n.to_string()).collect();
    spec.vars = resources
        .iter()
        .flat_map(|r| nodes.iter().map(move |n| Variable::for_pair(r, n)))
        .collect();
    spec
}
