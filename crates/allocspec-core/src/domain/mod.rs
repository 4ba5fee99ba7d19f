//! Domain model for allocation specifications
//!
//! - `Resource`: a named, unit-labeled quantity to allocate
//! - `LocationGraph`: nodes and directed edges between them
//! - `Variable`: one integer decision quantity per (resource, node) pair
//! - `LinearExpr` / `Constraint`: linear comparisons over variables
//! - `Specification`: the versioned document aggregating all of the above

mod constraint;
mod expr;
mod location;
mod resource;
mod spec;
mod variable;


pub use constraint::{Constraint, Operator};
pub use expr::{LinearExpr, Rhs, Term};
pub use location::{Edge, LocationGraph};
pub use resource::{Resource, DEFAULT_UNIT};
pub use spec::Specification;
pub use variable::{split_var_id, var_id, Sort, Variable};
