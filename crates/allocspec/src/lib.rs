//! AllocSpec - versioned resource-allocation specifications
//!
//! A [`SpecSession`] owns the change history of one specification lineage.
//! Submit typed [`Change`]s, then [`solve`](SpecSession::solve) the current
//! snapshot to get either an assignment for every variable or the ids of a
//! conflicting constraint set.
//!
//! # Example
//!
//! ```rust
//! use allocspec::prelude::*;
//!
//! let mut session = SpecSession::new(AllocSpecConfig::default());
//! session.submit([
//!     Change::add_node("A"),
//!     Change::add_resource(Resource::named("food")),
//!     Change::add_constraint_auto(Constraint::new(
//!         AUTO_ID,
//!         LinearExpr::var("food[A]"),
//!         Operator::Ge,
//!         2,
//!     )),
//! ]);
//!
//! let report = session.solve().unwrap();
//! assert_eq!(report.result, Some(SolveResult::Sat));
//! assert_eq!(report.value_of("food[A]"), Some(2));
//! ```

mod report;
mod session;

pub use allocspec_compiler::{BoundedSolver, SolveOutcome, SolverBackend};
pub use allocspec_config::{AllocSpecConfig, ConfigError, EnvironmentMode, SolverLimits};
pub use allocspec_core::{
    Constraint, Edge, InvariantViolation, LinearExpr, Operator, Resource, Rhs, SpecError,
    Specification, Term, Variable,
};
pub use allocspec_engine::{Change, ChangeEvent, ChangeKind, SpecHistory, UpdateConstraint, AUTO_ID};

pub use report::{SolveReport, SolveResult, NO_CONSTRAINTS_NOTE};
pub use session::SpecSession;

pub mod prelude {
    pub use super::{AllocSpecConfig, EnvironmentMode};
    pub use super::{Change, ChangeEvent, UpdateConstraint, AUTO_ID};
    pub use super::{Constraint, LinearExpr, Operator, Resource, Specification};
    pub use super::{SolveReport, SolveResult, SpecSession};
}
