//! Error types for AllocSpec

use thiserror::Error;

/// Fatal conditions raised while compiling or solving a specification.
///
/// Structural no-ops in the change engine are not errors and never show up
/// here; a change with a dangling target simply leaves the document as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// A constraint references a variable the compiled model never declared.
    #[error("Undeclared variable '{var}' in constraint {constraint}")]
    UndeclaredVariable { constraint: String, var: String },

    /// A variable carries a sort other than integer.
    #[error("Unsupported sort for variable '{var}': {sort}")]
    UnsupportedSort { var: String, sort: String },

    /// The solving capability could decide neither satisfiable nor unsatisfiable.
    #[error("Solver returned unknown: {reason}")]
    SolverUndecided { reason: String },
}

/// Result type alias for AllocSpec operations
pub type Result<T> = std::result::Result<T, SpecError>;
