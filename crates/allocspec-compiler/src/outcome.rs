//! Solve outcomes expressed in specification terms.

use std::fmt;

/// One variable's value in a satisfying model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub var: String,
    pub value: i64,
}

impl Assignment {
    pub fn new(var: impl Into<String>, value: i64) -> Self {
        Self {
            var: var.into(),
            value,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.var, self.value)
    }
}

/// Decided result of checking a compiled specification.
///
/// The undecided case is not an outcome; it surfaces as
/// [`SpecError::SolverUndecided`](allocspec_core::SpecError::SolverUndecided).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A value for every declared variable, in declaration order.
    Satisfiable(Vec<Assignment>),
    /// Ids of the constraints in the unsatisfiable core.
    Unsatisfiable(Vec<String>),
}

impl SolveOutcome {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SolveOutcome::Satisfiable(_))
    }

    pub fn assignments(&self) -> Option<&[Assignment]> {
        match self {
            SolveOutcome::Satisfiable(assignments) => Some(assignments),
            SolveOutcome::Unsatisfiable(_) => None,
        }
    }

    pub fn core(&self) -> Option<&[String]> {
        match self {
            SolveOutcome::Satisfiable(_) => None,
            SolveOutcome::Unsatisfiable(ids) => Some(ids),
        }
    }

    /// Value assigned to `var`, if satisfiable and declared.
    pub fn value_of(&self, var: &str) -> Option<i64> {
        self.assignments()?
            .iter()
            .find(|a| a.var == var)
            .map(|a| a.value)
    }

    /// Flat result lines: `"<var> = <int>"` per assignment, or one
    /// constraint id per line for a core.
    pub fn lines(&self) -> Vec<String> {
        match self {
            SolveOutcome::Satisfiable(assignments) => {
                assignments.iter().map(ToString::to_string).collect()
            }
            SolveOutcome::Unsatisfiable(ids) => ids.clone(),
        }
    }
}
