//! Constraint definitions

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::expr::{LinearExpr, Rhs};

/// Comparison operator between the two sides of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "<")]
    Lt,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Ge => ">=",
            Operator::Gt => ">",
            Operator::Eq => "=",
            Operator::Le => "<=",
            Operator::Lt => "<",
        }
    }

    /// Evaluates `lhs op rhs`.
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Operator::Ge => lhs >= rhs,
            Operator::Gt => lhs > rhs,
            Operator::Eq => lhs == rhs,
            Operator::Le => lhs <= rhs,
            Operator::Lt => lhs < rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A linear comparison identified by a unique id such as `C0001`.
///
/// # Example
///
/// ```
/// use allocspec_core::{Constraint, LinearExpr, Operator};
///
/// let c = Constraint::new("C0001", LinearExpr::var("food[A]"), Operator::Eq, 3);
/// assert_eq!(c.to_string(), "C0001: food[A] = 3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint {
    pub id: String,
    pub lhs: LinearExpr,
    pub op: Operator,
    pub rhs: Rhs,
}

impl Constraint {
    pub fn new(id: impl Into<String>, lhs: LinearExpr, op: Operator, rhs: impl Into<Rhs>) -> Self {
        Self {
            id: id.into(),
            lhs,
            op,
            rhs: rhs.into(),
        }
    }

    /// Every variable id referenced on either side.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.lhs.variables().chain(self.rhs.variables())
    }

    /// Returns true if either side references a variable in `vars`.
    pub fn references_any(&self, vars: &HashSet<String>) -> bool {
        self.lhs.references_any(vars) || self.rhs.references_any(vars)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {} {}", self.id, self.lhs, self.op, self.rhs)
    }
}
