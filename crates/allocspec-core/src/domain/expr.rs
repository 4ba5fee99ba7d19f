//! Linear expressions over decision variables

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

fn default_coef() -> i64 {
    1
}

/// A variable reference scaled by an integer coefficient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub var: String,
    #[serde(default = "default_coef")]
    pub coef: i64,
}

impl Term {
    pub fn new(var: impl Into<String>, coef: i64) -> Self {
        Self {
            var: var.into(),
            coef,
        }
    }
}

/// `Σ(coef_i × var_i) + const`.
///
/// # Example
///
/// ```
/// use allocspec_core::LinearExpr;
///
/// let expr = LinearExpr::var("water[A]").plus("water[B]", 1).offset(2);
/// assert_eq!(expr.to_string(), "water[A] + water[B] + 2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinearExpr {
    #[serde(default)]
    pub terms: Vec<Term>,
    #[serde(rename = "const", default)]
    pub constant: i64,
}

impl LinearExpr {
    pub fn new(terms: Vec<Term>, constant: i64) -> Self {
        Self { terms, constant }
    }

    /// A single variable with coefficient 1.
    pub fn var(id: impl Into<String>) -> Self {
        Self::new(vec![Term::new(id, 1)], 0)
    }

    /// A constant expression with no terms.
    pub fn constant(value: i64) -> Self {
        Self::new(Vec::new(), value)
    }

    /// Appends a term.
    pub fn plus(mut self, var: impl Into<String>, coef: i64) -> Self {
        self.terms.push(Term::new(var, coef));
        self
    }

    /// Replaces the constant.
    pub fn offset(mut self, constant: i64) -> Self {
        self.constant = constant;
        self
    }

    /// Variable ids referenced by this expression, in term order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.var.as_str())
    }

    pub fn references_any(&self, vars: &HashSet<String>) -> bool {
        self.variables().any(|v| vars.contains(v))
    }

    /// Returns the canonical form: one term per variable, zero coefficients
    /// dropped, terms sorted by variable id.
    ///
    /// The change engine never calls this; upstream translators do.
    pub fn canonicalize(&self) -> Self {
        let mut merged: BTreeMap<&str, i64> = BTreeMap::new();
        for term in &self.terms {
            *merged.entry(term.var.as_str()).or_insert(0) += term.coef;
        }
        let terms = merged
            .into_iter()
            .filter(|(_, coef)| *coef != 0)
            .map(|(var, coef)| Term::new(var, coef))
            .collect();
        Self::new(terms, self.constant)
    }

    pub fn is_canonical(&self) -> bool {
        self.terms.iter().all(|t| t.coef != 0)
            && self.terms.windows(2).all(|w| w[0].var < w[1].var)
    }
}

impl fmt::Display for LinearExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            let coef = if i == 0 {
                term.coef
            } else if term.coef < 0 {
                f.write_str(" - ")?;
                -term.coef
            } else {
                f.write_str(" + ")?;
                term.coef
            };
            match coef {
                1 => write!(f, "{}", term.var)?,
                -1 => write!(f, "-{}", term.var)?,
                c => write!(f, "{}*{}", c, term.var)?,
            }
        }
        if self.terms.is_empty() {
            write!(f, "{}", self.constant)
        } else if self.constant > 0 {
            write!(f, " + {}", self.constant)
        } else if self.constant < 0 {
            write!(f, " - {}", -self.constant)
        } else {
            Ok(())
        }
    }
}

/// Right-hand side of a constraint: an integer literal or another expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rhs {
    Const(i64),
    Expr(LinearExpr),
}

impl Rhs {
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        let terms: &[Term] = match self {
            Rhs::Const(_) => &[],
            Rhs::Expr(expr) => &expr.terms,
        };
        terms.iter().map(|t| t.var.as_str())
    }

    pub fn references_any(&self, vars: &HashSet<String>) -> bool {
        self.variables().any(|v| vars.contains(v))
    }
}

impl From<i64> for Rhs {
    fn from(value: i64) -> Self {
        Rhs::Const(value)
    }
}

impl From<LinearExpr> for Rhs {
    fn from(expr: LinearExpr) -> Self {
        Rhs::Expr(expr)
    }
}

impl fmt::Display for Rhs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rhs::Const(value) => write!(f, "{value}"),
            Rhs::Expr(expr) => write!(f, "{expr}"),
        }
    }
}
