//! The solving-capability seam.
//!
//! A backend only ever sees integer variables and linear comparisons between
//! [`LinearSum`]s. It reports satisfiability with a [`Model`], infeasibility
//! with the tracking literals implicated, or gives up with a reason.

pub mod bounded;

use std::fmt;

/// Handle to an integer variable declared on a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVar(usize);

impl IntVar {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// `Σ(coef × var) + constant` over declared variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearSum {
    pub terms: Vec<(IntVar, i64)>,
    pub constant: i64,
}

impl LinearSum {
    pub fn constant(value: i64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    /// Value under `values`, indexed by [`IntVar::index`].
    pub fn evaluate(&self, values: &[i64]) -> Option<i128> {
        self.terms.iter().try_fold(self.constant as i128, |acc, (var, coef)| {
            values
                .get(var.index())
                .map(|v| acc + *coef as i128 * *v as i128)
        })
    }
}

/// Comparison predicate between two linear sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Ge,
    Gt,
    Eq,
    Le,
    Lt,
}

/// `lhs cmp rhs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub lhs: LinearSum,
    pub cmp: Comparison,
    pub rhs: LinearSum,
}

impl Predicate {
    pub fn new(lhs: LinearSum, cmp: Comparison, rhs: LinearSum) -> Self {
        Self { lhs, cmp, rhs }
    }

    /// Truth value under `values`; `None` if a variable has no value.
    pub fn evaluate(&self, values: &[i64]) -> Option<bool> {
        let lhs = self.lhs.evaluate(values)?;
        let rhs = self.rhs.evaluate(values)?;
        Some(match self.cmp {
            Comparison::Ge => lhs >= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Eq => lhs == rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Lt => lhs < rhs,
        })
    }
}

/// Boolean marker attached 1:1 to an asserted predicate so an
/// infeasibility proof can name the assertions it used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackingLiteral(String);

impl TrackingLiteral {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Integer values for declared variables, indexed by [`IntVar::index`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    values: Vec<i64>,
}

impl Model {
    pub fn from_values(values: Vec<i64>) -> Self {
        Self { values }
    }

    pub fn value(&self, var: IntVar) -> Option<i64> {
        self.values.get(var.index()).copied()
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

/// What a backend reports for one `check()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOutcome {
    Sat(Model),
    /// Tracking literals of the assertions implicated in infeasibility.
    Unsat(Vec<TrackingLiteral>),
    /// Neither could be established within the backend's limits.
    Unknown(String),
}

/// An integer-linear satisfiability capability.
///
/// Implementations own all search state. A backend is used for exactly one
/// compiled model; nothing carries over between models.
pub trait SolverBackend {
    /// Declares an integer variable named `id` and returns its handle.
    fn declare_int_var(&mut self, id: &str) -> IntVar;

    /// Asserts `predicate`, tracked under `tracking`.
    fn assert_tracked(&mut self, predicate: Predicate, tracking: TrackingLiteral);

    /// Decides the conjunction of everything asserted so far.
    fn check(&mut self) -> BackendOutcome;
}

impl<B: SolverBackend + ?Sized> SolverBackend for Box<B> {
    fn declare_int_var(&mut self, id: &str) -> IntVar {
        (**self).declare_int_var(id)
    }

    fn assert_tracked(&mut self, predicate: Predicate, tracking: TrackingLiteral) {
        (**self).assert_tracked(predicate, tracking)
    }

    fn check(&mut self) -> BackendOutcome {
        (**self).check()
    }
}
