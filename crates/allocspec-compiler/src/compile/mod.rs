//! Lowering of a [`Specification`] onto a [`SolverBackend`].
//!
//! Lowering is purely structural: one integer variable per declared
//! variable, one tracked predicate per constraint. The tracking literal of a
//! constraint carries its id, so an infeasibility core reads back directly
//! as constraint ids.


use std::collections::HashMap;
use std::time::Instant;

use allocspec_core::{Constraint, LinearExpr, Operator, Result, Rhs, Sort, SpecError, Specification};
use tracing::{debug, info, warn};

use crate::backend::{BackendOutcome, Comparison, IntVar, LinearSum, Predicate, SolverBackend, TrackingLiteral};
use crate::outcome::{Assignment, SolveOutcome};

/// A specification asserted into a backend, ready to check.
#[derive(Debug)]
pub struct CompiledModel<B> {
    backend: B,
    spec_version: u64,
    variables: Vec<(String, IntVar)>,
    tracking: HashMap<TrackingLiteral, String>,
}

/// Compiles `spec` into `backend`.
///
/// The backend is consumed; if compilation fails it is dropped together
/// with whatever was already declared on it.
pub fn compile<B: SolverBackend>(spec: &Specification, mut backend: B) -> Result<CompiledModel<B>> {
    if let Some(var) = spec.vars.iter().find(|v| v.sort != Sort::Int) {
        return Err(SpecError::UnsupportedSort {
            var: var.id.clone(),
            sort: var.sort.as_str().to_string(),
        });
    }

    let mut declared: HashMap<&str, IntVar> = HashMap::with_capacity(spec.vars.len());
    let mut variables = Vec::with_capacity(spec.vars.len());
    for var in &spec.vars {
        let handle = backend.declare_int_var(&var.id);
        declared.insert(var.id.as_str(), handle);
        variables.push((var.id.clone(), handle));
    }

    let predicates = spec
        .constraints
        .iter()
        .map(|c| lower_constraint(c, &declared).map(|p| (p, c.id.clone())))
        .collect::<Result<Vec<_>>>()?;

    let mut tracking = HashMap::with_capacity(predicates.len());
    for (predicate, id) in predicates {
        let literal = TrackingLiteral::new(id.clone());
        backend.assert_tracked(predicate, literal.clone());
        tracking.insert(literal, id);
    }

    debug!(
        event = "model_compiled",
        version = spec.version,
        vars = variables.len(),
        constraints = tracking.len(),
    );

    Ok(CompiledModel {
        backend,
        spec_version: spec.version,
        variables,
        tracking,
    })
}

/// Compiles and checks in one step, logging the solve lifecycle.
pub fn solve<B: SolverBackend>(spec: &Specification, backend: B) -> Result<SolveOutcome> {
    let started = Instant::now();
    info!(
        event = "solve_start",
        version = spec.version,
        vars = spec.vars.len(),
        constraints = spec.constraints.len(),
    );
    let outcome = compile(spec, backend)?.check();
    let duration_ms = started.elapsed().as_millis() as u64;
    match &outcome {
        Ok(SolveOutcome::Satisfiable(assignments)) => info!(
            event = "solve_end",
            result = "SAT",
            assigned = assignments.len(),
            duration_ms,
        ),
        Ok(SolveOutcome::Unsatisfiable(core)) => info!(
            event = "solve_end",
            result = "UNSAT",
            core_size = core.len(),
            duration_ms,
        ),
        Err(err) => warn!(event = "solve_failed", error = %err, duration_ms),
    }
    outcome
}

impl<B: SolverBackend> CompiledModel<B> {
    pub fn spec_version(&self) -> u64 {
        self.spec_version
    }

    /// Declared variables with their backend handles, in declaration order.
    pub fn variables(&self) -> &[(String, IntVar)] {
        &self.variables
    }

    /// Constraint id a tracking literal stands for.
    pub fn constraint_for(&self, literal: &TrackingLiteral) -> Option<&str> {
        self.tracking.get(literal).map(String::as_str)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs the backend and maps its answer onto specification ids.
    pub fn check(&mut self) -> Result<SolveOutcome> {
        match self.backend.check() {
            BackendOutcome::Sat(model) => {
                let assignments = self
                    .variables
                    .iter()
                    .map(|(id, var)| {
                        model
                            .value(*var)
                            .map(|value| Assignment::new(id.clone(), value))
                            .ok_or_else(|| SpecError::SolverUndecided {
                                reason: format!("model has no value for '{id}'"),
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(SolveOutcome::Satisfiable(assignments))
            }
            BackendOutcome::Unsat(core) => {
                let ids = core
                    .iter()
                    .filter_map(|literal| match self.constraint_for(literal) {
                        Some(id) => Some(id.to_string()),
                        None => {
                            warn!(event = "unknown_tracking_literal", literal = %literal);
                            None
                        }
                    })
                    .collect();
                Ok(SolveOutcome::Unsatisfiable(ids))
            }
            BackendOutcome::Unknown(reason) => Err(SpecError::SolverUndecided { reason }),
        }
    }
}

fn comparison(op: Operator) -> Comparison {
    match op {
        Operator::Ge => Comparison::Ge,
        Operator::Gt => Comparison::Gt,
        Operator::Eq => Comparison::Eq,
        Operator::Le => Comparison::Le,
        Operator::Lt => Comparison::Lt,
    }
}

fn lower_constraint(constraint: &Constraint, declared: &HashMap<&str, IntVar>) -> Result<Predicate> {
    let lhs = lower_expr(&constraint.lhs, &constraint.id, declared)?;
    let rhs = match &constraint.rhs {
        Rhs::Const(value) => LinearSum::constant(*value),
        Rhs::Expr(expr) => lower_expr(expr, &constraint.id, declared)?,
    };
    Ok(Predicate::new(lhs, comparison(constraint.op), rhs))
}

fn lower_expr(expr: &LinearExpr, constraint: &str, declared: &HashMap<&str, IntVar>) -> Result<LinearSum> {
    let terms = expr
        .terms
        .iter()
        .map(|term| {
            declared
                .get(term.var.as_str())
                .map(|var| (*var, term.coef))
                .ok_or_else(|| SpecError::UndeclaredVariable {
                    constraint: constraint.to_string(),
                    var: term.var.clone(),
                })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(LinearSum {
        terms,
        constant: expr.constant,
    })
}
