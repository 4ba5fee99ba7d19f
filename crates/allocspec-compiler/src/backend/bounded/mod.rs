//! Finite-domain backend.
//!
//! Every variable ranges over `[domain_min, domain_max]` from
//! [`SolverLimits`]. A check alternates interval bound propagation with
//! depth-first branching. When every branch is refuted without relying on
//! the box ends, the assertions are infeasible over the integers and are
//! shrunk to a deletion-minimal core. A refutation that needed the box,
//! running out of nodes, or running out of time yields
//! [`BackendOutcome::Unknown`].
//!
//! # Example
//!
//! ```
//! use allocspec_compiler::{
//!     BackendOutcome, BoundedSolver, Comparison, LinearSum, Predicate, SolverBackend,
//!     TrackingLiteral,
//! };
//! use allocspec_config::SolverLimits;
//!
//! let mut solver = BoundedSolver::new(SolverLimits::default());
//! let x = solver.declare_int_var("x");
//! let pred = Predicate::new(
//!     LinearSum { terms: vec![(x, 1)], constant: 0 },
//!     Comparison::Ge,
//!     LinearSum::constant(3),
//! );
//! solver.assert_tracked(pred, TrackingLiteral::new("C0001"));
//!
//! match solver.check() {
//!     BackendOutcome::Sat(model) => assert_eq!(model.value(x), Some(3)),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

mod propagate;
mod search;

#[cfg(test)]
mod tests;

use std::time::Instant;

use allocspec_config::SolverLimits;
use tracing::debug;

use self::propagate::{normalize, Domain, Row};
use self::search::{search, Search, SearchLimits};
use super::{BackendOutcome, IntVar, Model, Predicate, SolverBackend, TrackingLiteral};

/// Bounded propagate-and-branch solver.
#[derive(Debug, Clone)]
pub struct BoundedSolver {
    limits: SolverLimits,
    names: Vec<String>,
    assertions: Vec<(Predicate, TrackingLiteral)>,
}

impl BoundedSolver {
    pub fn new(limits: SolverLimits) -> Self {
        Self {
            limits,
            names: Vec::new(),
            assertions: Vec::new(),
        }
    }

    fn initial_box(&self) -> Vec<Domain> {
        let domain = Domain::boxed(self.limits.domain_min as i128, self.limits.domain_max as i128);
        vec![domain; self.names.len()]
    }

    fn explore(&self, rows: &[Vec<Row>], subset: &[usize], limits: &SearchLimits) -> Search {
        let flat: Vec<Row> = subset
            .iter()
            .flat_map(|i| rows[*i].iter().cloned())
            .collect();
        search(&flat, self.initial_box(), limits)
    }

    /// Drops assertions one at a time while the rest stay infeasible.
    ///
    /// An assertion whose removal leaves an undecided subset, or one refuted
    /// only inside the box, is kept. The result is always a valid core even
    /// when limits cut minimization short.
    fn minimize(&self, rows: &[Vec<Row>], limits: &SearchLimits) -> Vec<usize> {
        let mut core: Vec<usize> = (0..rows.len()).collect();
        let mut i = 0;
        while i < core.len() {
            let candidate: Vec<usize> = core
                .iter()
                .enumerate()
                .filter(|(pos, _)| *pos != i)
                .map(|(_, idx)| *idx)
                .collect();
            match self.explore(rows, &candidate, limits) {
                Search::Exhausted { boxed: false } => core = candidate,
                Search::Exhausted { boxed: true } | Search::Found(_) | Search::Aborted(_) => i += 1,
            }
        }
        core
    }
}

impl Default for BoundedSolver {
    fn default() -> Self {
        Self::new(SolverLimits::default())
    }
}

impl SolverBackend for BoundedSolver {
    fn declare_int_var(&mut self, id: &str) -> IntVar {
        self.names.push(id.to_string());
        IntVar::new(self.names.len() - 1)
    }

    fn assert_tracked(&mut self, predicate: Predicate, tracking: TrackingLiteral) {
        self.assertions.push((predicate, tracking));
    }

    fn check(&mut self) -> BackendOutcome {
        let started = Instant::now();
        let limits = SearchLimits {
            node_limit: self.limits.node_limit,
            round_limit: self.limits.propagation_round_limit,
            deadline: self
                .limits
                .time_limit()
                .and_then(|limit| started.checked_add(limit)),
        };
        let rows: Vec<Vec<Row>> = self
            .assertions
            .iter()
            .map(|(predicate, _)| normalize(predicate))
            .collect();
        let all: Vec<usize> = (0..rows.len()).collect();

        match self.explore(&rows, &all, &limits) {
            Search::Found(values) => {
                debug!(
                    event = "bounded_sat",
                    vars = self.names.len(),
                    duration_ms = started.elapsed().as_millis() as u64,
                );
                // Domains are bounded by i64 limits.
                BackendOutcome::Sat(Model::from_values(
                    values.into_iter().map(|v| v as i64).collect(),
                ))
            }
            Search::Exhausted { boxed: true } => {
                debug!(
                    event = "bounded_unknown",
                    reason = "domain bound reached",
                    domain_min = self.limits.domain_min,
                    domain_max = self.limits.domain_max,
                );
                BackendOutcome::Unknown(format!(
                    "domain bound reached: no solution within [{}, {}]",
                    self.limits.domain_min, self.limits.domain_max
                ))
            }
            Search::Exhausted { boxed: false } => {
                let core = if self.limits.minimize_core {
                    self.minimize(&rows, &limits)
                } else {
                    all
                };
                debug!(
                    event = "bounded_unsat",
                    core_size = core.len(),
                    assertions = rows.len(),
                    duration_ms = started.elapsed().as_millis() as u64,
                );
                BackendOutcome::Unsat(
                    core.into_iter()
                        .map(|i| self.assertions[i].1.clone())
                        .collect(),
                )
            }
            Search::Aborted(reason) => {
                debug!(event = "bounded_unknown", reason = %reason);
                BackendOutcome::Unknown(reason)
            }
        }
    }
}
