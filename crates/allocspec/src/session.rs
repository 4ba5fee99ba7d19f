//! The session facade: one specification lineage plus its configuration.

use std::sync::Arc;

use allocspec_compiler::{solve, BoundedSolver, SolverBackend};
use allocspec_config::AllocSpecConfig;
use allocspec_core::{InvariantViolation, SpecError, Specification};
use allocspec_engine::{Change, ChangeEvent, SpecHistory};
use tracing::{debug, error};

use crate::report::SolveReport;

/// Applies changes to a specification and solves its snapshots.
///
/// The session is the single writer for its lineage. Every snapshot it
/// hands out is immutable and shared.
#[derive(Debug, Clone)]
pub struct SpecSession {
    config: AllocSpecConfig,
    history: SpecHistory,
}

impl SpecSession {
    /// Starts from the empty specification.
    pub fn new(config: AllocSpecConfig) -> Self {
        Self::with_spec(config, Specification::new())
    }

    /// Starts from an existing document.
    pub fn with_spec(config: AllocSpecConfig, spec: Specification) -> Self {
        #[cfg(feature = "console")]
        allocspec_console::init();

        Self {
            config,
            history: SpecHistory::from_spec(spec),
        }
    }

    pub fn config(&self) -> &AllocSpecConfig {
        &self.config
    }

    pub fn history(&self) -> &SpecHistory {
        &self.history
    }

    pub fn current(&self) -> &Arc<Specification> {
        self.history.current()
    }

    /// Id the next submitted change will be stamped with.
    pub fn next_event_id(&self) -> u64 {
        self.history.len() as u64 + 1
    }

    /// Stamps `changes` with consecutive event ids and the current time,
    /// applies them in order and returns the resulting snapshot.
    pub fn submit<I>(&mut self, changes: I) -> Arc<Specification>
    where
        I: IntoIterator<Item = Change>,
    {
        for change in changes {
            let event = ChangeEvent::now(self.next_event_id(), change);
            self.apply_event(event);
        }
        Arc::clone(self.current())
    }

    /// Applies a pre-built event.
    pub fn apply_event(&mut self, event: ChangeEvent) -> Arc<Specification> {
        let event_id = event.event_id;
        let next = self.history.record(event);
        if self.config.environment_mode.is_asserted() {
            if let Err(violation) = next.check_invariants() {
                error!(
                    event = "invariant_violation",
                    event_id,
                    version = next.version,
                    violation = %violation,
                );
            }
        }
        next
    }

    /// Drops the most recent event, restoring the snapshot before it.
    pub fn undo(&mut self) -> Option<ChangeEvent> {
        self.history.undo()
    }

    /// Checks the current snapshot against the structural invariants.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.current().check_invariants()
    }

    /// Solves the current snapshot with the bundled bounded backend.
    pub fn solve(&self) -> Result<SolveReport, SpecError> {
        self.solve_with(BoundedSolver::new(self.config.solver.clone()))
    }

    /// Solves the current snapshot with a caller-supplied backend.
    pub fn solve_with<B: SolverBackend>(&self, backend: B) -> Result<SolveReport, SpecError> {
        let spec = self.current();
        if spec.constraints.is_empty() {
            debug!(event = "solve_skipped", version = spec.version);
            return Ok(SolveReport::without_constraints(spec.version));
        }
        let outcome = solve(spec, backend)?;
        Ok(SolveReport::from_outcome(spec.version, &outcome))
    }
}

impl Default for SpecSession {
    fn default() -> Self {
        Self::new(AllocSpecConfig::default())
    }
}
