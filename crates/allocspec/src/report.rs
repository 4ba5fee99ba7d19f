//! Serializable solve reports.

use allocspec_compiler::SolveOutcome;
use allocspec_core::{Constraint, Specification};
use serde::{Deserialize, Serialize};

/// Note attached to a report for a snapshot without constraints.
pub const NO_CONSTRAINTS_NOTE: &str = "no constraints to solve";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveResult {
    #[serde(rename = "SAT")]
    Sat,
    #[serde(rename = "UNSAT")]
    Unsat,
}

/// Result of solving one specification version.
///
/// ```json
/// {"spec_version": 8, "result": "UNSAT", "unsat_constraint_ids": ["C0007", "C0008"]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    pub spec_version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<SolveResult>,
    /// `"<var> = <int>"` for every variable, when satisfiable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignments: Option<Vec<String>>,
    #[serde(
        default,
        alias = "unsat_constraints_ids",
        skip_serializing_if = "Option::is_none"
    )]
    pub unsat_constraint_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SolveReport {
    pub fn from_outcome(spec_version: u64, outcome: &SolveOutcome) -> Self {
        let (result, assignments, unsat_constraint_ids) = match outcome {
            SolveOutcome::Satisfiable(_) => (SolveResult::Sat, Some(outcome.lines()), None),
            SolveOutcome::Unsatisfiable(_) => (SolveResult::Unsat, None, Some(outcome.lines())),
        };
        Self {
            spec_version,
            result: Some(result),
            assignments,
            unsat_constraint_ids,
            note: None,
        }
    }

    /// Report for a version with nothing to check.
    pub fn without_constraints(spec_version: u64) -> Self {
        Self {
            spec_version,
            result: None,
            assignments: None,
            unsat_constraint_ids: None,
            note: Some(NO_CONSTRAINTS_NOTE.to_string()),
        }
    }

    pub fn is_sat(&self) -> bool {
        self.result == Some(SolveResult::Sat)
    }

    pub fn is_unsat(&self) -> bool {
        self.result == Some(SolveResult::Unsat)
    }

    /// Value of `var` in a satisfiable report.
    pub fn value_of(&self, var: &str) -> Option<i64> {
        self.assignments
            .as_ref()?
            .iter()
            .filter_map(|line| line.split_once(" = "))
            .find(|(name, _)| *name == var)
            .and_then(|(_, value)| value.parse().ok())
    }

    /// Constraints of `spec` named by an unsatisfiable report, in report
    /// order. Ids no longer present in `spec` are skipped.
    pub fn conflicting_constraints<'a>(&self, spec: &'a Specification) -> Vec<&'a Constraint> {
        self.unsat_constraint_ids
            .iter()
            .flatten()
            .filter_map(|id| spec.constraint(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use allocspec_compiler::Assignment;
    use allocspec_test::{conflicting_water_constraints, grid_spec};

    use super::*;

    #[test]
    fn test_sat_report_json_shape() {
        let outcome = SolveOutcome::Satisfiable(vec![Assignment::new("food[A]", 3)]);
        let report = SolveReport::from_outcome(4, &outcome);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "spec_version": 4,
                "result": "SAT",
                "assignments": ["food[A] = 3"],
            })
        );
        assert_eq!(report.value_of("food[A]"), Some(3));
        assert_eq!(report.value_of("food[B]"), None);
    }

    #[test]
    fn test_unsat_report_accepts_legacy_field_name() {
        let json = r#"{"spec_version": 9, "result": "UNSAT", "unsat_constraints_ids": ["C0007"]}"#;
        let report: SolveReport = serde_json::from_str(json).unwrap();

        assert!(report.is_unsat());
        assert_eq!(report.unsat_constraint_ids, Some(vec!["C0007".to_string()]));
    }

    #[test]
    fn test_conflicting_constraints_skip_missing_ids() {
        let mut spec = grid_spec(&["water"], &["A"]);
        spec.constraints = conflicting_water_constraints();
        let outcome = SolveOutcome::Unsatisfiable(vec!["C0008".to_string(), "C0042".to_string()]);
        let report = SolveReport::from_outcome(spec.version, &outcome);

        let found: Vec<&str> = report
            .conflicting_constraints(&spec)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(found, vec!["C0008"]);
    }

    #[test]
    fn test_empty_report_has_note_only() {
        let report = SolveReport::without_constraints(1);
        assert!(!report.is_sat() && !report.is_unsat());
        assert!(report.conflicting_constraints(&Specification::new()).is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"spec_version": 1, "note": NO_CONSTRAINTS_NOTE})
        );
    }
}
