//! Constraint id assignment.
//!
//! Fresh ids are `C` followed by a four-digit zero-padded number. The number
//! is one past the largest numeric suffix among the ids currently present,
//! so a fresh id never equals a live one. Numbers freed by removing the
//! highest constraint are handed out again.

use std::collections::HashSet;

use allocspec_core::Constraint;

/// Sentinel id asking the engine to assign a fresh id.
pub const AUTO_ID: &str = "__AUTO__";

pub const CONSTRAINT_ID_PREFIX: &str = "C";
pub const CONSTRAINT_ID_WIDTH: usize = 4;

/// Numeric part of an id shaped `letters* digits+` (e.g. `C0012` -> 12).
///
/// # Example
///
/// ```
/// use allocspec_engine::ids::numeric_suffix;
///
/// assert_eq!(numeric_suffix("C0012"), Some(12));
/// assert_eq!(numeric_suffix("R7"), Some(7));
/// assert_eq!(numeric_suffix("C12a"), None);
/// assert_eq!(numeric_suffix("__AUTO__"), None);
/// ```
pub fn numeric_suffix(id: &str) -> Option<u64> {
    let digits = id.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

pub fn format_constraint_id(number: u64) -> String {
    format!(
        "{CONSTRAINT_ID_PREFIX}{number:0width$}",
        width = CONSTRAINT_ID_WIDTH
    )
}

/// Next free id given the constraints already present.
///
/// If the largest suffix is `u64::MAX` there is no number past it, and the
/// lowest unused number is taken instead.
pub fn next_constraint_id(existing: &[Constraint]) -> String {
    let max = existing.iter().filter_map(|c| numeric_suffix(&c.id)).max();
    match max.map(|max| max.checked_add(1)) {
        None => format_constraint_id(1),
        Some(Some(next)) => format_constraint_id(next),
        Some(None) => lowest_unused_id(existing),
    }
}

fn lowest_unused_id(existing: &[Constraint]) -> String {
    let taken: HashSet<&str> = existing.iter().map(|c| c.id.as_str()).collect();
    // At most `existing.len()` numbers are taken, so this stops.
    let mut number = 1;
    while taken.contains(format_constraint_id(number).as_str()) {
        number += 1;
    }
    format_constraint_id(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocspec_core::{LinearExpr, Operator};

    fn with_ids(ids: &[&str]) -> Vec<Constraint> {
        ids.iter()
            .map(|id| Constraint::new(*id, LinearExpr::var("x[A]"), Operator::Ge, 0))
            .collect()
    }

    #[test]
    fn test_first_id() {
        assert_eq!(next_constraint_id(&[]), "C0001");
    }

    #[test]
    fn test_next_after_max() {
        assert_eq!(next_constraint_id(&with_ids(&["C0001", "C0007", "C0003"])), "C0008");
    }

    #[test]
    fn test_ignores_non_numeric_ids() {
        assert_eq!(next_constraint_id(&with_ids(&["food_min", "C0002"])), "C0003");
        assert_eq!(next_constraint_id(&with_ids(&["food_min"])), "C0001");
    }

    #[test]
    fn test_other_prefixes_count() {
        assert_eq!(next_constraint_id(&with_ids(&["R0041"])), "C0042");
    }

    #[test]
    fn test_exhausted_suffix_falls_back_to_lowest_unused() {
        let max = format!("C{}", u64::MAX);
        assert_eq!(next_constraint_id(&with_ids(&[max.as_str()])), "C0001");
        assert_eq!(
            next_constraint_id(&with_ids(&["C0001", max.as_str(), "C0002", "C0004"])),
            "C0003"
        );
    }

    #[test]
    fn test_width_grows_past_padding() {
        assert_eq!(format_constraint_id(12345), "C12345");
    }
}
