//! Event log with one immutable snapshot per applied event.
//!
//! Snapshots are shared through `Arc`, so handing the current specification
//! to a solver or keeping old versions around for audit costs no copies.

use std::sync::Arc;

use allocspec_core::Specification;
use tracing::debug;

use crate::apply::apply;
use crate::change::{Change, ChangeEvent};

/// Folds `changes` over `spec` in order.
///
/// # Example
///
/// ```
/// use allocspec_core::{Resource, Specification};
/// use allocspec_engine::{fold, Change};
///
/// let changes = [Change::add_node("A"), Change::add_resource(Resource::named("food"))];
/// let spec = fold(&Specification::new(), &changes);
/// assert_eq!(spec.version, 3);
/// ```
pub fn fold<'a, I>(spec: &Specification, changes: I) -> Specification
where
    I: IntoIterator<Item = &'a Change>,
{
    changes
        .into_iter()
        .fold(spec.clone(), |acc, change| apply(&acc, change))
}

/// Applied events and the snapshot each one produced.
///
/// `snapshots()[0]` is the starting document; `snapshots()[i + 1]` is the
/// result of `events()[i]`.
#[derive(Debug, Clone)]
pub struct SpecHistory {
    events: Vec<ChangeEvent>,
    snapshots: Vec<Arc<Specification>>,
}

impl Default for SpecHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecHistory {
    /// Starts from the empty specification.
    pub fn new() -> Self {
        Self::from_spec(Specification::new())
    }

    /// Starts from an existing document, e.g. one loaded from JSON.
    pub fn from_spec(spec: Specification) -> Self {
        Self {
            events: Vec::new(),
            snapshots: vec![Arc::new(spec)],
        }
    }

    /// Rebuilds a history by applying `events` to the empty specification.
    pub fn replay<I>(events: I) -> Self
    where
        I: IntoIterator<Item = ChangeEvent>,
    {
        let mut history = Self::new();
        history.record_all(events);
        history
    }

    /// Applies `event` to the current snapshot and records both.
    pub fn record(&mut self, event: ChangeEvent) -> Arc<Specification> {
        let next = Arc::new(apply(self.current(), &event.change));
        debug!(
            event = "event_recorded",
            event_id = event.event_id,
            kind = event.kind().as_str(),
            version = next.version,
        );
        self.events.push(event);
        self.snapshots.push(Arc::clone(&next));
        next
    }

    /// Records every event in order and returns the final snapshot.
    pub fn record_all<I>(&mut self, events: I) -> Arc<Specification>
    where
        I: IntoIterator<Item = ChangeEvent>,
    {
        for event in events {
            self.record(event);
        }
        Arc::clone(self.current())
    }

    pub fn current(&self) -> &Arc<Specification> {
        // Never empty: the starting snapshot is not undoable.
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn initial(&self) -> &Arc<Specification> {
        &self.snapshots[0]
    }

    pub fn events(&self) -> &[ChangeEvent] {
        &self.events
    }

    pub fn snapshots(&self) -> &[Arc<Specification>] {
        &self.snapshots
    }

    /// Snapshot produced by the event with `event_id`, if it was recorded.
    pub fn snapshot_after(&self, event_id: u64) -> Option<&Arc<Specification>> {
        self.events
            .iter()
            .position(|e| e.event_id == event_id)
            .map(|pos| &self.snapshots[pos + 1])
    }

    /// Drops the most recent event and its snapshot.
    ///
    /// Returns the removed event, or `None` if nothing was recorded.
    pub fn undo(&mut self) -> Option<ChangeEvent> {
        let event = self.events.pop()?;
        self.snapshots.pop();
        debug!(
            event = "event_undone",
            event_id = event.event_id,
            version = self.current().version,
        );
        Some(event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocspec_core::Resource;
    use chrono::{TimeZone, Utc};

    fn event(id: u64, change: Change) -> ChangeEvent {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        ChangeEvent::new(id, at, change)
    }

    #[test]
    fn test_record_keeps_prior_snapshots() {
        let mut history = SpecHistory::new();
        history.record(event(1, Change::add_node("A")));
        let first = Arc::clone(history.current());
        history.record(event(2, Change::add_resource(Resource::named("food"))));

        assert_eq!(history.len(), 2);
        assert_eq!(history.snapshots().len(), 3);
        assert!(first.vars.is_empty());
        assert_eq!(history.current().vars.len(), 1);
        assert_eq!(history.initial().version, 1);
    }

    #[test]
    fn test_snapshot_after_event() {
        let mut history = SpecHistory::new();
        history.record_all([
            event(1, Change::add_node("A")),
            event(2, Change::add_node("B")),
        ]);
        assert_eq!(history.snapshot_after(1).unwrap().locations.nodes, vec!["A"]);
        assert_eq!(history.snapshot_after(2).unwrap().version, 3);
        assert!(history.snapshot_after(3).is_none());
    }

    #[test]
    fn test_undo_restores_previous_snapshot() {
        let mut history = SpecHistory::new();
        history.record(event(1, Change::add_node("A")));
        let before = Arc::clone(history.current());
        history.record(event(2, Change::remove_node("A")));

        let undone = history.undo().unwrap();
        assert_eq!(undone.event_id, 2);
        assert_eq!(history.current(), &before);

        assert!(history.undo().is_some());
        assert!(history.undo().is_none());
        assert_eq!(**history.current(), Specification::new());
    }

    #[test]
    fn test_replay_matches_recorded_history() {
        let mut history = SpecHistory::new();
        history.record_all([
            event(1, Change::add_node("A")),
            event(2, Change::add_resource(Resource::named("water"))),
            event(3, Change::add_node("B")),
        ]);
        let replayed = SpecHistory::replay(history.events().to_vec());
        assert_eq!(replayed.current(), history.current());
    }

    #[test]
    fn test_event_wire_shape() {
        let e = event(7, Change::remove_resource("fuel"));
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["event_id"], 7);
        assert_eq!(json["change_kind"], "remove_resource");
        assert_eq!(json["payload"]["name"], "fuel");

        let back: ChangeEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn test_unknown_kind_decodes_as_unrecognized() {
        let change: Change = serde_json::from_str(r#"{"change_kind": "rename_node"}"#).unwrap();
        assert_eq!(change, Change::Unrecognized);
    }

    #[test]
    fn test_unknown_kind_with_payload_decodes_as_unrecognized() {
        let json = r#"{"change_kind": "rename_node", "payload": {"from": "A", "to": "B"}}"#;
        let change: Change = serde_json::from_str(json).unwrap();
        assert_eq!(change, Change::Unrecognized);

        let json = r#"{"event_id": 4, "timestamp": "2026-01-01T00:00:00Z",
                       "change_kind": "rename_node", "payload": {"from": "A", "to": "B"}}"#;
        let e: ChangeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(e.event_id, 4);
        assert_eq!(e.change, Change::Unrecognized);

        let mut history = SpecHistory::new();
        history.record(event(1, Change::add_node("A")));
        let before = history.current().clone();
        history.record(e);
        assert_eq!(history.current(), &before);
    }

    #[test]
    fn test_known_kind_requires_its_payload() {
        let missing = serde_json::from_str::<Change>(r#"{"change_kind": "add_resource"}"#);
        assert!(missing.is_err());

        let malformed =
            serde_json::from_str::<Change>(r#"{"change_kind": "add_location", "payload": 3}"#);
        assert!(malformed.is_err());
    }

    #[test]
    fn test_update_payload_omits_missing_fields() {
        let json = r#"{"change_kind": "update_constraint",
                       "payload": {"constraint_id": "C0003", "rhs": 12}}"#;
        let change: Change = serde_json::from_str(json).unwrap();
        let Change::UpdateConstraint(patch) = change else {
            panic!("expected update_constraint");
        };
        assert_eq!(patch.constraint_id, "C0003");
        assert!(patch.lhs.is_none() && patch.op.is_none());
        assert_eq!(patch.rhs, Some(allocspec_core::Rhs::Const(12)));
    }
}
