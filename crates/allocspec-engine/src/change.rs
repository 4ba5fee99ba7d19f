//! Change kinds and the event envelope.
//!
//! On the wire a change is `{"change_kind": "...", "payload": {...}}`; an
//! event adds `event_id` and `timestamp` alongside those two keys.

use std::fmt;

use allocspec_core::{Constraint, Edge, LinearExpr, Operator, Resource, Rhs};
use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::AUTO_ID;

/// Payload of `add_constraint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddConstraint {
    pub constraint: Constraint,
}

/// Payload of `remove_constraint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveConstraint {
    pub constraint_id: String,
}

/// Payload of `update_constraint`: a field-level patch.
///
/// Supplied fields replace the stored ones; omitted fields are kept.
///
/// # Example
///
/// ```
/// use allocspec_core::Operator;
/// use allocspec_engine::UpdateConstraint;
///
/// let patch = UpdateConstraint::new("C0002").op(Operator::Gt).rhs(6);
/// assert!(patch.lhs.is_none());
/// assert_eq!(patch.op, Some(Operator::Gt));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateConstraint {
    pub constraint_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lhs: Option<LinearExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<Operator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhs: Option<Rhs>,
}

impl UpdateConstraint {
    pub fn new(constraint_id: impl Into<String>) -> Self {
        Self {
            constraint_id: constraint_id.into(),
            lhs: None,
            op: None,
            rhs: None,
        }
    }

    pub fn lhs(mut self, lhs: LinearExpr) -> Self {
        self.lhs = Some(lhs);
        self
    }

    pub fn op(mut self, op: Operator) -> Self {
        self.op = Some(op);
        self
    }

    pub fn rhs(mut self, rhs: impl Into<Rhs>) -> Self {
        self.rhs = Some(rhs.into());
        self
    }

    /// Applies the patch to `current`, keeping its id.
    pub fn patch(&self, current: &Constraint) -> Constraint {
        Constraint {
            id: current.id.clone(),
            lhs: self.lhs.clone().unwrap_or_else(|| current.lhs.clone()),
            op: self.op.unwrap_or(current.op),
            rhs: self.rhs.clone().unwrap_or_else(|| current.rhs.clone()),
        }
    }
}

/// Payload of `add_resource`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddResource {
    pub resource: Resource,
}

/// Payload of `remove_resource`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveResource {
    pub name: String,
}

/// Payload of `add_location` and `remove_location`.
///
/// Normally exactly one of `node` / `edge` is set. When both are, the node
/// is handled first and the edge second.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<Edge>,
}

/// One atomic mutation of a specification.
///
/// # Example
///
/// ```
/// use allocspec_engine::{Change, ChangeKind};
///
/// let change = Change::add_node("A");
/// assert_eq!(change.kind(), ChangeKind::AddLocation);
///
/// let json = serde_json::to_value(&change).unwrap();
/// assert_eq!(json["change_kind"], "add_location");
/// assert_eq!(json["payload"]["node"], "A");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change_kind", content = "payload", rename_all = "snake_case")]
pub enum Change {
    AddConstraint(AddConstraint),
    RemoveConstraint(RemoveConstraint),
    UpdateConstraint(UpdateConstraint),
    AddResource(AddResource),
    RemoveResource(RemoveResource),
    AddLocation(LocationChange),
    RemoveLocation(LocationChange),
    /// A change kind this engine does not know. Always a no-op.
    Unrecognized,
}

// Decoded by hand so that an unknown `change_kind` is accepted with any
// payload, or none.
impl<'de> Deserialize<'de> for Change {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Tagged {
            change_kind: String,
            #[serde(default)]
            payload: serde_json::Value,
        }

        fn payload<T: DeserializeOwned, E: de::Error>(value: serde_json::Value) -> Result<T, E> {
            serde_json::from_value(value).map_err(E::custom)
        }

        let Tagged {
            change_kind,
            payload: body,
        } = Tagged::deserialize(deserializer)?;

        Ok(match change_kind.as_str() {
            "add_constraint" => Change::AddConstraint(payload(body)?),
            "remove_constraint" => Change::RemoveConstraint(payload(body)?),
            "update_constraint" => Change::UpdateConstraint(payload(body)?),
            "add_resource" => Change::AddResource(payload(body)?),
            "remove_resource" => Change::RemoveResource(payload(body)?),
            "add_location" => Change::AddLocation(payload(body)?),
            "remove_location" => Change::RemoveLocation(payload(body)?),
            _ => Change::Unrecognized,
        })
    }
}

impl Change {
    pub fn add_constraint(constraint: Constraint) -> Self {
        Change::AddConstraint(AddConstraint { constraint })
    }

    /// Adds `constraint` under a freshly assigned id.
    pub fn add_constraint_auto(mut constraint: Constraint) -> Self {
        constraint.id = AUTO_ID.to_string();
        Self::add_constraint(constraint)
    }

    pub fn remove_constraint(constraint_id: impl Into<String>) -> Self {
        Change::RemoveConstraint(RemoveConstraint {
            constraint_id: constraint_id.into(),
        })
    }

    pub fn add_resource(resource: Resource) -> Self {
        Change::AddResource(AddResource { resource })
    }

    pub fn remove_resource(name: impl Into<String>) -> Self {
        Change::RemoveResource(RemoveResource { name: name.into() })
    }

    pub fn add_node(node: impl Into<String>) -> Self {
        Change::AddLocation(LocationChange {
            node: Some(node.into()),
            edge: None,
        })
    }

    pub fn add_edge(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Change::AddLocation(LocationChange {
            node: None,
            edge: Some(Edge::new(src, dst)),
        })
    }

    pub fn remove_node(node: impl Into<String>) -> Self {
        Change::RemoveLocation(LocationChange {
            node: Some(node.into()),
            edge: None,
        })
    }

    pub fn remove_edge(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Change::RemoveLocation(LocationChange {
            node: None,
            edge: Some(Edge::new(src, dst)),
        })
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::AddConstraint(_) => ChangeKind::AddConstraint,
            Change::RemoveConstraint(_) => ChangeKind::RemoveConstraint,
            Change::UpdateConstraint(_) => ChangeKind::UpdateConstraint,
            Change::AddResource(_) => ChangeKind::AddResource,
            Change::RemoveResource(_) => ChangeKind::RemoveResource,
            Change::AddLocation(_) => ChangeKind::AddLocation,
            Change::RemoveLocation(_) => ChangeKind::RemoveLocation,
            Change::Unrecognized => ChangeKind::Unrecognized,
        }
    }
}

impl From<UpdateConstraint> for Change {
    fn from(patch: UpdateConstraint) -> Self {
        Change::UpdateConstraint(patch)
    }
}

/// Discriminant of a [`Change`], used for logging and dispatch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    AddConstraint,
    RemoveConstraint,
    UpdateConstraint,
    AddResource,
    RemoveResource,
    AddLocation,
    RemoveLocation,
    Unrecognized,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::AddConstraint => "add_constraint",
            ChangeKind::RemoveConstraint => "remove_constraint",
            ChangeKind::UpdateConstraint => "update_constraint",
            ChangeKind::AddResource => "add_resource",
            ChangeKind::RemoveResource => "remove_resource",
            ChangeKind::AddLocation => "add_location",
            ChangeKind::RemoveLocation => "remove_location",
            ChangeKind::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change stamped with its position in the log and the time it was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub event_id: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub change: Change,
}

impl ChangeEvent {
    pub fn new(event_id: u64, timestamp: DateTime<Utc>, change: Change) -> Self {
        Self {
            event_id,
            timestamp,
            change,
        }
    }

    /// Stamps `change` with the current UTC time.
    pub fn now(event_id: u64, change: Change) -> Self {
        Self::new(event_id, Utc::now(), change)
    }

    pub fn kind(&self) -> ChangeKind {
        self.change.kind()
    }
}
