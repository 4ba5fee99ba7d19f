//! AllocSpec Engine - applies typed changes to specifications
//!
//! The engine is a pure fold: [`apply`] takes a specification snapshot and a
//! [`Change`] and returns the next snapshot. It never fails; changes that
//! target something absent leave the document (and its version) untouched.
//!
//! - [`change`] - the closed set of change kinds and the event envelope
//! - [`apply`] - the change-application function and its cascades
//! - [`ids`] - deterministic constraint id assignment
//! - [`history`] - event log with one immutable snapshot per applied event

pub mod apply;
pub mod change;
pub mod history;
pub mod ids;

pub use apply::apply;
pub use change::{
    AddConstraint, AddResource, Change, ChangeEvent, ChangeKind, LocationChange,
    RemoveConstraint, RemoveResource, UpdateConstraint,
};
pub use history::{fold, SpecHistory};
pub use ids::{next_constraint_id, AUTO_ID};
