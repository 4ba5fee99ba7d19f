//! AllocSpec Core - Domain model for resource-allocation specifications
//!
//! This crate provides the fundamental types shared by the engine and the
//! compiler:
//! - Domain types for resources, locations, variables and constraints
//! - The versioned [`Specification`] document
//! - A [`ReferenceIndex`] answering "which constraints reference these variables"
//! - Invariant checks and the error taxonomy

pub mod domain;
pub mod error;
pub mod index;
pub mod invariant;

pub use domain::{
    split_var_id, var_id, Constraint, Edge, LinearExpr, LocationGraph, Operator, Resource, Rhs,
    Sort, Specification, Term, Variable, DEFAULT_UNIT,
};
pub use error::{Result, SpecError};
pub use index::ReferenceIndex;
pub use invariant::InvariantViolation;
