//! AllocSpec Compiler - lowers specifications for a satisfiability backend
//!
//! This crate provides:
//! - The [`SolverBackend`] seam through which any integer-linear solver is
//!   driven (declare variables, assert tracked predicates, check)
//! - [`compile`], the structural lowering of a specification into tracked
//!   assertions, one per constraint id
//! - [`CompiledModel::check`], which maps the backend's answer back onto
//!   variable ids and constraint ids
//! - [`BoundedSolver`], a finite-domain backend that ships with the crate

pub mod backend;
pub mod compile;
pub mod outcome;

pub use backend::bounded::BoundedSolver;
pub use backend::{
    BackendOutcome, Comparison, IntVar, LinearSum, Model, Predicate, SolverBackend,
    TrackingLiteral,
};
pub use compile::{compile, solve, CompiledModel};
pub use outcome::{Assignment, SolveOutcome};
