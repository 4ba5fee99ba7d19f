//! Shared test fixtures for AllocSpec crates.
//!
//! This crate provides specification builders and canned scenarios.
//! It depends only on `allocspec-core` so that every other crate can take it
//! as a dev-dependency without cycles.
//!
//! - [`builders`] - terse constructors for expressions and constraints
//! - [`scenario`] - the three-location food/water allocation scenarios
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! allocspec-test = { workspace = true }
//! ```

pub mod builders;
pub mod scenario;

pub use builders::{cmp, cmp_expr, grid_spec, sum};
pub use scenario::{conflicting_water_constraints, scenario_a_constraints, scenario_a_spec};
