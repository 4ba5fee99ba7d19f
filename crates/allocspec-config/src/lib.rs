//! Configuration system for AllocSpec.
//!
//! Load solving limits and assertion settings from TOML or YAML files
//! without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use allocspec_config::{AllocSpecConfig, EnvironmentMode};
//! use std::time::Duration;
//!
//! let config = AllocSpecConfig::from_toml_str(r#"
//!     environment_mode = "full_assert"
//!
//!     [solver]
//!     seconds_spent_limit = 5
//!     node_limit = 50000
//!     domain_min = 0
//! "#).unwrap();
//!
//! assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(5)));
//! assert_eq!(config.solver.domain_min, 0);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use allocspec_config::AllocSpecConfig;
//!
//! let config = AllocSpecConfig::load("allocspec.toml").unwrap_or_default();
//! assert!(config.solver.minimize_core);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AllocSpecConfig {
    /// Whether snapshots are checked against the structural invariants.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Limits for the bundled bounded solver.
    #[serde(default)]
    pub solver: SolverLimits,
}

impl AllocSpecConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or
    /// describes an empty solver domain.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.solver.domain_min > self.solver.domain_max {
            return Err(ConfigError::Invalid(format!(
                "solver.domain_min ({}) exceeds solver.domain_max ({})",
                self.solver.domain_min, self.solver.domain_max
            )));
        }
        Ok(self)
    }

    /// Sets the solving time limit.
    pub fn with_time_limit_seconds(mut self, seconds: u64) -> Self {
        self.solver.seconds_spent_limit = Some(seconds);
        self.solver.millis_spent_limit = None;
        self
    }

    /// Sets the search node budget.
    pub fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.solver.node_limit = node_limit;
        self
    }

    /// Sets the inclusive value range for every variable.
    pub fn with_domain(mut self, min: i64, max: i64) -> Self {
        self.solver.domain_min = min;
        self.solver.domain_max = max;
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Returns the solving time limit, if configured.
    ///
    /// Convenience method that delegates to `solver.time_limit()`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.solver.time_limit()
    }
}

/// Environment mode affecting how much checking happens per change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Trust the engine; no per-change invariant checks.
    #[default]
    Production,

    /// Check every snapshot against the structural invariants and log any
    /// violation.
    FullAssert,
}

impl EnvironmentMode {
    pub fn is_asserted(self) -> bool {
        matches!(self, EnvironmentMode::FullAssert)
    }
}

/// Limits for the bundled bounded solver.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverLimits {
    /// Maximum seconds per check.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds per check, added to the seconds limit.
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of search nodes per check.
    pub node_limit: u64,

    /// Smallest value any variable may take.
    pub domain_min: i64,

    /// Largest value any variable may take.
    pub domain_max: i64,

    /// Maximum bound-propagation sweeps per search node.
    pub propagation_round_limit: u32,

    /// Whether to shrink an infeasible set to an irreducible core.
    pub minimize_core: bool,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            seconds_spent_limit: Some(10),
            millis_spent_limit: None,
            node_limit: 1_000_000,
            domain_min: -1_000_000,
            domain_max: 1_000_000,
            propagation_round_limit: 256,
            minimize_core: true,
        }
    }
}

impl SolverLimits {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis = self
            .seconds_spent_limit
            .unwrap_or(0)
            .saturating_mul(1000)
            .saturating_add(self.millis_spent_limit.unwrap_or(0));
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}
