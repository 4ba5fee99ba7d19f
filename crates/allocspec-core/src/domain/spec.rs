//! The versioned specification document

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::constraint::Constraint;
use super::location::LocationGraph;
use super::resource::Resource;
use super::variable::Variable;

/// Root aggregate: resources, location graph, the variables they induce,
/// constraints over those variables, and free-form assumptions/notes.
///
/// A specification is an immutable snapshot from the engine's point of
/// view: applying a change produces a new value and leaves this one alone.
///
/// # Example
///
/// ```
/// use allocspec_core::Specification;
///
/// let spec = Specification::new();
/// assert_eq!(spec.version, 1);
/// assert!(spec.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub version: u64,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub locations: LocationGraph,
    #[serde(default)]
    pub vars: Vec<Variable>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl Default for Specification {
    fn default() -> Self {
        Self {
            version: 1,
            resources: Vec::new(),
            locations: LocationGraph::new(),
            vars: Vec::new(),
            constraints: Vec::new(),
            assumptions: Vec::new(),
            notes: String::new(),
        }
    }
}

impl Specification {
    /// Creates the empty specification at version 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when there is nothing to solve: no variables and no constraints.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty() && self.constraints.is_empty()
    }

    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.iter().any(|r| r.name == name)
    }

    pub fn has_node(&self, node: &str) -> bool {
        self.locations.has_node(node)
    }

    pub fn has_variable(&self, id: &str) -> bool {
        self.vars.iter().any(|v| v.id == id)
    }

    pub fn variable_ids(&self) -> HashSet<&str> {
        self.vars.iter().map(|v| v.id.as_str()).collect()
    }

    pub fn constraint(&self, id: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.id == id)
    }

    pub fn constraint_position(&self, id: &str) -> Option<usize> {
        self.constraints.iter().position(|c| c.id == id)
    }

    /// Compares everything except `version`.
    pub fn same_structure(&self, other: &Self) -> bool {
        self.resources == other.resources
            && self.locations == other.locations
            && self.vars == other.vars
            && self.constraints == other.constraints
            && self.assumptions == other.assumptions
            && self.notes == other.notes
    }
}
