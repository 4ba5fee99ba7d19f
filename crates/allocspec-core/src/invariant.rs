//! Structural invariant checks for specifications.

use std::collections::HashSet;

use thiserror::Error;

use crate::domain::{var_id, Specification};

/// The first invariant a specification was found to break.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("Missing variable {0} for a present resource/node pair")]
    MissingVariable(String),

    #[error("Variable {0} has no matching resource/node pair")]
    OrphanVariable(String),

    #[error("Duplicate variable {0}")]
    DuplicateVariable(String),

    #[error("Constraint {constraint} references undeclared variable {var}")]
    DanglingReference { constraint: String, var: String },

    #[error("Duplicate constraint id {0}")]
    DuplicateConstraintId(String),

    #[error("Duplicate edge ({src}, {dst})")]
    DuplicateEdge { src: String, dst: String },

    #[error("Edge ({src}, {dst}) touches a node that does not exist")]
    DanglingEdge { src: String, dst: String },

    #[error("Duplicate {kind} {name}")]
    DuplicateName { kind: &'static str, name: String },
}

impl Specification {
    /// Verifies the structural invariants every engine-produced snapshot
    /// maintains:
    ///
    /// 1. variable `r[n]` exists iff resource `r` and node `n` exist
    /// 2. every constraint term resolves to a declared variable
    /// 3. constraint ids, edges, nodes and resource names are unique
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut names = HashSet::new();
        for resource in &self.resources {
            if !names.insert(resource.name.as_str()) {
                return Err(InvariantViolation::DuplicateName {
                    kind: "resource",
                    name: resource.name.clone(),
                });
            }
        }
        let mut nodes = HashSet::new();
        for node in &self.locations.nodes {
            if !nodes.insert(node.as_str()) {
                return Err(InvariantViolation::DuplicateName {
                    kind: "node",
                    name: node.clone(),
                });
            }
        }

        let mut edges = HashSet::new();
        for edge in &self.locations.edges {
            if !nodes.contains(edge.src.as_str()) || !nodes.contains(edge.dst.as_str()) {
                return Err(InvariantViolation::DanglingEdge {
                    src: edge.src.clone(),
                    dst: edge.dst.clone(),
                });
            }
            if !edges.insert((edge.src.as_str(), edge.dst.as_str())) {
                return Err(InvariantViolation::DuplicateEdge {
                    src: edge.src.clone(),
                    dst: edge.dst.clone(),
                });
            }
        }

        let expected: HashSet<String> = self
            .resources
            .iter()
            .flat_map(|r| self.locations.nodes.iter().map(|n| var_id(&r.name, n)))
            .collect();
        let mut declared = HashSet::new();
        for var in &self.vars {
            if !declared.insert(var.id.as_str()) {
                return Err(InvariantViolation::DuplicateVariable(var.id.clone()));
            }
            if !expected.contains(&var.id) {
                return Err(InvariantViolation::OrphanVariable(var.id.clone()));
            }
        }
        // Expected ids are checked in document order so the report is stable.
        for resource in &self.resources {
            for node in &self.locations.nodes {
                let id = var_id(&resource.name, node);
                if !declared.contains(id.as_str()) {
                    return Err(InvariantViolation::MissingVariable(id));
                }
            }
        }

        let mut ids = HashSet::new();
        for constraint in &self.constraints {
            if !ids.insert(constraint.id.as_str()) {
                return Err(InvariantViolation::DuplicateConstraintId(
                    constraint.id.clone(),
                ));
            }
            if let Some(var) = constraint.variables().find(|v| !declared.contains(v)) {
                return Err(InvariantViolation::DanglingReference {
                    constraint: constraint.id.clone(),
                    var: var.to_string(),
                });
            }
        }
        Ok(())
    }
}
