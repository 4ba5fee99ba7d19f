//! Location graph

use serde::{Deserialize, Serialize};

/// An ordered connection between two nodes.
///
/// Edges are stored directed; `(a, b)` and `(b, a)` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub src: String,
    pub dst: String,
}

impl Edge {
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
        }
    }

    /// Returns true if either endpoint is `node`.
    pub fn touches(&self, node: &str) -> bool {
        self.src == node || self.dst == node
    }

    /// Returns true if this edge connects `src` to `dst` in that order.
    pub fn connects(&self, src: &str, dst: &str) -> bool {
        self.src == src && self.dst == dst
    }
}

/// Nodes in insertion order plus the directed edges between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationGraph {
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl LocationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_node(&self, node: &str) -> bool {
        self.nodes.iter().any(|n| n == node)
    }

    pub fn has_edge(&self, src: &str, dst: &str) -> bool {
        self.edges.iter().any(|e| e.connects(src, dst))
    }
}
