// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge definitions for the graph.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// An undirected edge between two nodes
///
/// The endpoints are stored in declaration order, but traversal treats the
/// edge as symmetric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// First endpoint
    #[serde(alias = "source")]
    pub a: NodeId,
    /// Second endpoint
    #[serde(alias = "target")]
    pub b: NodeId,
}

impl Edge {
    /// Create a new edge
    pub fn new(a: impl Into<NodeId>, b: impl Into<NodeId>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Check if this edge touches a specific node
    pub fn involves(&self, node_id: &str) -> bool {
        self.a.as_str() == node_id || self.b.as_str() == node_id
    }

    /// Get the endpoint opposite to `node_id`, if the edge touches it
    pub fn other_end(&self, node_id: &str) -> Option<&NodeId> {
        if self.a.as_str() == node_id {
            Some(&self.b)
        } else if self.b.as_str() == node_id {
            Some(&self.a)
        } else {
            None
        }
    }

    /// Check if both endpoints are the same node
    pub fn is_loop(&self) -> bool {
        self.a == self.b
    }
}
