// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and undirected edges.

use crate::edge::Edge;
use crate::node::{Node, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// An undirected node graph
///
/// Node IDs are unique and every edge endpoint refers to an existing node.
/// Both invariants are checked on insertion and on deserialization, so a
/// `Graph` value is always well formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphData", into = "GraphData")]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in declaration order
    nodes: IndexMap<NodeId, Node>,
    /// Edges in declaration order
    edges: Vec<Edge>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            edges: Vec::new(),
        }
    }

    /// Build a graph from node and edge lists, validating both
    pub fn from_parts(
        name: impl Into<String>,
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new(name);
        for node in nodes {
            graph.add_node(node)?;
        }
        for edge in edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    /// Build a graph from parts the caller already knows to be valid
    pub(crate) fn from_trusted_parts(
        name: impl Into<String>,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Self {
        let declared = nodes.len();
        let graph = Self {
            name: name.into(),
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
            edges,
        };
        debug_assert_eq!(graph.nodes.len(), declared);
        debug_assert!(graph
            .edges
            .iter()
            .all(|e| graph.contains(e.a.as_str()) && graph.contains(e.b.as_str())));
        graph
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        if self.nodes.contains_key(node.id.as_str()) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    /// Connect two existing nodes, returning the edge's declaration index
    pub fn connect(
        &mut self,
        a: impl Into<NodeId>,
        b: impl Into<NodeId>,
    ) -> Result<usize, GraphError> {
        self.add_edge(Edge::new(a, b))
    }

    /// Append an edge, returning its declaration index
    pub fn add_edge(&mut self, edge: Edge) -> Result<usize, GraphError> {
        let index = self.edges.len();
        for endpoint in [&edge.a, &edge.b] {
            if !self.nodes.contains_key(endpoint.as_str()) {
                return Err(GraphError::InvalidEdgeReference {
                    edge: index,
                    node: endpoint.clone(),
                });
            }
        }
        self.edges.push(edge);
        Ok(index)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    /// Check whether a node exists
    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// Get all nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs in declaration order
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get all edges in declaration order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Neighbors of a node, following edge declaration order in both directions
    pub fn neighbors<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.edges.iter().filter_map(move |e| e.other_end(node_id))
    }

    /// Number of edges touching a node
    pub fn degree(&self, node_id: &str) -> usize {
        self.neighbors(node_id).count()
    }

    /// Build the full neighbor table in one pass over the edges
    ///
    /// Each list keeps edge declaration order, matching [`Graph::neighbors`].
    pub fn adjacency(&self) -> HashMap<&str, Vec<&NodeId>> {
        let mut table: HashMap<&str, Vec<&NodeId>> = self
            .nodes
            .keys()
            .map(|id| (id.as_str(), Vec::new()))
            .collect();

        for edge in &self.edges {
            table.entry(edge.a.as_str()).or_default().push(&edge.b);
            if !edge.is_loop() {
                table.entry(edge.b.as_str()).or_default().push(&edge.a);
            }
        }

        table
    }

    /// Load a graph from a RON file
    pub fn load(path: &Path) -> Result<Self, GraphFileError> {
        let content = std::fs::read_to_string(path)?;
        let graph = ron::from_str(&content)?;
        tracing::debug!("Loaded graph from {:?}", path);
        Ok(graph)
    }

    /// Save the graph to a RON file
    pub fn save(&self, path: &Path) -> Result<(), GraphFileError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Serialized form of a [`Graph`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "Graph")]
struct GraphData {
    name: String,
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl TryFrom<GraphData> for Graph {
    type Error = GraphError;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        Self::from_parts(data.name, data.nodes, data.edges)
    }
}

impl From<Graph> for GraphData {
    fn from(graph: Graph) -> Self {
        Self {
            name: graph.name,
            nodes: graph.nodes.into_values().collect(),
            edges: graph.edges,
        }
    }
}

/// Error when building a graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Node ID already present
    #[error("Duplicate node: {0}")]
    DuplicateNode(NodeId),

    /// Edge endpoint is not a node of the graph
    #[error("Edge {edge} references unknown node: {node}")]
    InvalidEdgeReference {
        /// Declaration index of the offending edge
        edge: usize,
        /// The missing endpoint
        node: NodeId,
    },
}

/// Error when reading or writing a graph file
#[derive(Debug, thiserror::Error)]
pub enum GraphFileError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or invalid graph document
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failure
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}
