// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undirected graph model and traversal orders for vizlab.
//!
//! This crate provides:
//! - A validated node/edge graph (unique node IDs, edges only between
//!   existing nodes)
//! - Breadth-first and depth-first visitation orders with a fixed
//!   edge-declaration tie-break
//! - Descriptive metadata for each traversal algorithm
//! - Bundled demo graphs
//!
//! ## Architecture
//!
//! The graph is read-only to traversal. A traversal produces a
//! [`VisitationOrder`], which callers hand to an animation driver or any
//! other consumer. Progress can be observed through [`TraversalObserver`].

pub mod algorithm;
pub mod edge;
pub mod graph;
pub mod graphs;
pub mod node;
pub mod search;

pub use algorithm::{AlgorithmInfo, ParseModeError, TraversalMode};
pub use edge::Edge;
pub use graph::{Graph, GraphError, GraphFileError};
pub use node::{Node, NodeId};
pub use search::{
    bfs, dfs, levels, traverse, traverse_with, SearchError, TraversalObserver, VisitationOrder,
};
