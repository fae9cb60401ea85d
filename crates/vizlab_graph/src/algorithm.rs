// SPDX-License-Identifier: MIT OR Apache-2.0
//! Traversal modes and their descriptive catalogue entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Traversal strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalMode {
    /// Breadth-first search
    #[default]
    Bfs,
    /// Depth-first search
    Dfs,
}

impl TraversalMode {
    /// Short identifier (`"bfs"` or `"dfs"`)
    pub fn id(&self) -> &'static str {
        match self {
            TraversalMode::Bfs => "bfs",
            TraversalMode::Dfs => "dfs",
        }
    }

    /// Catalogue entry describing this algorithm
    pub fn info(&self) -> &'static AlgorithmInfo {
        match self {
            TraversalMode::Bfs => &BFS_INFO,
            TraversalMode::Dfs => &DFS_INFO,
        }
    }

    /// All supported modes
    pub fn all() -> &'static [TraversalMode] {
        &[TraversalMode::Bfs, TraversalMode::Dfs]
    }
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TraversalMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(TraversalMode::Bfs),
            "dfs" => Ok(TraversalMode::Dfs),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Unknown traversal mode name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown traversal mode: {0:?} (expected \"bfs\" or \"dfs\")")]
pub struct ParseModeError(pub String);

/// Descriptive metadata for a traversal algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmInfo {
    /// Short identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Prose description
    pub description: &'static str,
    /// Time complexity
    pub time_complexity: &'static str,
    /// Space complexity
    pub space_complexity: &'static str,
    /// Pseudocode, one line per entry
    pub pseudocode: &'static [&'static str],
}

static BFS_INFO: AlgorithmInfo = AlgorithmInfo {
    id: "bfs",
    name: "Breadth-First Search (BFS)",
    description: "BFS explores all vertices at the present depth before moving on to \
        vertices at the next depth level. A queue tracks which vertex to explore next.",
    time_complexity: "O(V + E) where V is the number of vertices and E is the number of edges",
    space_complexity: "O(V) where V is the number of vertices",
    pseudocode: &[
        "procedure BFS(G, startVertex):",
        "    let Q be a queue",
        "    Q.enqueue(startVertex)",
        "    mark startVertex as visited",
        "",
        "    while Q is not empty:",
        "        vertex = Q.dequeue()",
        "        for each neighbor of vertex:",
        "            if neighbor is not visited:",
        "                Q.enqueue(neighbor)",
        "                mark neighbor as visited",
    ],
};

static DFS_INFO: AlgorithmInfo = AlgorithmInfo {
    id: "dfs",
    name: "Depth-First Search (DFS)",
    description: "DFS explores as far as possible along each branch before backtracking. \
        A stack remembers where to return when hitting a dead end.",
    time_complexity: "O(V + E) where V is the number of vertices and E is the number of edges",
    space_complexity: "O(V) where V is the number of vertices",
    pseudocode: &[
        "procedure DFS(G, startVertex):",
        "    mark startVertex as visited",
        "    for each neighbor of startVertex:",
        "        if neighbor is not visited:",
        "            DFS(G, neighbor)",
    ],
};
