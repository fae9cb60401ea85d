// SPDX-License-Identifier: MIT OR Apache-2.0
//! Breadth-first and depth-first visitation orders.
//!
//! Every function here is pure: the graph is only read, and the same
//! inputs always produce the same order. When a node has several
//! unvisited neighbors they are taken in edge declaration order, scanning
//! edges where the node is either endpoint.

use crate::algorithm::TraversalMode;
use crate::graph::Graph;
use crate::node::NodeId;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet, VecDeque};

/// Ordered sequence of node IDs produced by a traversal
///
/// Each ID appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitationOrder(Vec<NodeId>);

impl VisitationOrder {
    /// Number of nodes in the order
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the order is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the IDs in visit order
    pub fn iter(&self) -> std::slice::Iter<'_, NodeId> {
        self.0.iter()
    }

    /// Borrow the IDs as a slice
    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }

    /// Check whether a node was visited
    pub fn contains(&self, node_id: &str) -> bool {
        self.position(node_id).is_some()
    }

    /// Index at which a node was visited
    pub fn position(&self, node_id: &str) -> Option<usize> {
        self.0.iter().position(|id| id.as_str() == node_id)
    }

    /// Take ownership of the IDs
    pub fn into_vec(self) -> Vec<NodeId> {
        self.0
    }
}

impl From<Vec<NodeId>> for VisitationOrder {
    fn from(ids: Vec<NodeId>) -> Self {
        Self(ids)
    }
}

impl IntoIterator for VisitationOrder {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a VisitationOrder {
    type Item = &'a NodeId;
    type IntoIter = std::slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Hooks called while a traversal runs
///
/// All methods default to doing nothing.
pub trait TraversalObserver {
    /// A node was placed on the frontier (BFS) or is about to be descended into (DFS)
    fn on_enqueue(&mut self, _node: &NodeId) {}

    /// A node was appended to the result at `index`
    fn on_visit(&mut self, _node: &NodeId, _index: usize) {}
}

impl TraversalObserver for () {}

/// Error during traversal
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Start node is not part of the graph
    #[error("Invalid start node: {0}")]
    InvalidStartNode(NodeId),
}

/// Compute the visitation order from `start` using `mode`
pub fn traverse(
    graph: &Graph,
    start: &str,
    mode: TraversalMode,
) -> Result<VisitationOrder, SearchError> {
    traverse_with(graph, start, mode, &mut ())
}

/// Compute the visitation order, reporting progress to an observer
pub fn traverse_with<O>(
    graph: &Graph,
    start: &str,
    mode: TraversalMode,
    observer: &mut O,
) -> Result<VisitationOrder, SearchError>
where
    O: TraversalObserver + ?Sized,
{
    let Some(start) = graph.node(start).map(|n| &n.id) else {
        tracing::debug!(start, %mode, "Rejected traversal from unknown node");
        return Err(SearchError::InvalidStartNode(NodeId::from(start)));
    };

    let adjacency = graph.adjacency();
    let order = match mode {
        TraversalMode::Bfs => breadth_first(&adjacency, start, observer),
        TraversalMode::Dfs => depth_first(&adjacency, start, observer),
    };

    tracing::debug!(
        start = %start,
        %mode,
        visited = order.len(),
        nodes = graph.node_count(),
        "Traversal finished"
    );
    Ok(order)
}

/// Breadth-first visitation order
pub fn bfs(graph: &Graph, start: &str) -> Result<VisitationOrder, SearchError> {
    traverse(graph, start, TraversalMode::Bfs)
}

/// Depth-first (pre-order) visitation order
pub fn dfs(graph: &Graph, start: &str) -> Result<VisitationOrder, SearchError> {
    traverse(graph, start, TraversalMode::Dfs)
}

/// Hop distance from `start` for every reachable node, in BFS order
pub fn levels(graph: &Graph, start: &str) -> Result<IndexMap<NodeId, usize>, SearchError> {
    let Some(start) = graph.node(start).map(|n| &n.id) else {
        return Err(SearchError::InvalidStartNode(NodeId::from(start)));
    };

    let adjacency = graph.adjacency();
    let mut distances = IndexMap::new();
    let mut queue = VecDeque::new();
    distances.insert(start.clone(), 0usize);
    queue.push_back((start, 0usize));

    while let Some((current, depth)) = queue.pop_front() {
        for &next in neighbors_of(&adjacency, current) {
            if !distances.contains_key(next.as_str()) {
                distances.insert(next.clone(), depth + 1);
                queue.push_back((next, depth + 1));
            }
        }
    }

    Ok(distances)
}

type Adjacency<'g> = HashMap<&'g str, Vec<&'g NodeId>>;

fn neighbors_of<'a, 'g>(adjacency: &'a Adjacency<'g>, node: &NodeId) -> &'a [&'g NodeId] {
    adjacency
        .get(node.as_str())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn breadth_first<O>(adjacency: &Adjacency<'_>, start: &NodeId, observer: &mut O) -> VisitationOrder
where
    O: TraversalObserver + ?Sized,
{
    // A node is marked when first enqueued, so the frontier never holds duplicates
    // and its position is fixed by its first discovery.
    let mut discovered: HashSet<&str> = HashSet::new();
    let mut frontier = VecDeque::new();
    let mut result = Vec::new();

    discovered.insert(start.as_str());
    frontier.push_back(start);
    observer.on_enqueue(start);

    while let Some(current) = frontier.pop_front() {
        observer.on_visit(current, result.len());
        result.push(current.clone());

        for &next in neighbors_of(adjacency, current) {
            if discovered.insert(next.as_str()) {
                frontier.push_back(next);
                observer.on_enqueue(next);
            }
        }
    }

    VisitationOrder(result)
}

fn depth_first<O>(adjacency: &Adjacency<'_>, start: &NodeId, observer: &mut O) -> VisitationOrder
where
    O: TraversalObserver + ?Sized,
{
    // Each frame holds a node and the index of its next neighbor to try,
    // which replays recursive pre-order without using the call stack.
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<(&NodeId, usize)> = Vec::new();
    let mut result = Vec::new();

    visited.insert(start.as_str());
    observer.on_enqueue(start);
    observer.on_visit(start, 0);
    result.push(start.clone());
    stack.push((start, 0));

    while let Some(frame) = stack.last_mut() {
        let Some(&next) = neighbors_of(adjacency, frame.0).get(frame.1) else {
            stack.pop();
            continue;
        };
        frame.1 += 1;

        if visited.insert(next.as_str()) {
            observer.on_enqueue(next);
            observer.on_visit(next, result.len());
            result.push(next.clone());
            stack.push((next, 0));
        }
    }

    VisitationOrder(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;
    use crate::graphs::undirected;
    use crate::node::Node;

    fn ids(order: &VisitationOrder) -> Vec<&str> {
        order.iter().map(NodeId::as_str).collect()
    }

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> Graph {
        Graph::from_parts(
            "test",
            nodes.iter().map(|id| Node::new(*id)),
            edges.iter().map(|(a, b)| Edge::new(*a, *b)),
        )
        .unwrap()
    }

    /// Straightforward recursive pre-order used as the reference for DFS.
    fn recursive_dfs(graph: &Graph, start: &str) -> Vec<String> {
        fn visit(graph: &Graph, id: &str, seen: &mut HashSet<String>, out: &mut Vec<String>) {
            if !seen.insert(id.to_string()) {
                return;
            }
            out.push(id.to_string());
            let neighbors: Vec<String> = graph.neighbors(id).map(|n| n.to_string()).collect();
            for next in neighbors {
                if !seen.contains(&next) {
                    visit(graph, &next, seen, out);
                }
            }
        }
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        visit(graph, start, &mut seen, &mut out);
        out
    }

    #[test]
    fn test_bfs_ring_fixture_prefix() {
        let g = undirected::ring_with_chords();
        let order = bfs(&g, "1").unwrap();
        assert_eq!(&ids(&order)[..4], &["1", "2", "20", "5"]);
        assert_eq!(order.len(), 20);
    }

    #[test]
    fn test_dfs_ring_fixture_prefix() {
        let g = undirected::ring_with_chords();
        let order = dfs(&g, "1").unwrap();
        assert_eq!(&ids(&order)[..3], &["1", "2", "3"]);
        assert_eq!(order.len(), 20);
        // The ring alone reaches every node, so the chords are never taken.
        let expected: Vec<String> = (1..=20).map(|i| i.to_string()).collect();
        assert_eq!(ids(&order), expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_fixture_orders_are_permutations() {
        let g = undirected::ring_with_chords();
        for mode in TraversalMode::all() {
            let order = traverse(&g, "1", *mode).unwrap();
            let unique: HashSet<&str> = ids(&order).into_iter().collect();
            assert_eq!(unique.len(), g.node_count());
            for id in g.node_ids() {
                assert!(order.contains(id.as_str()), "{mode} missed {id}");
            }
        }
    }

    #[test]
    fn test_full_bfs_order_on_fixture() {
        let g = undirected::ring_with_chords();
        let order = bfs(&g, "1").unwrap();
        assert_eq!(
            ids(&order),
            vec![
                "1", "2", "20", "5", "3", "7", "19", "14", "4", "6", "9", "8", "18", "12", "13",
                "15", "11", "10", "16", "17",
            ]
        );
    }

    #[test]
    fn test_unreachable_nodes_absent() {
        let g = graph(
            &["a", "b", "c", "x", "y"],
            &[("a", "b"), ("b", "c"), ("x", "y")],
        );
        for mode in TraversalMode::all() {
            let order = traverse(&g, "a", *mode).unwrap();
            assert_eq!(ids(&order), vec!["a", "b", "c"]);
            let order = traverse(&g, "y", *mode).unwrap();
            assert_eq!(ids(&order), vec!["y", "x"]);
        }
    }

    #[test]
    fn test_isolated_start_node() {
        let g = graph(&["solo", "a", "b"], &[("a", "b")]);
        for mode in TraversalMode::all() {
            assert_eq!(ids(&traverse(&g, "solo", *mode).unwrap()), vec!["solo"]);
        }
    }

    #[test]
    fn test_invalid_start_node() {
        let g = undirected::ring_with_chords();
        for mode in TraversalMode::all() {
            let err = traverse(&g, "21", *mode).unwrap_err();
            assert_eq!(err, SearchError::InvalidStartNode(NodeId::from("21")));
        }
        assert!(bfs(&Graph::new("empty"), "1").is_err());
        assert!(levels(&g, "nope").is_err());
    }

    #[test]
    fn test_traversal_is_deterministic() {
        let g = undirected::ring_with_chords();
        for start in ["1", "7", "13", "20"] {
            for mode in TraversalMode::all() {
                assert_eq!(
                    traverse(&g, start, *mode).unwrap(),
                    traverse(&g, start, *mode).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_bfs_visits_in_non_decreasing_distance() {
        let g = undirected::ring_with_chords();
        for start in g.node_ids() {
            let order = bfs(&g, start.as_str()).unwrap();
            let distances = levels(&g, start.as_str()).unwrap();
            let depths: Vec<usize> = order.iter().map(|id| distances[id]).collect();
            assert!(depths.windows(2).all(|w| w[0] <= w[1]), "from {start}: {depths:?}");
            assert_eq!(distances.len(), order.len());
        }
    }

    #[test]
    fn test_dfs_matches_recursive_preorder() {
        let g = undirected::ring_with_chords();
        for start in g.node_ids() {
            let order = dfs(&g, start.as_str()).unwrap();
            let expected = recursive_dfs(&g, start.as_str());
            assert_eq!(ids(&order), expected.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_tie_break_scans_both_endpoints() {
        // "b" appears as the second endpoint of the first edge, so it comes first.
        let g = graph(&["s", "a", "b"], &[("b", "s"), ("s", "a")]);
        assert_eq!(ids(&bfs(&g, "s").unwrap()), vec!["s", "b", "a"]);
        assert_eq!(ids(&dfs(&g, "s").unwrap()), vec!["s", "b", "a"]);
    }

    #[test]
    fn test_parallel_edges_and_loops() {
        let g = graph(&["a", "b"], &[("a", "a"), ("a", "b"), ("b", "a")]);
        for mode in TraversalMode::all() {
            assert_eq!(ids(&traverse(&g, "a", *mode).unwrap()), vec!["a", "b"]);
        }
    }

    #[test]
    fn test_deep_path_does_not_overflow() {
        let names: Vec<String> = (0..50_000).map(|i| i.to_string()).collect();
        let mut g = Graph::new("path");
        for name in &names {
            g.add_node(Node::new(name.as_str())).unwrap();
        }
        for pair in names.windows(2) {
            g.connect(pair[0].as_str(), pair[1].as_str()).unwrap();
        }
        let order = dfs(&g, "0").unwrap();
        assert_eq!(order.len(), names.len());
        assert_eq!(order.as_slice().last().map(NodeId::as_str), Some("49999"));
    }

    #[derive(Default)]
    struct Recorder {
        enqueued: Vec<String>,
        visited: Vec<(String, usize)>,
    }

    impl TraversalObserver for Recorder {
        fn on_enqueue(&mut self, node: &NodeId) {
            self.enqueued.push(node.to_string());
        }

        fn on_visit(&mut self, node: &NodeId, index: usize) {
            self.visited.push((node.to_string(), index));
        }
    }

    #[test]
    fn test_observer_sees_every_visit() {
        let g = undirected::ring_with_chords();
        for mode in TraversalMode::all() {
            let mut recorder = Recorder::default();
            let order = traverse_with(&g, "1", *mode, &mut recorder).unwrap();
            assert_eq!(recorder.enqueued.len(), order.len());
            for (i, (id, index)) in recorder.visited.iter().enumerate() {
                assert_eq!(*index, i);
                assert_eq!(order.as_slice()[i].as_str(), id);
            }
        }
    }
}
