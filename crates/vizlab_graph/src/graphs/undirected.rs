// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undirected demo graphs.

use crate::edge::Edge;
use crate::graph::Graph;
use crate::node::Node;

/// Cross edges layered on top of the 20-node ring
const CHORDS: [(u8, u8); 10] = [
    (1, 5),
    (2, 7),
    (3, 9),
    (4, 11),
    (6, 15),
    (8, 16),
    (10, 18),
    (12, 19),
    (13, 17),
    (14, 20),
];

/// Number of nodes on the ring
pub const RING_SIZE: u8 = 20;

/// 20 nodes `"1"`..`"20"` (labelled `A`..`T`) joined in a cycle, plus ten chords
///
/// Edges are declared ring first (`1-2`, ..., `19-20`, `20-1`), then the chords.
pub fn ring_with_chords() -> Graph {
    let nodes = (1..=RING_SIZE)
        .map(|i| Node::new(i.to_string()).with_label(char::from(b'A' + i - 1).to_string()))
        .collect();

    let ring = (1..RING_SIZE).map(|i| Edge::new(i.to_string(), (i + 1).to_string()));
    let closing = std::iter::once(Edge::new(RING_SIZE.to_string(), "1"));
    let chords = CHORDS
        .iter()
        .map(|(a, b)| Edge::new(a.to_string(), b.to_string()));

    Graph::from_trusted_parts(
        "Undirected Graph",
        nodes,
        ring.chain(closing).chain(chords).collect(),
    )
}

/// Three nodes `A`, `B`, `C` joined in a triangle
pub fn triangle() -> Graph {
    Graph::from_trusted_parts(
        "Triangle",
        vec![
            Node::new("1").with_label("A"),
            Node::new("2").with_label("B"),
            Node::new("3").with_label("C"),
        ],
        vec![Edge::new("1", "2"), Edge::new("2", "3"), Edge::new("3", "1")],
    )
}
