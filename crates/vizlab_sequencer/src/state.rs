// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback status and per-run animation state.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use vizlab_graph::{NodeId, VisitationOrder};

/// Token identifying one `start()` of a sequencer
///
/// Issued in strictly increasing order per sequencer instance. A tick
/// carrying a token other than the active one is stale and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct RunId(u64);

impl RunId {
    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The token following this one
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Playback status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SequencerStatus {
    /// No order loaded
    #[default]
    Idle,
    /// Emitting one node per tick
    Running,
    /// Every node of the order was emitted
    Completed,
    /// Stopped before the order was exhausted
    Cancelled,
}

impl SequencerStatus {
    /// Check if a run is in progress
    pub fn is_running(&self) -> bool {
        matches!(self, SequencerStatus::Running)
    }

    /// Check if the last run has ended (completed or cancelled)
    pub fn is_terminal(&self) -> bool {
        matches!(self, SequencerStatus::Completed | SequencerStatus::Cancelled)
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            SequencerStatus::Idle => "idle",
            SequencerStatus::Running => "running",
            SequencerStatus::Completed => "completed",
            SequencerStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SequencerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Step counter for progress displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Nodes emitted so far
    pub current: usize,
    /// Nodes in the order
    pub total: usize,
}

impl Progress {
    /// Fraction emitted in `0.0..=1.0` (an empty order counts as done)
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Point-in-time copy of the sequencer's observable state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    /// Run the state belongs to
    pub run: RunId,
    /// Playback status
    pub status: SequencerStatus,
    /// Most recently emitted node while running
    pub current: Option<NodeId>,
    /// Nodes emitted so far, in emission order
    pub visited: IndexSet<NodeId>,
    /// Number of ticks consumed
    pub cursor: usize,
    /// Length of the order being played
    pub total: usize,
}

impl Snapshot {
    /// Progress through the order
    pub fn progress(&self) -> Progress {
        Progress {
            current: self.cursor,
            total: self.total,
        }
    }

    /// Check whether a node has been emitted
    pub fn is_visited(&self, node_id: &str) -> bool {
        self.visited.contains(node_id)
    }
}

/// Mutable state of one run, owned by the sequencer
#[derive(Debug, Clone)]
pub(crate) struct AnimationState {
    pub(crate) run: RunId,
    pub(crate) status: SequencerStatus,
    order: Vec<NodeId>,
    cursor: usize,
    current: Option<NodeId>,
    visited: IndexSet<NodeId>,
    /// Inter-tick delay, fixed for the whole run
    pub(crate) delay: Duration,
}

impl AnimationState {
    /// Idle state carrying the latest issued run token
    pub(crate) fn idle(run: RunId) -> Self {
        Self {
            run,
            status: SequencerStatus::Idle,
            order: Vec::new(),
            cursor: 0,
            current: None,
            visited: IndexSet::new(),
            delay: Duration::ZERO,
        }
    }

    /// Fresh running state for `order`
    pub(crate) fn running(run: RunId, order: VisitationOrder, delay: Duration) -> Self {
        Self {
            order: order.into_vec(),
            status: SequencerStatus::Running,
            delay,
            ..Self::idle(run)
        }
    }

    pub(crate) fn total(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.cursor >= self.order.len()
    }

    /// Emit the node under the cursor and move past it
    pub(crate) fn advance(&mut self) -> Option<NodeId> {
        let node = self.order.get(self.cursor)?.clone();
        self.cursor += 1;
        self.visited.insert(node.clone());
        self.current = Some(node.clone());
        Some(node)
    }

    /// End the run normally; the visited set stays for display
    pub(crate) fn complete(&mut self) {
        self.status = SequencerStatus::Completed;
        self.current = None;
    }

    /// End the run early, clearing progress
    pub(crate) fn cancel(&mut self) {
        self.status = SequencerStatus::Cancelled;
        self.current = None;
        self.visited.clear();
        self.order.clear();
        self.cursor = 0;
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            run: self.run,
            status: self.status,
            current: self.current.clone(),
            visited: self.visited.clone(),
            cursor: self.cursor,
            total: self.order.len(),
        }
    }

    pub(crate) fn current(&self) -> Option<&NodeId> {
        self.current.as_ref()
    }

    pub(crate) fn visited(&self) -> &IndexSet<NodeId> {
        &self.visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(ids: &[&str]) -> VisitationOrder {
        ids.iter().map(|id| NodeId::from(*id)).collect::<Vec<_>>().into()
    }

    #[test]
    fn test_advance_tracks_current_and_visited() {
        let mut state =
            AnimationState::running(RunId(1), order(&["a", "b"]), Duration::from_millis(10));
        assert_eq!(state.advance(), Some(NodeId::from("a")));
        assert_eq!(state.current().map(NodeId::as_str), Some("a"));
        assert_eq!(state.advance(), Some(NodeId::from("b")));
        assert!(state.is_exhausted());
        assert_eq!(state.advance(), None);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.cursor, 2);
        assert_eq!(snapshot.progress(), Progress { current: 2, total: 2 });
        let visited: Vec<&str> = snapshot.visited.iter().map(NodeId::as_str).collect();
        assert_eq!(visited, vec!["a", "b"]);
    }

    #[test]
    fn test_complete_keeps_visited() {
        let mut state = AnimationState::running(RunId(1), order(&["a"]), Duration::from_millis(10));
        state.advance();
        state.complete();
        assert_eq!(state.status, SequencerStatus::Completed);
        assert_eq!(state.current(), None);
        assert!(state.visited().contains("a"));
    }

    #[test]
    fn test_cancel_clears_progress() {
        let mut state =
            AnimationState::running(RunId(3), order(&["a", "b"]), Duration::from_millis(10));
        state.advance();
        state.cancel();
        let snapshot = state.snapshot();
        assert_eq!(snapshot.status, SequencerStatus::Cancelled);
        assert_eq!(snapshot.run, RunId(3));
        assert!(snapshot.visited.is_empty());
        assert_eq!(snapshot.current, None);
        assert_eq!(snapshot.cursor, 0);
    }

    #[test]
    fn test_status_predicates() {
        assert!(SequencerStatus::Running.is_running());
        assert!(SequencerStatus::Completed.is_terminal());
        assert!(SequencerStatus::Cancelled.is_terminal());
        assert!(!SequencerStatus::Idle.is_terminal());
        assert_eq!(Progress::default().fraction(), 1.0);
        assert_eq!(RunId::default().next().value(), 1);
    }
}
