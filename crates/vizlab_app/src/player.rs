// SPDX-License-Identifier: MIT OR Apache-2.0
//! Text rendering of a highlight run.
//!
//! The player is the consumer side of the sequencer: it listens for
//! [`SequencerEvent`]s on a channel, keeps its own picture of which node is
//! current and which are visited, and prints one line per emission.

use crate::error::AppError;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use vizlab_graph::{Graph, NodeId, VisitationOrder};
use vizlab_sequencer::{
    ChannelObserver, HighlightSequencer, LogObserver, SequencerConfig, SequencerEvent,
    SequencerStatus, Snapshot, TokioScheduler,
};

/// How a node is drawn in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// The node being highlighted right now
    Current,
    /// Already highlighted in this run
    Visited,
    /// Not reached yet
    Unvisited,
}

impl NodeState {
    /// Marker printed after the node label
    pub fn symbol(&self) -> char {
        match self {
            NodeState::Current => '*',
            NodeState::Visited => '+',
            NodeState::Unvisited => '.',
        }
    }
}

/// Renderer-side view of the run, rebuilt from events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Node highlighted right now
    pub current: Option<NodeId>,
    /// Nodes highlighted so far, in order
    pub visited: Vec<NodeId>,
    /// Emissions seen
    pub step: usize,
    /// Length of the order
    pub total: usize,
}

impl Frame {
    /// Fold one event into the frame
    pub fn apply(&mut self, event: &SequencerEvent) {
        match event {
            SequencerEvent::Started { total, .. } => {
                *self = Frame {
                    total: *total,
                    ..Frame::default()
                };
            }
            SequencerEvent::Emitted {
                index, total, node, ..
            } => {
                self.current = Some(node.clone());
                self.visited.push(node.clone());
                self.step = index + 1;
                self.total = *total;
            }
            SequencerEvent::Finished { status, .. } => {
                self.current = None;
                if *status == SequencerStatus::Cancelled {
                    self.visited.clear();
                    self.step = 0;
                }
            }
            SequencerEvent::Reset => *self = Frame::default(),
        }
    }

    /// State of a node in this frame
    pub fn state_of(&self, node_id: &NodeId) -> NodeState {
        if self.current.as_ref() == Some(node_id) {
            NodeState::Current
        } else if self.visited.contains(node_id) {
            NodeState::Visited
        } else {
            NodeState::Unvisited
        }
    }
}

fn label<'g>(graph: &'g Graph, node_id: &'g NodeId) -> &'g str {
    graph
        .node(node_id.as_str())
        .map(|n| n.label.as_str())
        .unwrap_or(node_id.as_str())
}

/// One line showing progress, the current node, and every node's state
pub fn render_frame(graph: &Graph, frame: &Frame) -> String {
    let width = frame.total.to_string().len();
    let current = frame
        .current
        .as_ref()
        .map(|id| format!("{} ({})", label(graph, id), id))
        .unwrap_or_else(|| "-".to_string());

    let cells: Vec<String> = graph
        .nodes()
        .map(|n| format!("{}{}", n.label, frame.state_of(&n.id).symbol()))
        .collect();

    format!(
        "[{:>width$}/{}] {:<10} {}",
        frame.step,
        frame.total,
        current,
        cells.join(" "),
        width = width
    )
}

/// Closing line for a finished run
pub fn render_summary(graph: &Graph, frame: &Frame, status: SequencerStatus) -> String {
    match status {
        SequencerStatus::Completed => {
            let path: Vec<&str> = frame.visited.iter().map(|id| label(graph, id)).collect();
            format!("completed: {}", path.join(" -> "))
        }
        other => format!("{other}"),
    }
}

/// Play `order` in real time until it finishes or Ctrl-C is pressed
pub async fn play(
    graph: &Graph,
    order: VisitationOrder,
    config: SequencerConfig,
    out: &mut impl Write,
) -> Result<Snapshot, AppError> {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Could not listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };
    play_until(graph, order, config, interrupt, out).await
}

/// Play `order`, stopping early when `interrupt` resolves
pub async fn play_until(
    graph: &Graph,
    order: VisitationOrder,
    config: SequencerConfig,
    interrupt: impl Future<Output = ()>,
    out: &mut impl Write,
) -> Result<Snapshot, AppError> {
    let sequencer = HighlightSequencer::new(config, Arc::new(TokioScheduler::current()?));
    sequencer.subscribe(Arc::new(LogObserver));
    let (observer, mut events) = ChannelObserver::new();
    sequencer.subscribe(Arc::new(observer));

    let mut frame = Frame::default();
    sequencer.start(order)?;

    tokio::pin!(interrupt);
    let mut interrupted = false;

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    break;
                };
                frame.apply(&event);
                match event {
                    SequencerEvent::Emitted { .. } => {
                        writeln!(out, "{}", render_frame(graph, &frame))?;
                    }
                    SequencerEvent::Finished { status, .. } => {
                        writeln!(out, "{}", render_summary(graph, &frame, status))?;
                        break;
                    }
                    _ => {}
                }
            }
            () = &mut interrupt, if !interrupted => {
                interrupted = true;
                tracing::info!("Interrupted, stopping playback");
                sequencer.stop();
            }
        }
    }

    out.flush()?;
    Ok(sequencer.snapshot())
}
