// SPDX-License-Identifier: MIT OR Apache-2.0
//! Observation of sequencer progress.
//!
//! Observers receive every change of `current`, `visited` and status as a
//! [`SequencerEvent`]. For a given run, `Emitted` events arrive in cursor
//! order and `Finished` comes last.

use crate::state::{RunId, SequencerStatus};
use tokio::sync::mpsc;
use vizlab_graph::NodeId;

/// Change notification from a sequencer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    /// A run began
    Started {
        /// Run token
        run: RunId,
        /// Length of the order
        total: usize,
    },
    /// A node became current and was added to the visited set
    Emitted {
        /// Run token
        run: RunId,
        /// Zero-based position of the node in the order
        index: usize,
        /// Length of the order
        total: usize,
        /// The emitted node
        node: NodeId,
    },
    /// A run ended
    Finished {
        /// Run token
        run: RunId,
        /// `Completed` or `Cancelled`
        status: SequencerStatus,
    },
    /// The sequencer returned to idle
    Reset,
}

impl SequencerEvent {
    /// Run the event belongs to, if any
    pub fn run(&self) -> Option<RunId> {
        match self {
            SequencerEvent::Started { run, .. }
            | SequencerEvent::Emitted { run, .. }
            | SequencerEvent::Finished { run, .. } => Some(*run),
            SequencerEvent::Reset => None,
        }
    }
}

/// Receiver of sequencer events
///
/// Called outside the sequencer's internal lock, so an observer may call
/// back into the sequencer through a
/// [`SequencerHandle`](crate::SequencerHandle). A panic inside `on_event`
/// unwinds to whoever triggered the event and discards the events still
/// queued behind it; later events are delivered normally.
pub trait SequencerObserver: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &SequencerEvent);
}

impl<F> SequencerObserver for F
where
    F: Fn(&SequencerEvent) + Send + Sync,
{
    fn on_event(&self, event: &SequencerEvent) {
        self(event);
    }
}

/// Identifies a registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Observer that forwards events over an unbounded channel
///
/// Lets an async consumer (a renderer, a CLI printer) await events without
/// running inside the sequencer's callbacks.
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<SequencerEvent>,
}

impl ChannelObserver {
    /// Create a new observer and return `(observer, receiver)`
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SequencerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl SequencerObserver for ChannelObserver {
    fn on_event(&self, event: &SequencerEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.sender.send(event.clone());
    }
}

/// Observer that records events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SequencerObserver for LogObserver {
    fn on_event(&self, event: &SequencerEvent) {
        match event {
            SequencerEvent::Started { run, total } => {
                tracing::info!(%run, total, "Highlight run started");
            }
            SequencerEvent::Emitted {
                run,
                index,
                total,
                node,
            } => {
                tracing::debug!(%run, %node, "Highlighting node ({}/{})", index + 1, total);
            }
            SequencerEvent::Finished { run, status } => {
                tracing::info!(%run, %status, "Highlight run finished");
            }
            SequencerEvent::Reset => {
                tracing::debug!("Sequencer reset");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_observer_forwards() {
        let (observer, mut receiver) = ChannelObserver::new();
        let event = SequencerEvent::Started {
            run: RunId::default(),
            total: 3,
        };
        observer.on_event(&event);
        assert_eq!(receiver.try_recv().unwrap(), event);
    }

    #[test]
    fn test_channel_observer_survives_closed_receiver() {
        let (observer, receiver) = ChannelObserver::new();
        drop(receiver);
        observer.on_event(&SequencerEvent::Reset);
    }

    #[test]
    fn test_event_run() {
        assert_eq!(SequencerEvent::Reset.run(), None);
        let run = RunId::default();
        let event = SequencerEvent::Finished {
            run,
            status: SequencerStatus::Cancelled,
        };
        assert_eq!(event.run(), Some(run));
    }
}
