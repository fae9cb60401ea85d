// SPDX-License-Identifier: MIT OR Apache-2.0
//! Highlight sequencer for vizlab.
//!
//! This crate plays back a traversal order as a timed animation:
//! - One node becomes "current" per tick, accumulating a visited set
//! - Runs can be stopped or replaced at any point
//! - Progress is queryable at any time and pushed to observers
//!
//! ## Architecture
//!
//! The sequencer is built on:
//! - An explicit state machine (`Idle`, `Running`, `Completed`, `Cancelled`)
//! - A run token that makes ticks from superseded runs inert
//! - A pluggable [`Scheduler`] supplying the inter-tick delay
//! - Observers notified outside the internal lock

pub mod config;
pub mod observer;
pub mod scheduler;
pub mod sequencer;
pub mod state;

pub use config::{SequencerConfig, DEFAULT_DELAY_MS};
pub use observer::{ChannelObserver, LogObserver, SequencerEvent, SequencerObserver, SubscriptionId};
pub use scheduler::{ManualScheduler, Scheduler, Tick, TimerHandle, TokioScheduler};
pub use sequencer::{HighlightSequencer, SequencerError, SequencerHandle};
pub use state::{Progress, RunId, SequencerStatus, Snapshot};
