// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timed, cancellable playback of a visitation order.
//!
//! A [`HighlightSequencer`] emits one node of a [`VisitationOrder`] per tick,
//! building up a visited set as it goes:
//!
//! ```text
//! Idle --start--> Running --last tick--> Completed
//!                    |                       |
//!                    +------stop------> Cancelled
//!
//! start() from any state begins a new run; reset() returns a finished run to Idle.
//! ```
//!
//! Every run gets a fresh [`RunId`]. Scheduled ticks carry the id of the run
//! that armed them and do nothing unless that run is still the active,
//! running one, so a superseded or stopped run can never touch the state of
//! its successor even if its timer was already queued.

use crate::config::SequencerConfig;
use crate::observer::{SequencerEvent, SequencerObserver, SubscriptionId};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::state::{AnimationState, RunId, SequencerStatus, Snapshot};
use indexmap::IndexSet;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;
use vizlab_graph::{NodeId, VisitationOrder};

type CompletionCallback = Arc<dyn Fn(RunId) + Send + Sync>;
type ObserverList = Vec<Arc<dyn SequencerObserver>>;

/// Error from sequencer operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequencerError {
    /// Tick delay must be a positive number of milliseconds
    #[error("Invalid tick delay: {0} ms (must be positive)")]
    InvalidDelay(u64),

    /// The sequencer behind a handle has been dropped
    #[error("Sequencer no longer exists")]
    Detached,
}

/// Drives highlight animations over visitation orders
///
/// Owned by a single controller. Dropping it cancels any pending tick.
pub struct HighlightSequencer {
    shared: Arc<Shared>,
}

/// Weak controller for use inside callbacks and observers
#[derive(Clone)]
pub struct SequencerHandle {
    shared: Weak<Shared>,
}

struct Shared {
    scheduler: Arc<dyn Scheduler>,
    inner: Mutex<Inner>,
    dispatch: Mutex<Dispatch>,
}

/// Events waiting for delivery
///
/// Events raised from inside an observer are queued behind the ones
/// still being delivered, so every observer sees a single ordered stream.
#[derive(Default)]
struct Dispatch {
    queue: VecDeque<(SequencerEvent, ObserverList)>,
    draining: bool,
}

struct Inner {
    config: SequencerConfig,
    state: AnimationState,
    /// Latest issued run token
    last_run: RunId,
    /// The single outstanding tick, if any
    pending: Option<TimerHandle>,
    observers: Vec<(SubscriptionId, Arc<dyn SequencerObserver>)>,
    next_subscription: u64,
    on_complete: Option<CompletionCallback>,
}

impl Inner {
    fn cancel_pending(&mut self) {
        if let Some(mut handle) = self.pending.take() {
            handle.cancel();
        }
    }

    fn observer_list(&self) -> ObserverList {
        self.observers.iter().map(|(_, o)| Arc::clone(o)).collect()
    }

    fn is_active(&self, run: RunId) -> bool {
        self.state.run == run && self.state.status.is_running()
    }
}

/// Outcome of a state change, applied after the lock is released
#[derive(Default)]
struct Notification {
    events: Vec<SequencerEvent>,
    observers: ObserverList,
    completed: Option<(RunId, CompletionCallback)>,
    /// Run whose next tick should be armed once observers have seen the events
    rearm: Option<RunId>,
}

impl HighlightSequencer {
    /// Create an idle sequencer
    pub fn new(config: SequencerConfig, scheduler: Arc<dyn Scheduler>) -> Self {
        let last_run = RunId::default();
        Self {
            shared: Arc::new(Shared {
                scheduler,
                inner: Mutex::new(Inner {
                    config,
                    state: AnimationState::idle(last_run),
                    last_run,
                    pending: None,
                    observers: Vec::new(),
                    next_subscription: 0,
                    on_complete: None,
                }),
                dispatch: Mutex::new(Dispatch::default()),
            }),
        }
    }

    /// Set the callback invoked once per completed run
    pub fn with_on_complete(self, callback: impl Fn(RunId) + Send + Sync + 'static) -> Self {
        self.set_on_complete(callback);
        self
    }

    /// Replace the completion callback
    pub fn set_on_complete(&self, callback: impl Fn(RunId) + Send + Sync + 'static) {
        self.shared.inner.lock().on_complete = Some(Arc::new(callback));
    }

    /// Remove the completion callback
    pub fn clear_on_complete(&self) {
        self.shared.inner.lock().on_complete = None;
    }

    /// Weak handle for callbacks that need to control this sequencer
    pub fn handle(&self) -> SequencerHandle {
        SequencerHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Begin playing `order`, replacing any run in progress
    ///
    /// The first node is emitted one delay after this call. An empty order
    /// completes immediately without scheduling anything. Fails without
    /// touching the current run if the configured delay is invalid.
    pub fn start(&self, order: impl Into<VisitationOrder>) -> Result<RunId, SequencerError> {
        self.shared.start(order.into())
    }

    /// Cancel the run in progress
    ///
    /// Returns `false` (and does nothing) when no run is in progress.
    pub fn stop(&self) -> bool {
        self.shared.stop()
    }

    /// Return a completed or cancelled sequencer to idle
    ///
    /// Returns `false` (and does nothing) unless the last run has ended.
    pub fn reset(&self) -> bool {
        self.shared.reset()
    }

    /// Change the delay used by future runs
    ///
    /// A run already in progress keeps the delay it started with.
    pub fn set_delay(&self, delay: Duration) -> Result<(), SequencerError> {
        let config = SequencerConfig::with_delay(delay);
        config.validate()?;
        self.shared.inner.lock().config = config;
        Ok(())
    }

    /// Current configuration
    pub fn config(&self) -> SequencerConfig {
        self.shared.inner.lock().config.clone()
    }

    /// Register an observer
    pub fn subscribe(&self, observer: Arc<dyn SequencerObserver>) -> SubscriptionId {
        let mut inner = self.shared.inner.lock();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.observers.push((id, observer));
        id
    }

    /// Remove an observer; returns whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.shared.inner.lock();
        let before = inner.observers.len();
        inner.observers.retain(|(sub, _)| *sub != id);
        inner.observers.len() != before
    }

    /// Copy of the full observable state
    pub fn snapshot(&self) -> Snapshot {
        self.shared.inner.lock().state.snapshot()
    }

    /// Current status
    pub fn status(&self) -> SequencerStatus {
        self.shared.inner.lock().state.status
    }

    /// Most recently emitted node while running
    pub fn current(&self) -> Option<NodeId> {
        self.shared.inner.lock().state.current().cloned()
    }

    /// Nodes emitted so far in this run, in emission order
    pub fn visited(&self) -> IndexSet<NodeId> {
        self.shared.inner.lock().state.visited().clone()
    }

    /// Check whether a node has been emitted in this run
    pub fn is_visited(&self, node_id: &str) -> bool {
        self.shared.inner.lock().state.visited().contains(node_id)
    }

    /// Check if a run is in progress
    pub fn is_running(&self) -> bool {
        self.status().is_running()
    }
}

impl Drop for HighlightSequencer {
    fn drop(&mut self) {
        self.shared.inner.lock().cancel_pending();
    }
}

impl SequencerHandle {
    /// See [`HighlightSequencer::start`]
    pub fn start(&self, order: impl Into<VisitationOrder>) -> Result<RunId, SequencerError> {
        let shared = self.shared.upgrade().ok_or(SequencerError::Detached)?;
        shared.start(order.into())
    }

    /// See [`HighlightSequencer::stop`]; `false` if the sequencer is gone
    pub fn stop(&self) -> bool {
        self.shared.upgrade().is_some_and(|shared| shared.stop())
    }

    /// See [`HighlightSequencer::snapshot`]; `None` if the sequencer is gone
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.shared
            .upgrade()
            .map(|shared| shared.inner.lock().state.snapshot())
    }
}

impl Shared {
    fn start(self: &Arc<Self>, order: VisitationOrder) -> Result<RunId, SequencerError> {
        let (run, notification) = {
            let mut inner = self.inner.lock();
            inner.config.validate()?;
            inner.cancel_pending();

            let mut events = Vec::new();
            if inner.state.status.is_running() {
                tracing::debug!(run = %inner.state.run, "Superseding highlight run");
                events.push(SequencerEvent::Finished {
                    run: inner.state.run,
                    status: SequencerStatus::Cancelled,
                });
            }

            let run = inner.last_run.next();
            inner.last_run = run;
            let delay = inner.config.delay();
            let total = order.len();
            inner.state = AnimationState::running(run, order, delay);
            events.push(SequencerEvent::Started { run, total });
            tracing::debug!(
                %run,
                total,
                delay_ms = inner.config.delay_ms,
                "Starting highlight run"
            );

            let mut notification = Notification {
                observers: inner.observer_list(),
                ..Notification::default()
            };

            if total == 0 {
                inner.state.complete();
                events.push(SequencerEvent::Finished {
                    run,
                    status: SequencerStatus::Completed,
                });
                notification.completed = inner.on_complete.clone().map(|cb| (run, cb));
            } else {
                notification.rearm = Some(run);
            }

            notification.events = events;
            (run, notification)
        };

        self.deliver(notification);
        Ok(run)
    }

    fn stop(&self) -> bool {
        let notification = {
            let mut inner = self.inner.lock();
            if !inner.state.status.is_running() {
                return false;
            }
            inner.cancel_pending();
            let run = inner.state.run;
            inner.state.cancel();
            tracing::debug!(%run, "Stopped highlight run");

            Notification {
                events: vec![SequencerEvent::Finished {
                    run,
                    status: SequencerStatus::Cancelled,
                }],
                observers: inner.observer_list(),
                ..Notification::default()
            }
        };

        self.deliver_events(notification.events, &notification.observers);
        true
    }

    fn reset(&self) -> bool {
        let notification = {
            let mut inner = self.inner.lock();
            if !inner.state.status.is_terminal() {
                return false;
            }
            inner.state = AnimationState::idle(inner.last_run);
            Notification {
                events: vec![SequencerEvent::Reset],
                observers: inner.observer_list(),
                ..Notification::default()
            }
        };

        self.deliver_events(notification.events, &notification.observers);
        true
    }

    /// Schedule the next tick of `run`, unless it was stopped or replaced meanwhile
    fn arm(self: &Arc<Self>, run: RunId) {
        let mut inner = self.inner.lock();
        if !inner.is_active(run) {
            return;
        }
        inner.cancel_pending();

        let weak = Arc::downgrade(self);
        let handle = self.scheduler.schedule(
            inner.state.delay,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.tick(run);
                }
            }),
        );
        inner.pending = Some(handle);
    }

    fn tick(self: &Arc<Self>, run: RunId) {
        let notification = {
            let mut inner = self.inner.lock();
            if !inner.is_active(run) {
                tracing::trace!(%run, "Ignoring stale tick");
                return;
            }
            inner.pending = None;

            let index = inner.state.cursor();
            let total = inner.state.total();
            let Some(node) = inner.state.advance() else {
                return;
            };
            tracing::trace!(%run, %node, "Tick {}/{}", index + 1, total);

            let mut notification = Notification {
                events: vec![SequencerEvent::Emitted {
                    run,
                    index,
                    total,
                    node,
                }],
                observers: inner.observer_list(),
                ..Notification::default()
            };

            if inner.state.is_exhausted() {
                inner.state.complete();
                tracing::debug!(%run, total, "Highlight run completed");
                notification.events.push(SequencerEvent::Finished {
                    run,
                    status: SequencerStatus::Completed,
                });
                notification.completed = inner.on_complete.clone().map(|cb| (run, cb));
            } else {
                notification.rearm = Some(run);
            }

            notification
        };

        self.deliver(notification);
    }

    fn deliver(self: &Arc<Self>, notification: Notification) {
        self.deliver_events(notification.events, &notification.observers);

        // Armed only after observers ran, so the next emission can never
        // overtake this one, and an observer that stopped the run wins.
        if let Some(run) = notification.rearm {
            self.arm(run);
        }

        if let Some((run, callback)) = notification.completed {
            callback(run);
        }
    }

    fn deliver_events(&self, events: Vec<SequencerEvent>, observers: &ObserverList) {
        {
            let mut dispatch = self.dispatch.lock();
            dispatch
                .queue
                .extend(events.into_iter().map(|event| (event, observers.clone())));
            if dispatch.draining {
                return;
            }
            dispatch.draining = true;
        }

        let _unwind = DrainGuard(&self.dispatch);
        loop {
            let (event, observers) = {
                let mut dispatch = self.dispatch.lock();
                let Some(next) = dispatch.queue.pop_front() else {
                    dispatch.draining = false;
                    break;
                };
                next
            };
            for observer in &observers {
                observer.on_event(&event);
            }
        }
    }
}

/// Reopens the dispatch queue if an observer panics mid-delivery
///
/// The events still queued at that point are dropped.
struct DrainGuard<'a>(&'a Mutex<Dispatch>);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut dispatch = self.0.lock();
            dispatch.queue.clear();
            dispatch.draining = false;
        }
    }
}
