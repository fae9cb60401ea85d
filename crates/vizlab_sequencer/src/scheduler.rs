// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timer port used to pace ticks.
//!
//! The sequencer never sleeps or spawns threads itself. It hands each tick
//! to a [`Scheduler`], which runs it once after the requested delay unless
//! the returned [`TimerHandle`] is cancelled first.
//!
//! Two implementations are provided:
//! - [`TokioScheduler`] for real time on a tokio runtime
//! - [`ManualScheduler`] with a virtual clock that only moves when told to

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Handle, TryCurrentError};

/// Callback run when a timer fires
pub type Tick = Box<dyn FnOnce() + Send + 'static>;

/// Source of delayed callbacks
///
/// Implementations must never run `tick` synchronously from inside
/// `schedule`; the caller may hold locks while scheduling.
pub trait Scheduler: Send + Sync {
    /// Run `tick` once after `delay`
    fn schedule(&self, delay: Duration, tick: Tick) -> TimerHandle;
}

/// Handle to a scheduled tick
///
/// Dropping the handle does not cancel the timer.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl TimerHandle {
    /// Create a handle that runs `cancel` the first time it is cancelled
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle that cannot cancel anything
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Cancel the timer; later calls do nothing
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Scheduler backed by `tokio::time::sleep` tasks
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Schedule onto a specific runtime
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Schedule onto the runtime the caller is running in
    pub fn current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, tick: Tick) -> TimerHandle {
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            tick();
        });
        let abort = task.abort_handle();
        TimerHandle::new(move || abort.abort())
    }
}

/// Scheduler driven by a virtual clock
///
/// Clones share the same clock. Timers due at the same instant fire in the
/// order they were scheduled.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<ManualClock>>,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_seq: u64,
    timers: BTreeMap<(Duration, u64), Tick>,
}

impl ManualScheduler {
    /// Create a scheduler at virtual time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.clock.lock().now
    }

    /// Number of timers waiting to fire
    pub fn pending(&self) -> usize {
        self.clock.lock().timers.len()
    }

    /// Move the clock forward, firing every timer that falls due
    ///
    /// Timers scheduled by a firing tick also fire if they fall due within
    /// the window. Returns the number of ticks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let fired = self.fire_while(|due| due <= target);
        self.clock.lock().now = target;
        fired
    }

    /// Fire timers in due order until none remain
    pub fn run_until_idle(&self) -> usize {
        self.fire_while(|_| true)
    }

    fn fire_while(&self, mut should_fire: impl FnMut(Duration) -> bool) -> usize {
        let mut fired = 0;
        loop {
            // The clock lock is released before the tick runs so it can schedule again.
            let tick = {
                let mut clock = self.clock.lock();
                let Some(entry) = clock.timers.first_entry() else {
                    break;
                };
                let due = entry.key().0;
                if !should_fire(due) {
                    break;
                }
                let tick = entry.remove();
                clock.now = clock.now.max(due);
                tick
            };
            tick();
            fired += 1;
        }
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, tick: Tick) -> TimerHandle {
        let mut clock = self.clock.lock();
        let key = (clock.now + delay, clock.next_seq);
        clock.next_seq += 1;
        clock.timers.insert(key, tick);

        let weak = Arc::downgrade(&self.clock);
        TimerHandle::new(move || {
            if let Some(clock) = weak.upgrade() {
                clock.lock().timers.remove(&key);
            }
        })
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clock = self.clock.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &clock.now)
            .field("pending", &clock.timers.len())
            .finish()
    }
}
