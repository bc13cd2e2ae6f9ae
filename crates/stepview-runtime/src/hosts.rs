//! Host scheduling primitive implementations
//!
//! [`TokioTickHost`] is the production host: immediate ticks are spawned
//! tasks, delayed ticks sleep on the tokio timer wheel. [`ManualTickHost`]
//! queues everything and lets tests (or a headless embedder) step the loop
//! deterministically, frame by frame.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use stepview_core::{TickFn, TickHost};

// ----------------------------------------------------------------------------
// Tokio Tick Host
// ----------------------------------------------------------------------------

/// Host primitive backed by a tokio runtime handle.
#[derive(Debug, Clone)]
pub struct TokioTickHost {
    handle: tokio::runtime::Handle,
}

impl TokioTickHost {
    /// Capture the ambient runtime. Panics outside a tokio runtime context,
    /// same as `Handle::current`.
    pub fn new() -> Self {
        Self {
            handle: tokio::runtime::Handle::current(),
        }
    }

    pub fn with_handle(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }
}

impl Default for TokioTickHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TickHost for TokioTickHost {
    fn run_now(&self, tick: TickFn) {
        self.handle.spawn(async move { tick() });
    }

    fn run_after(&self, delay: Duration, tick: TickFn) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            tick();
        });
    }
}

// ----------------------------------------------------------------------------
// Manual Tick Host
// ----------------------------------------------------------------------------

/// Deterministic host for tests and headless embedding.
///
/// Immediate and delayed ticks are queued instead of executed; callers step
/// the loop with [`run_pending`](Self::run_pending) and
/// [`fire_timer`](Self::fire_timer). Delays are recorded but not simulated;
/// ordering, not wall time, is what the coordination core guarantees.
#[derive(Debug, Default)]
pub struct ManualTickHost {
    pending: Mutex<Pending>,
}

#[derive(Default)]
struct Pending {
    immediate: VecDeque<TickFn>,
    timers: VecDeque<(Duration, TickFn)>,
}

impl std::fmt::Debug for Pending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pending")
            .field("immediate", &self.immediate.len())
            .field("timers", &self.timers.len())
            .finish()
    }
}

impl ManualTickHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run all queued immediate ticks, including ones queued while running.
    /// Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let tick = self.lock().immediate.pop_front();
            match tick {
                Some(tick) => {
                    tick();
                    ran += 1;
                }
                None => break,
            }
        }
        ran
    }

    /// Fire the oldest armed timer, if any, then run whatever it queued
    /// immediately. Returns `false` when no timer was armed (the loop idles).
    pub fn fire_timer(&self) -> bool {
        let timer = self.lock().timers.pop_front();
        match timer {
            Some((_delay, tick)) => {
                tick();
                self.run_pending();
                true
            }
            None => false,
        }
    }

    /// Advance up to `frames` frame timers; stops early once the loop idles.
    /// Returns how many frames actually ran.
    pub fn step_frames(&self, frames: usize) -> usize {
        let mut stepped = 0;
        for _ in 0..frames {
            if !self.fire_timer() {
                break;
            }
            stepped += 1;
        }
        stepped
    }

    /// Number of currently armed timers.
    pub fn pending_timers(&self) -> usize {
        self.lock().timers.len()
    }

    /// Number of queued immediate ticks.
    pub fn pending_immediate(&self) -> usize {
        self.lock().immediate.len()
    }
}

impl TickHost for ManualTickHost {
    fn run_now(&self, tick: TickFn) {
        self.lock().immediate.push_back(tick);
    }

    fn run_after(&self, delay: Duration, tick: TickFn) {
        self.lock().timers.push_back((delay, tick));
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
