//! Tick driver
//!
//! Glue between the scheduler and the host scheduling primitive. The worker
//! thread and the viewer facade wake the loop with [`TickDriver::request_now`];
//! after that the loop keeps itself alive by arming the frame timer whenever a
//! tick asks for another invocation, and goes quiet otherwise.

use std::sync::{Arc, Mutex, PoisonError};

use stepview_core::{SceneRenderer, TickHost};

use crate::scheduler::{FrameScheduler, TickOutcome, FRAME_INTERVAL};

// ----------------------------------------------------------------------------
// Tick Driver
// ----------------------------------------------------------------------------

/// Owns the scheduler and re-arms it through the host primitive.
///
/// The mutex stands in for the single UI thread: however the host dispatches
/// callbacks, ticks never run concurrently.
pub struct TickDriver<R: SceneRenderer> {
    scheduler: Mutex<FrameScheduler<R>>,
    host: Arc<dyn TickHost>,
}

impl<R: SceneRenderer + 'static> TickDriver<R> {
    pub fn new(scheduler: FrameScheduler<R>, host: Arc<dyn TickHost>) -> Arc<Self> {
        Arc::new(Self {
            scheduler: Mutex::new(scheduler),
            host,
        })
    }

    /// Schedule one scheduler invocation as soon as possible.
    ///
    /// Used for the kick-off tick and whenever the worker thread publishes
    /// messages that should be seen without waiting for a frame timer.
    pub fn request_now(self: &Arc<Self>) {
        let driver = Arc::clone(self);
        self.host.run_now(Box::new(move || driver.run_tick()));
    }

    fn run_tick(self: &Arc<Self>) {
        let outcome = self
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tick();

        if outcome == TickOutcome::Reschedule {
            let driver = Arc::clone(self);
            self.host
                .run_after(FRAME_INTERVAL, Box::new(move || driver.run_tick()));
        }
    }
}
