//! Host scheduling primitive
//!
//! The mechanism by which the scheduler re-arms itself and by which the
//! worker thread wakes it. In the browser this is the event-loop timer; in
//! native builds it is a tokio handle; in tests it is a manually stepped
//! queue. The core only depends on the trait.

use std::time::Duration;

/// A single scheduler invocation, boxed so it can hop threads.
pub type TickFn = Box<dyn FnOnce() + Send + 'static>;

/// Contract for scheduling work onto the UI execution context.
pub trait TickHost: Send + Sync {
    /// Run `tick` on the UI context as soon as possible.
    fn run_now(&self, tick: TickFn);

    /// Run `tick` on the UI context after `delay`.
    fn run_after(&self, delay: Duration, tick: TickFn);
}
