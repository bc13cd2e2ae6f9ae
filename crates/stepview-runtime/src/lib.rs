//! Stepview Runtime
//!
//! The orchestrating half of the stepview coordination core:
//! - [`FrameScheduler`]: the cooperative, self-re-arming tick state machine
//!   that interprets drained messages against the shared context
//! - [`TickDriver`]: re-arms ticks through the host scheduling primitive
//! - the background load task that runs the blocking parse off-thread
//! - [`Viewer`]: the facade exposed to the surrounding application shell
//! - [`TokioTickHost`] / [`ManualTickHost`]: host-primitive implementations
//!   for production and for deterministic tests
//!
//! Control flow in one line: worker pushes messages into the shared context
//! and wakes the driver; every tick drains the queue, mutates render state
//! through the [`SceneRenderer`] seam, and arms a ~60 Hz timer only while
//! something still wants frames.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod driver;
pub mod hosts;
mod load_task;
pub mod scheduler;
pub mod viewer;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use driver::TickDriver;
pub use hosts::{ManualTickHost, TokioTickHost};
pub use scheduler::{FrameScheduler, TickOutcome, FRAME_INTERVAL};
pub use viewer::{demo_document, Viewer, ViewerBuilder};

// Re-export core types for convenience
pub use stepview_core::{
    Color, ContentSink, DocumentHandle, DocumentLoader, LoadCallback, Message, MessageKind,
    MessagePayload, NoopContentSink, PipelineHandle, SceneRenderer, SpinnerConfig, SpinnerParams,
    TickFn, TickHost, ViewerConfig, ViewerContext, ViewerError, ViewerResult,
};
