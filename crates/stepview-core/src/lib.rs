//! Stepview Core
//!
//! This crate provides the foundational pieces of the stepview cross-thread
//! coordination core: the message model exchanged between the background
//! loader and the frame scheduler, the shared viewer context that owns the
//! message queue, and the narrow trait contracts behind which the geometry
//! kernel, the GPU renderer and the host scheduling primitive live.
//!
//! The orchestration itself (frame scheduler, background load task, viewer
//! facade) lives in `stepview-runtime`.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod config;
pub mod context;
pub mod errors;
pub mod host;
pub mod loader;
pub mod message;
pub mod render;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use config::{SpinnerConfig, ViewerConfig};
pub use context::ViewerContext;
pub use errors::{ViewerError, ViewerResult};
pub use host::{TickFn, TickHost};
pub use loader::{DocumentHandle, DocumentLoader, LoadCallback};
pub use message::{Message, MessageKind, MessagePayload};
pub use render::{
    Color, ContentSink, NoopContentSink, PipelineHandle, SceneRenderer, SpinnerParams,
};
