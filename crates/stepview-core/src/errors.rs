//! Error types for the stepview coordination core
//!
//! Failures on the worker thread never cross the thread boundary as panics:
//! a failed parse is terminal to that load attempt and observable only
//! through the spinner never stopping. The errors here cover the viewer's
//! synchronous surface.

/// Errors surfaced by the viewer facade.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// A load was requested while another is still in flight.
    /// Loads are rejected, not queued or cancelled.
    #[error("a document load is already in flight")]
    LoadInProgress,

    /// The supplied document content is empty or whitespace-only.
    #[error("document content is empty")]
    EmptyContent,
}

pub type ViewerResult<T> = core::result::Result<T, ViewerError>;
