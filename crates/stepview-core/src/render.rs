//! Renderer contracts
//!
//! GPU buffer and shader work is outside the core; the scheduler drives the
//! surface exclusively through [`SceneRenderer`]. All methods are synchronous
//! and called only from scheduler ticks.

use serde::{Deserialize, Serialize};

use crate::loader::DocumentHandle;

// ----------------------------------------------------------------------------
// Color
// ----------------------------------------------------------------------------

/// Normalized RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// The fixed background color the surface is cleared to.
    pub const PLATINUM: Self = Self::rgba(0.898, 0.894, 0.886, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

// ----------------------------------------------------------------------------
// Pipeline Handle
// ----------------------------------------------------------------------------

/// Opaque identifier for a renderer-owned pipeline (shader program).
///
/// The scheduler holds the current handle and asks for a rebuild after scene
/// transitions; what the identifier refers to is the renderer's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineHandle(u64);

impl PipelineHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> u64 {
        self.0
    }
}

// ----------------------------------------------------------------------------
// Spinner Parameters
// ----------------------------------------------------------------------------

/// Per-frame animation parameters for the loading spinner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinnerParams {
    /// Current rotation angle in radians, wrapped to one turn.
    pub angle: f32,
    pub color: Color,
}

// ----------------------------------------------------------------------------
// Scene Renderer
// ----------------------------------------------------------------------------

/// Contract for the GPU-backed canvas collaborator.
///
/// Implementations are UI-thread-only in spirit; the runtime serializes all
/// calls through the scheduler, so `&mut self` access is never concurrent.
pub trait SceneRenderer: Send {
    /// Clear the render surface to a solid color. Idempotent.
    fn clear_surface(&mut self, color: Color);

    /// Build (or rebuild) the render pipeline, returning its handle.
    fn build_pipeline(&mut self) -> PipelineHandle;

    /// Draw one frame of the loading spinner.
    fn draw_spinner(&mut self, pipeline: &PipelineHandle, params: &SpinnerParams);

    /// Draw the startup splash checkerboard across the surface.
    fn draw_splash(&mut self);

    /// (Re)initialize an empty 3D scene.
    fn init_empty_scene(&mut self);

    /// Bind a parsed document into the scene and view.
    fn bind_document_to_scene(&mut self, document: &DocumentHandle);
}

// ----------------------------------------------------------------------------
// Content Sink
// ----------------------------------------------------------------------------

/// Side channel for delivering loaded raw content to the surrounding UI,
/// e.g. a source-text panel next to the canvas. Carries no viewer state.
pub trait ContentSink: Send {
    fn publish_source(&self, text: &str);
}

/// Sink that drops the content; the default when the shell has no use for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopContentSink;

impl ContentSink for NoopContentSink {
    fn publish_source(&self, _text: &str) {}
}
