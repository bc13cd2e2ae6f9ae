//! Viewer configuration
//!
//! Consolidates the tunables of the coordination core. The frame-reschedule
//! interval is deliberately not here: it is a fixed constant of the runtime,
//! not a user knob.

use serde::{Deserialize, Serialize};

use crate::render::Color;

// ----------------------------------------------------------------------------
// Spinner Configuration
// ----------------------------------------------------------------------------

/// Animation parameters for the loading spinner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinnerConfig {
    /// Rotation advance per drawn frame, in radians.
    pub step_radians: f32,
    /// Spinner foreground color.
    pub color: Color,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            step_radians: 0.12, // one full turn in ~0.9s at 60 Hz
            color: Color::rgba(0.25, 0.25, 0.28, 1.0),
        }
    }
}

impl SpinnerConfig {
    /// Faster spin for small canvases where the default reads as sluggish.
    pub fn brisk() -> Self {
        Self {
            step_radians: 0.25,
            ..Self::default()
        }
    }
}

// ----------------------------------------------------------------------------
// Viewer Configuration
// ----------------------------------------------------------------------------

/// Top-level configuration for one viewer instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Id given to the canvas element created inside the host container.
    pub canvas_id: String,
    /// Background color the surface is cleared to.
    pub background: Color,
    /// Loading-spinner animation parameters.
    pub spinner: SpinnerConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            canvas_id: "stepview-canvas".to_string(),
            background: Color::PLATINUM,
            spinner: SpinnerConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Override the canvas element id.
    pub fn with_canvas_id(mut self, canvas_id: impl Into<String>) -> Self {
        self.canvas_id = canvas_id.into();
        self
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
