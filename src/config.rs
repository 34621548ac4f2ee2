//! Overlay engine configuration.
//!
//! The host application hands the engine a settings object with the
//! recognized keys `duration`, `maxLines`, `maxComments` and `delay`;
//! unrecognized keys are ignored and missing keys fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::time::DurationMs;

/// Configuration recognized by the overlay engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// On-screen lifetime of one comment, in milliseconds.
    pub duration: DurationMs,
    /// Number of horizontal lanes comments scroll along.
    pub max_lines: usize,
    /// Capacity of the comment slot pool.
    pub max_comments: usize,
    /// Global comment/video offset in milliseconds. May be negative.
    pub delay: DurationMs,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            duration: DurationMs(5000),
            max_lines: 10,
            max_comments: 50,
            delay: DurationMs::ZERO,
        }
    }
}

impl OverlayConfig {
    /// Parse a settings object from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OverlayError::Payload`] when the text is not a JSON
    /// object of the expected shape.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
