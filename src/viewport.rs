//! Viewport state: the three normalized numbers that describe the selection.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

/// Normalized crop selection.
///
/// `x_offset` / `y_offset` are in `[0, 1]` and position the crop rectangle's
/// top-left corner within the room left over on each axis.
/// `zoom` is an inverse scale factor (1.0 = rectangle spans the croppable area).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    pub x_offset: f64,
    pub y_offset: f64,
    pub zoom: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self { x_offset: 0.0, y_offset: 0.0, zoom: 1.0 }
    }
}

impl ViewportState {
    #[must_use]
    pub fn new(x_offset: f64, y_offset: f64, zoom: f64) -> Self {
        Self { x_offset, y_offset, zoom }
    }

    /// Same selection with offsets forced into `[0, 1]` (`NaN` becomes 0).
    #[must_use]
    pub fn with_unit_offsets(self) -> Self {
        Self { x_offset: unit(self.x_offset), y_offset: unit(self.y_offset), zoom: self.zoom }
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Values supplied by the hosting form when a video's miniature is opened.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropInputs {
    pub x_offset: f64,
    pub y_offset: f64,
    pub zoom: f64,
    /// Frame extracted from the video; the image being cropped.
    pub base_image_url: Option<String>,
    /// Last generated miniature. Display-only, never part of the crop geometry.
    pub miniature_url: Option<String>,
}

impl Default for CropInputs {
    fn default() -> Self {
        Self { x_offset: 0.0, y_offset: 0.0, zoom: 1.0, base_image_url: None, miniature_url: None }
    }
}

impl CropInputs {
    /// Parse host inputs from JSON. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error on malformed JSON.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    #[must_use]
    pub fn state(&self) -> ViewportState {
        ViewportState::new(self.x_offset, self.y_offset, self.zoom)
    }
}
