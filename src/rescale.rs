//! Persisted crop parameters and what the server does with them.
//!
//! The Resource API stores the selection as three scalars and cuts the
//! miniature server-side. [`Rescale`] is the validated form of those scalars,
//! [`CropWindow`] reproduces the generator's window arithmetic so the editor
//! can preview exactly what will be cut, and [`MiniatureRequest`] is the body
//! of the `generate_miniature` call.

use serde::Serialize;

use crate::config::CropConfig;
use crate::error::RescaleError;
use crate::geometry::Rect;
use crate::viewport::ViewportState;

#[cfg(test)]
#[path = "rescale_test.rs"]
mod rescale_test;

const ASPECT_W: f64 = 16.0;
const ASPECT_H: f64 = 9.0;

/// Validated crop parameters: offsets in `[0, 1]`, zoom at least 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescale {
    x_offset: f64,
    y_offset: f64,
    zoom: f64,
}

impl Default for Rescale {
    fn default() -> Self {
        Self { x_offset: 0.0, y_offset: 0.0, zoom: 1.0 }
    }
}

impl Rescale {
    /// # Errors
    ///
    /// Rejects `zoom < 1` and offsets outside `[0, 1]`, including `NaN`.
    pub fn new(x_offset: f64, y_offset: f64, zoom: f64) -> Result<Self, RescaleError> {
        if !(zoom >= 1.0 && zoom.is_finite()) {
            return Err(RescaleError::Zoom(zoom));
        }
        check_offset('x', x_offset)?;
        check_offset('y', y_offset)?;
        Ok(Self { x_offset, y_offset, zoom })
    }

    #[must_use]
    pub fn x_offset(&self) -> f64 {
        self.x_offset
    }

    #[must_use]
    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn to_state(self) -> ViewportState {
        ViewportState::new(self.x_offset, self.y_offset, self.zoom)
    }

    /// The window the generator cuts from a `source_w × source_h` frame.
    ///
    /// The frame is first trimmed to 16:9 from its top-left corner, scaled to
    /// `image_width·zoom × image_height·zoom`, and a full miniature-sized
    /// window is taken at the offsets. The miniature pastes that window right
    /// of the overlay, so only its first `croppable_width` pixels stay visible.
    #[must_use]
    pub fn crop_window(&self, source_w: f64, source_h: f64, config: &CropConfig) -> CropWindow {
        let frame = sixteen_by_nine(source_w, source_h);
        let zoomed_w = (config.image_width * self.zoom).floor();
        let zoomed_h = (config.image_height * self.zoom).floor();
        let left = (self.x_offset * (zoomed_w + config.overlay_width - config.image_width)).floor();
        let top = (self.y_offset * (zoomed_h - config.image_height)).floor();
        CropWindow {
            frame,
            zoomed_w,
            zoomed_h,
            window: Rect::new(left, top, config.image_width, config.image_height),
            visible_w: config.croppable_width(),
        }
    }
}

impl TryFrom<ViewportState> for Rescale {
    type Error = RescaleError;

    fn try_from(state: ViewportState) -> Result<Self, Self::Error> {
        Self::new(state.x_offset, state.y_offset, state.zoom)
    }
}

fn check_offset(axis: char, value: f64) -> Result<(), RescaleError> {
    if (0.0..=1.0).contains(&value) { Ok(()) } else { Err(RescaleError::Offset { axis, value }) }
}

/// Largest 16:9 region anchored at the top-left of the source.
fn sixteen_by_nine(w: f64, h: f64) -> Rect {
    if h > 0.0 && w / h > ASPECT_W / ASPECT_H {
        Rect::new(0.0, 0.0, h * ASPECT_W / ASPECT_H, h)
    } else {
        Rect::new(0.0, 0.0, w, w * ASPECT_H / ASPECT_W)
    }
}

/// Result of [`Rescale::crop_window`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropWindow {
    /// 16:9 part of the source frame that is used, in source pixels.
    pub frame: Rect,
    /// Size of the frame after zoom scaling.
    pub zoomed_w: f64,
    pub zoomed_h: f64,
    /// Cut window in zoomed pixels; may extend past the zoomed frame on the right.
    pub window: Rect,
    /// Width of the window that remains visible beside the overlay.
    pub visible_w: f64,
}

impl CropWindow {
    /// Visible part of the window mapped back onto the source frame.
    #[must_use]
    pub fn visible_source_rect(&self) -> Rect {
        let sx = if self.zoomed_w > 0.0 { self.frame.w / self.zoomed_w } else { 0.0 };
        let sy = if self.zoomed_h > 0.0 { self.frame.h / self.zoomed_h } else { 0.0 };
        Rect::new(
            self.frame.x + self.window.x * sx,
            self.frame.y + self.window.y * sy,
            self.visible_w * sx,
            self.window.h * sy,
        )
    }
}

/// Body of the Resource API's `generate_miniature` action.
///
/// Team references and the time code are opaque to this crate and passed through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiniatureRequest {
    pub xoffset: f64,
    pub yoffset: f64,
    pub zoom: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team2: Option<String>,
    #[serde(rename = "timeCode", skip_serializing_if = "Option::is_none")]
    pub time_code: Option<f64>,
}

impl MiniatureRequest {
    #[must_use]
    pub fn new(rescale: Rescale) -> Self {
        Self {
            xoffset: rescale.x_offset,
            yoffset: rescale.y_offset,
            zoom: rescale.zoom,
            team1: None,
            team2: None,
            time_code: None,
        }
    }

    #[must_use]
    pub fn with_teams(mut self, team1: impl Into<String>, team2: impl Into<String>) -> Self {
        self.team1 = Some(team1.into());
        self.team2 = Some(team2.into());
        self
    }

    #[must_use]
    pub fn with_time_code(mut self, time_code: f64) -> Self {
        self.time_code = Some(time_code);
        self
    }

    /// # Errors
    ///
    /// Returns the serializer error.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
