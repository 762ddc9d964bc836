//! Crop policy and media geometry, optionally supplied by the host as JSON.

use serde::Deserialize;

use crate::consts::{
    HANDLE_COLOR, HANDLE_SIZE_PX, IMAGE_HEIGHT, IMAGE_WIDTH, MAX_ZOOM, MIN_ZOOM, OVERLAY_WIDTH, STROKE_COLOR,
    STROKE_WIDTH_PX, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};
use crate::error::ConfigError;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Tunable parameters of the crop engine.
///
/// The zoom range and wheel factors are product policy rather than geometric
/// invariants, so they live here instead of being hard-coded in the controller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropConfig {
    /// Logical width of the source media.
    pub image_width: f64,
    /// Logical height of the source media.
    pub image_height: f64,
    /// Width excluded from the croppable horizontal extent.
    pub overlay_width: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Rectangle scale per wheel tick up; `new_zoom = zoom / zoom_in_factor`.
    pub zoom_in_factor: f64,
    /// Rectangle scale per wheel tick down; `new_zoom = zoom / zoom_out_factor`.
    pub zoom_out_factor: f64,
    pub handle_size: f64,
    pub stroke_width: f64,
    pub stroke_color: String,
    pub handle_color: String,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            image_width: IMAGE_WIDTH,
            image_height: IMAGE_HEIGHT,
            overlay_width: OVERLAY_WIDTH,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_in_factor: ZOOM_IN_FACTOR,
            zoom_out_factor: ZOOM_OUT_FACTOR,
            handle_size: HANDLE_SIZE_PX,
            stroke_width: STROKE_WIDTH_PX,
            stroke_color: STROKE_COLOR.to_owned(),
            handle_color: HANDLE_COLOR.to_owned(),
        }
    }
}

impl CropConfig {
    /// Parse a config from JSON. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON, or any error from
    /// [`CropConfig::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the policy values describe a usable crop engine.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_zoom, self.max_zoom);
        if !(min.is_finite() && max.is_finite() && min >= 1.0 && min <= max) {
            return Err(ConfigError::ZoomRange { min, max });
        }
        if !(self.zoom_in_factor > 0.0 && self.zoom_in_factor < 1.0) {
            return Err(ConfigError::ZoomInFactor(self.zoom_in_factor));
        }
        if !(self.zoom_out_factor > 1.0 && self.zoom_out_factor.is_finite()) {
            return Err(ConfigError::ZoomOutFactor(self.zoom_out_factor));
        }
        let geometry_ok = self.image_width > 0.0
            && self.image_height > 0.0
            && self.overlay_width >= 0.0
            && self.overlay_width < self.image_width
            && self.image_width.is_finite()
            && self.image_height.is_finite();
        if !geometry_ok {
            return Err(ConfigError::Geometry {
                width: self.image_width,
                height: self.image_height,
                overlay: self.overlay_width,
            });
        }
        Ok(())
    }

    /// Width of the region the crop rectangle may cover at zoom 1.
    #[must_use]
    pub fn croppable_width(&self) -> f64 {
        self.image_width - self.overlay_width
    }

    /// Clamp a zoom into the configured range. `NaN` falls back to the minimum.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.min_zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
