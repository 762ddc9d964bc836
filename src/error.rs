//! Error types for the crop engine.
//!
//! None of these ever reach the user: the engine's public operations log and
//! no-op on [`EngineError`], while [`ConfigError`] and [`RescaleError`] are
//! returned to the host when it supplies bad configuration or persisted values.

use wasm_bindgen::JsValue;

/// Failure while talking to the browser canvas.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The canvas has no 2D context (detached, or a different context type was taken).
    #[error("2D rendering context unavailable")]
    ContextUnavailable,
    /// A `Canvas2D` call returned a JS exception.
    #[error("canvas call failed: {0}")]
    Canvas(String),
}

impl From<JsValue> for EngineError {
    fn from(value: JsValue) -> Self {
        Self::Canvas(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

/// Rejected [`crate::config::CropConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid zoom range [{min}, {max}]")]
    ZoomRange { min: f64, max: f64 },
    #[error("zoom-in factor must be in (0, 1), got {0}")]
    ZoomInFactor(f64),
    #[error("zoom-out factor must be greater than 1, got {0}")]
    ZoomOutFactor(f64),
    #[error("invalid media geometry {width}x{height} with overlay {overlay}")]
    Geometry { width: f64, height: f64, overlay: f64 },
}

/// Rejected persisted crop parameters.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RescaleError {
    #[error("zoom must be >= 1, got {0}")]
    Zoom(f64),
    #[error("{axis} offset must be between 0 and 1, got {value}")]
    Offset { axis: char, value: f64 },
}
