//! Shared numeric constants for the crop engine.

// ── Media geometry ──────────────────────────────────────────────

/// Logical width of a miniature and of the base frame, in pixels.
pub const IMAGE_WIDTH: f64 = 1920.0;

/// Logical height of a miniature and of the base frame, in pixels.
pub const IMAGE_HEIGHT: f64 = 1080.0;

/// Width of the team overlay panel on the left of the miniature.
///
/// This strip is covered by the overlay, so it is excluded from the
/// croppable horizontal extent.
pub const OVERLAY_WIDTH: f64 = 600.0;

// ── Zoom policy ─────────────────────────────────────────────────

/// Smallest zoom: the crop rectangle spans the full croppable area.
pub const MIN_ZOOM: f64 = 1.0;

/// Largest zoom.
pub const MAX_ZOOM: f64 = 5.0;

/// Rectangle scale applied per wheel tick when scrolling up (zoom in).
pub const ZOOM_IN_FACTOR: f64 = 0.9;

/// Rectangle scale applied per wheel tick when scrolling down (zoom out).
pub const ZOOM_OUT_FACTOR: f64 = 1.1;

// ── Overlay style ───────────────────────────────────────────────

/// Side of a corner handle square, in canvas pixels.
pub const HANDLE_SIZE_PX: f64 = 12.0;

/// Crop outline stroke width, in canvas pixels.
pub const STROKE_WIDTH_PX: f64 = 4.0;

/// Crop outline color.
pub const STROKE_COLOR: &str = "#FF3B30";

/// Corner handle fill color.
pub const HANDLE_COLOR: &str = "#FFFFFF";

// ── Cursors ─────────────────────────────────────────────────────

/// CSS cursor outside the crop rectangle.
pub const CURSOR_DEFAULT: &str = "default";

/// CSS cursor while hovering the crop rectangle.
pub const CURSOR_MOVE: &str = "move";

/// CSS cursor while dragging the crop rectangle.
pub const CURSOR_GRABBING: &str = "grabbing";
