//! Coordinate mapping between the normalized viewport state and canvas pixels.
//!
//! Three spaces are involved:
//!
//! - **client space**: CSS pixels as reported by DOM pointer events;
//! - **canvas space**: backing-store pixels, one per source-image pixel;
//! - **normalized space**: [`ViewportState`] offsets in `[0, 1]`.
//!
//! Every function here is pure. Degenerate inputs (zero-sized canvas, no room
//! to move) map to a neutral offset of 0 instead of producing `NaN`.

use std::ops::Sub;

use crate::config::CropConfig;
use crate::viewport::ViewportState;

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

/// A point in client or canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Axis-aligned rectangle in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

/// On-screen placement of the canvas element (its bounding client rect).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Size of the crop rectangle at `zoom`, in canvas pixels.
#[must_use]
pub fn crop_size(zoom: f64, config: &CropConfig) -> (f64, f64) {
    (config.croppable_width() / zoom, config.image_height / zoom)
}

/// Pixel rectangle for a viewport state on a canvas of the given size.
#[must_use]
pub fn rectangle_for(canvas_w: f64, canvas_h: f64, state: ViewportState, config: &CropConfig) -> Rect {
    let (w, h) = crop_size(state.zoom, config);
    Rect {
        x: state.x_offset * room(canvas_w, w),
        y: state.y_offset * room(canvas_h, h),
        w,
        h,
    }
}

/// Normalized offsets for a rectangle whose top-left would sit at `(pixel_x, pixel_y)`.
///
/// The pixel position is clamped into the canvas before normalizing, so the
/// resulting rectangle always lies within the canvas when it fits at all.
#[must_use]
pub fn state_from_top_left(
    canvas_w: f64,
    canvas_h: f64,
    zoom: f64,
    pixel_x: f64,
    pixel_y: f64,
    config: &CropConfig,
) -> (f64, f64) {
    let (w, h) = crop_size(zoom, config);
    (normalize(pixel_x, room(canvas_w, w)), normalize(pixel_y, room(canvas_h, h)))
}

/// Bring an externally supplied state back into bounds.
///
/// Zoom is clamped to the configured range and the resulting rectangle is
/// re-normalized through [`state_from_top_left`]. On an axis with no room to
/// move (canvas not sized yet, or rectangle as large as the canvas) the
/// existing offset is kept rather than reset, since the rectangle's pixel
/// position on that axis is 0 either way.
#[must_use]
pub fn reclamp(canvas_w: f64, canvas_h: f64, state: ViewportState, config: &CropConfig) -> ViewportState {
    let state = ViewportState { zoom: config.clamp_zoom(state.zoom), ..state }.with_unit_offsets();
    let rect = rectangle_for(canvas_w, canvas_h, state, config);
    place_top_left(canvas_w, canvas_h, state, rect.top_left(), config)
}

/// Move the rectangle of `state` so its top-left sits at `top_left`.
///
/// Axes with room are normalized as in [`state_from_top_left`]. An axis with
/// no room keeps the offset from `state`: the pixel position there is 0
/// whatever the offset, and overwriting it would lose a saved selection
/// before the canvas has its real size.
#[must_use]
pub fn place_top_left(
    canvas_w: f64,
    canvas_h: f64,
    state: ViewportState,
    top_left: Point,
    config: &CropConfig,
) -> ViewportState {
    let (w, h) = crop_size(state.zoom, config);
    let (room_x, room_y) = (room(canvas_w, w), room(canvas_h, h));
    ViewportState {
        x_offset: if room_x > 0.0 { normalize(top_left.x, room_x) } else { state.x_offset },
        y_offset: if room_y > 0.0 { normalize(top_left.y, room_y) } else { state.y_offset },
        zoom: state.zoom,
    }
}

/// Map a pointer position from client space into canvas space.
///
/// Corrects for the canvas being displayed at a CSS size different from its
/// backing-store size.
#[must_use]
pub fn pointer_to_canvas_space(client: Point, bounds: CanvasBounds, canvas_w: f64, canvas_h: f64) -> Point {
    Point {
        x: (client.x - bounds.left) * scale_ratio(canvas_w, bounds.width),
        y: (client.y - bounds.top) * scale_ratio(canvas_h, bounds.height),
    }
}

/// Inclusive containment test.
#[must_use]
pub fn contains(point: Point, rect: Rect) -> bool {
    point.x >= rect.x && point.x <= rect.right() && point.y >= rect.y && point.y <= rect.bottom()
}

/// Relative position of `point` inside `rect`; 0.5 on an empty axis.
#[must_use]
pub fn anchor_fraction(point: Point, rect: Rect) -> (f64, f64) {
    let ax = if rect.w <= 0.0 { 0.5 } else { (point.x - rect.x) / rect.w };
    let ay = if rect.h <= 0.0 { 0.5 } else { (point.y - rect.y) / rect.h };
    (ax, ay)
}

/// Free travel along one axis; zero when the rectangle does not fit.
fn room(extent: f64, size: f64) -> f64 {
    let free = extent - size;
    if free > 0.0 { free } else { 0.0 }
}

fn normalize(pixel: f64, room: f64) -> f64 {
    if room <= 0.0 || pixel.is_nan() {
        return 0.0;
    }
    (pixel.clamp(0.0, room) / room).clamp(0.0, 1.0)
}

fn scale_ratio(intrinsic: f64, displayed: f64) -> f64 {
    if displayed > 0.0 && intrinsic > 0.0 { intrinsic / displayed } else { 1.0 }
}
