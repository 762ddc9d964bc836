#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geometry::{self, Point, Rect};

/// Which part of the canvas is under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// Inside the crop rectangle (edges included); a drag may start here.
    Crop,
    /// Anywhere else on the canvas.
    Outside,
}

/// Corner of the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Nw,
    Ne,
    Se,
    Sw,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Nw, Corner::Ne, Corner::Se, Corner::Sw];
}

/// Classify `canvas_pt` against the current crop rectangle.
///
/// Handles are decoration only; they do not widen the hit area.
#[must_use]
pub fn hit_test(canvas_pt: Point, crop: Rect) -> HitPart {
    if geometry::contains(canvas_pt, crop) { HitPart::Crop } else { HitPart::Outside }
}

/// Canvas-space position of a corner of `crop`.
#[must_use]
pub fn corner_position(crop: Rect, corner: Corner) -> Point {
    match corner {
        Corner::Nw => Point::new(crop.x, crop.y),
        Corner::Ne => Point::new(crop.right(), crop.y),
        Corner::Se => Point::new(crop.right(), crop.bottom()),
        Corner::Sw => Point::new(crop.x, crop.bottom()),
    }
}

/// Square handle of side `size` centered on `corner`.
#[must_use]
pub fn handle_rect(crop: Rect, corner: Corner, size: f64) -> Rect {
    let c = corner_position(crop, corner);
    Rect::new(c.x - size / 2.0, c.y - size / 2.0, size, size)
}
