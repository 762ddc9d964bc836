//! Rendering: paints the base image and the crop overlay to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of the crop geometry and config and produces
//! pixels; it does not mutate any engine state.
//!
//! Image decoding is asynchronous in the browser, so drawing is split into two
//! phases tracked by [`DrawRequest`]: a request made while the image is still
//! loading only raises a pending flag, and the image-ready callback consumes it.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::config::CropConfig;
use crate::error::EngineError;
use crate::geometry::Rect;
use crate::hit::{self, Corner};

/// Lifecycle of the base image, as far as geometry and drawing care.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ImageState {
    /// No base image has been supplied.
    #[default]
    Missing,
    /// A source was set but the browser has not finished decoding it.
    Loading,
    /// Decoded; intrinsic size in pixels.
    Ready { width: f64, height: f64 },
}

impl ImageState {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Pending-draw flag for the deferred first paint.
///
/// Redundant requests coalesce: the draw always recomputes from current
/// state, so one pending draw is enough.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawRequest {
    pending: bool,
}

impl DrawRequest {
    /// Ask for a draw. Returns `true` when it can happen now.
    pub fn request(&mut self, image: ImageState) -> bool {
        match image {
            ImageState::Ready { .. } => {
                self.pending = false;
                true
            }
            ImageState::Loading => {
                self.pending = true;
                false
            }
            ImageState::Missing => false,
        }
    }

    /// Called once the image is decoded. Returns `true` if a draw was waiting.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Forget any waiting draw (the image failed or was replaced).
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Whether the element holds decoded pixels.
#[must_use]
pub fn is_decoded(image: &HtmlImageElement) -> bool {
    image.complete() && image.natural_width() > 0 && image.natural_height() > 0
}

/// Resize the backing store to the image's intrinsic size so one canvas pixel
/// is one source pixel. Returns the new size.
pub fn fit_canvas_to_image(canvas: &HtmlCanvasElement, image: &HtmlImageElement) -> (f64, f64) {
    let (w, h) = (image.natural_width(), image.natural_height());
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
    (f64::from(w), f64::from(h))
}

/// Draw the full frame: base image, then crop outline and corner handles.
///
/// With no image the canvas is left blank.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    image: Option<&HtmlImageElement>,
    canvas_w: f64,
    canvas_h: f64,
    crop: Rect,
    config: &CropConfig,
) -> Result<(), EngineError> {
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, canvas_w, canvas_h);

    let Some(image) = image else {
        return Ok(());
    };
    ctx.draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, canvas_w, canvas_h)?;

    draw_crop_overlay(ctx, crop, config);
    Ok(())
}

fn draw_crop_overlay(ctx: &CanvasRenderingContext2d, crop: Rect, config: &CropConfig) {
    ctx.save();

    ctx.set_stroke_style_str(&config.stroke_color);
    ctx.set_line_width(config.stroke_width);
    ctx.stroke_rect(crop.x, crop.y, crop.w, crop.h);

    ctx.set_fill_style_str(&config.handle_color);
    for handle in handle_rects(crop, config.handle_size) {
        ctx.fill_rect(handle.x, handle.y, handle.w, handle.h);
    }

    ctx.restore();
}

/// The four corner handle squares, NW first, clockwise.
#[must_use]
pub fn handle_rects(crop: Rect, size: f64) -> [Rect; 4] {
    Corner::ALL.map(|corner| hit::handle_rect(crop, corner, size))
}
