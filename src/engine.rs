use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, HtmlImageElement, PointerEvent, WheelEvent};

use crate::config::CropConfig;
use crate::consts::{CURSOR_DEFAULT, CURSOR_GRABBING, CURSOR_MOVE};
use crate::error::{ConfigError, EngineError, RescaleError};
use crate::geometry::{self, CanvasBounds, Point, Rect};
use crate::hit::{self, HitPart};
use crate::input::{Button, InputState, WheelDelta, WheelDirection};
use crate::render::{self, DrawRequest, ImageState};
use crate::rescale::Rescale;
use crate::viewport::{CropInputs, ViewportState};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
///
/// The three scalar variants are how the selection leaves the engine: the
/// host forwards each to its form, which later submits them to the
/// miniature-generation endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    XOffsetChanged(f64),
    YOffsetChanged(f64),
    ZoomChanged(f64),
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: everything that does not touch the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
/// The viewport state is private: every write, from the user or from the
/// host, goes through the same clamp-and-normalize path.
#[derive(Debug)]
pub struct EngineCore {
    config: CropConfig,
    state: ViewportState,
    input: InputState,
    canvas_width: f64,
    canvas_height: f64,
    image: ImageState,
    draw: DrawRequest,
    cursor: &'static str,
    base_image_url: Option<String>,
    miniature_url: Option<String>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            config: CropConfig::default(),
            state: ViewportState::default(),
            input: InputState::default(),
            canvas_width: 0.0,
            canvas_height: 0.0,
            image: ImageState::default(),
            draw: DrawRequest::default(),
            cursor: CURSOR_DEFAULT,
            base_image_url: None,
            miniature_url: None,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a core with custom policy.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error.
    pub fn with_config(config: CropConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, ..Self::default() })
    }

    // --- Data inputs ---

    /// Apply values supplied by the hosting form.
    ///
    /// The base image URL is only recorded here; the browser wrapper starts
    /// the actual load.
    pub fn load_inputs(&mut self, inputs: &CropInputs) -> Vec<Action> {
        self.miniature_url.clone_from(&inputs.miniature_url);
        self.set_state(inputs.state())
    }

    /// Replace the selection from outside, clamping it into bounds.
    pub fn set_state(&mut self, state: ViewportState) -> Vec<Action> {
        let next = geometry::reclamp(self.canvas_width, self.canvas_height, state, &self.config);
        self.commit(next)
    }

    /// Replace only the zoom from outside, keeping the offsets.
    pub fn set_zoom(&mut self, zoom: f64) -> Vec<Action> {
        self.set_state(ViewportState { zoom, ..self.state })
    }

    /// Update the canvas backing-store size and re-validate the selection.
    #[allow(clippy::float_cmp)]
    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> Vec<Action> {
        let (width, height) = (sanitize_extent(width), sanitize_extent(height));
        if width == self.canvas_width && height == self.canvas_height {
            return Vec::new();
        }
        self.canvas_width = width;
        self.canvas_height = height;

        let next = geometry::reclamp(width, height, self.state, &self.config);
        let mut actions = self.commit_state(next);
        actions.extend(self.request_draw());
        actions
    }

    // --- Image lifecycle ---

    /// A new base image source was set; the first paint waits for it.
    pub fn begin_image_load(&mut self, url: &str) {
        self.base_image_url = Some(url.to_owned());
        self.image = ImageState::Loading;
        self.draw.request(self.image);
        tracing::debug!(url, "base image loading");
    }

    /// The base image finished decoding. The canvas takes its intrinsic size.
    ///
    /// An empty decode is ignored and the image stays in its current state.
    pub fn image_ready(&mut self, width: f64, height: f64) -> Vec<Action> {
        let (width, height) = (sanitize_extent(width), sanitize_extent(height));
        if width <= 0.0 || height <= 0.0 {
            tracing::warn!(url = ?self.base_image_url, "base image decoded with no pixels; ignored");
            return Vec::new();
        }
        self.image = ImageState::Ready { width, height };
        self.canvas_width = width;
        self.canvas_height = height;
        tracing::info!(width, height, "base image ready");

        let next = geometry::reclamp(width, height, self.state, &self.config);
        let mut actions = self.commit_state(next);
        let was_pending = self.draw.take_pending();
        if was_pending || !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// The base image failed to load. Interaction keeps working on canvas geometry alone.
    ///
    /// The URL is forgotten so supplying it again retries the load.
    pub fn image_failed(&mut self) {
        tracing::warn!(url = ?self.base_image_url, "base image failed to load");
        self.base_image_url = None;
        self.image = ImageState::Missing;
        self.draw.cancel();
    }

    /// Ask for a redraw. Deferred until the image is ready.
    pub fn request_draw(&mut self) -> Vec<Action> {
        if self.draw.request(self.image) {
            vec![Action::RenderNeeded]
        } else {
            if self.draw.is_pending() {
                tracing::debug!("draw deferred until base image is ready");
            }
            Vec::new()
        }
    }

    // --- Input events (canvas-space points) ---

    /// Start dragging if the pointer lands on the crop rectangle.
    pub fn on_pointer_down(&mut self, canvas_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || self.input.is_dragging() {
            return Vec::new();
        }
        let crop = self.crop_rect();
        if hit::hit_test(canvas_pt, crop) != HitPart::Crop {
            return Vec::new();
        }

        let grab_offset = canvas_pt - crop.top_left();
        self.input = InputState::Dragging { grab_offset };
        tracing::debug!(x = grab_offset.x, y = grab_offset.y, "crop drag started");
        self.set_cursor(CURSOR_GRABBING).into_iter().collect()
    }

    /// Move the rectangle while dragging; otherwise only update the hover cursor.
    pub fn on_pointer_move(&mut self, canvas_pt: Point) -> Vec<Action> {
        match self.input {
            InputState::Idle => {
                let cursor = self.hover_cursor(canvas_pt);
                self.set_cursor(cursor).into_iter().collect()
            }
            InputState::Dragging { grab_offset } => {
                let desired = canvas_pt - grab_offset;
                let next =
                    geometry::place_top_left(self.canvas_width, self.canvas_height, self.state, desired, &self.config);
                self.commit(next)
            }
        }
    }

    /// End the drag. Valid anywhere on the page, not just over the canvas.
    pub fn on_pointer_up(&mut self, canvas_pt: Point) -> Vec<Action> {
        if !self.input.is_dragging() {
            return Vec::new();
        }
        self.input = InputState::Idle;
        tracing::debug!(x_offset = self.state.x_offset, y_offset = self.state.y_offset, "crop drag ended");
        let cursor = self.hover_cursor(canvas_pt);
        self.set_cursor(cursor).into_iter().collect()
    }

    /// Zoom about the cursor, keeping the cursor's relative position inside
    /// the rectangle fixed.
    pub fn on_wheel(&mut self, canvas_pt: Point, delta: WheelDelta) -> Vec<Action> {
        let Some(direction) = delta.direction() else {
            return Vec::new();
        };
        let factor = match direction {
            WheelDirection::Up => self.config.zoom_in_factor,
            WheelDirection::Down => self.config.zoom_out_factor,
        };
        let zoom = self.config.clamp_zoom(self.state.zoom / factor);
        if (zoom - self.state.zoom).abs() < f64::EPSILON {
            return Vec::new();
        }

        let (ax, ay) = geometry::anchor_fraction(canvas_pt, self.crop_rect());
        let (new_w, new_h) = geometry::crop_size(zoom, &self.config);
        let next = geometry::place_top_left(
            self.canvas_width,
            self.canvas_height,
            ViewportState { zoom, ..self.state },
            Point::new(canvas_pt.x - ax * new_w, canvas_pt.y - ay * new_h),
            &self.config,
        );
        tracing::debug!(from = self.state.zoom, to = zoom, "crop zoom");
        let actions = self.commit(next);

        // Re-anchor an in-flight drag so the next move doesn't jump.
        if self.input.is_dragging() {
            self.input = InputState::Dragging { grab_offset: canvas_pt - self.crop_rect().top_left() };
        }
        actions
    }

    // --- Queries ---

    /// Snapshot of the current selection.
    #[must_use]
    pub fn state(&self) -> ViewportState {
        self.state
    }

    /// The selection as the Resource API persists it.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the state is outside the ranges the generator accepts.
    pub fn rescale(&self) -> Result<Rescale, RescaleError> {
        Rescale::try_from(self.state)
    }

    /// The crop rectangle in canvas pixels.
    #[must_use]
    pub fn crop_rect(&self) -> Rect {
        geometry::rectangle_for(self.canvas_width, self.canvas_height, self.state, &self.config)
    }

    #[must_use]
    pub fn input(&self) -> InputState {
        self.input
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.input.is_dragging()
    }

    #[must_use]
    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }

    #[must_use]
    pub fn image(&self) -> ImageState {
        self.image
    }

    #[must_use]
    pub fn draw_pending(&self) -> bool {
        self.draw.is_pending()
    }

    #[must_use]
    pub fn cursor(&self) -> &'static str {
        self.cursor
    }

    #[must_use]
    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    #[must_use]
    pub fn base_image_url(&self) -> Option<&str> {
        self.base_image_url.as_deref()
    }

    /// Last generated miniature, for display next to the editor.
    #[must_use]
    pub fn miniature_url(&self) -> Option<&str> {
        self.miniature_url.as_deref()
    }

    // --- Internals ---

    /// Store `next` and emit the scalars plus a redraw, if anything changed.
    fn commit(&mut self, next: ViewportState) -> Vec<Action> {
        let mut actions = self.commit_state(next);
        if !actions.is_empty() {
            actions.extend(self.request_draw());
        }
        actions
    }

    fn commit_state(&mut self, next: ViewportState) -> Vec<Action> {
        if next == self.state {
            return Vec::new();
        }
        self.state = next;
        vec![
            Action::XOffsetChanged(next.x_offset),
            Action::YOffsetChanged(next.y_offset),
            Action::ZoomChanged(next.zoom),
        ]
    }

    fn hover_cursor(&self, canvas_pt: Point) -> &'static str {
        match hit::hit_test(canvas_pt, self.crop_rect()) {
            HitPart::Crop => CURSOR_MOVE,
            HitPart::Outside => CURSOR_DEFAULT,
        }
    }

    fn set_cursor(&mut self, cursor: &'static str) -> Option<Action> {
        if self.cursor == cursor {
            return None;
        }
        self.cursor = cursor;
        Some(Action::SetCursor(cursor.to_owned()))
    }
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Pointer capture held for the lifetime of a drag.
///
/// While captured, the browser routes every pointer event for this pointer to
/// the canvas, so pointer-up is seen even when released outside it. Dropping
/// the guard releases the capture.
struct PointerCapture {
    element: Element,
    pointer_id: i32,
}

impl PointerCapture {
    fn acquire(element: &Element, pointer_id: i32) -> Result<Self, EngineError> {
        element.set_pointer_capture(pointer_id)?;
        Ok(Self { element: element.clone(), pointer_id })
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        if !self.element.has_pointer_capture(self.pointer_id) {
            return;
        }
        if let Err(e) = self.element.release_pointer_capture(self.pointer_id) {
            tracing::debug!(error = ?e, "pointer capture already released");
        }
    }
}

/// The full crop engine. Wraps `EngineCore` and owns the browser canvas and base image.
pub struct Engine {
    canvas: HtmlCanvasElement,
    image: Option<HtmlImageElement>,
    capture: Option<PointerCapture>,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let mut core = EngineCore::new();
        core.set_canvas_size(f64::from(canvas.width()), f64::from(canvas.height()));
        Self { canvas, image: None, capture: None, core }
    }

    /// Create an engine with custom policy.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error.
    pub fn with_config(canvas: HtmlCanvasElement, config: CropConfig) -> Result<Self, ConfigError> {
        let mut core = EngineCore::with_config(config)?;
        core.set_canvas_size(f64::from(canvas.width()), f64::from(canvas.height()));
        Ok(Self { canvas, image: None, capture: None, core })
    }

    // --- Data inputs ---

    /// Apply the hosting form's values, starting a base image load if its URL changed.
    pub fn load_inputs(&mut self, inputs: &CropInputs) -> Vec<Action> {
        let mut actions = self.core.load_inputs(inputs);
        if let Some(url) = inputs.base_image_url.as_deref() {
            if self.core.base_image_url() != Some(url) {
                match self.load_image(url) {
                    Ok(loaded) => actions.extend(loaded),
                    Err(e) => tracing::warn!(error = %e, url, "could not create base image element"),
                }
            }
        }
        self.flush(&mut actions);
        actions
    }

    pub fn set_state(&mut self, state: ViewportState) -> Vec<Action> {
        let mut actions = self.core.set_state(state);
        self.flush(&mut actions);
        actions
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Vec<Action> {
        let mut actions = self.core.set_zoom(zoom);
        self.flush(&mut actions);
        actions
    }

    /// Start loading the base image.
    ///
    /// The host hooks the `load` and `error` events of [`Engine::image`] to
    /// [`Engine::on_image_loaded`] and [`Engine::on_image_error`]. An image
    /// already in the browser cache is handled immediately.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the image element cannot be created.
    pub fn load_image(&mut self, url: &str) -> Result<Vec<Action>, EngineError> {
        let image = HtmlImageElement::new()?;
        image.set_src(url);
        self.core.begin_image_load(url);
        let cached = render::is_decoded(&image);
        self.image = Some(image);

        if cached { Ok(self.on_image_loaded()) } else { Ok(Vec::new()) }
    }

    /// The element being drawn as the base image, once a load has started.
    #[must_use]
    pub fn image(&self) -> Option<&HtmlImageElement> {
        self.image.as_ref()
    }

    /// The base image finished decoding: size the canvas to it and paint.
    pub fn on_image_loaded(&mut self) -> Vec<Action> {
        let Some(image) = self.image.as_ref() else {
            return Vec::new();
        };
        // A load event from a replaced element arrives before the current one decodes.
        if !render::is_decoded(image) {
            return Vec::new();
        }
        let (width, height) = render::fit_canvas_to_image(&self.canvas, image);
        let mut actions = self.core.image_ready(width, height);
        self.flush(&mut actions);
        actions
    }

    pub fn on_image_error(&mut self) {
        self.image = None;
        self.core.image_failed();
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> Vec<Action> {
        let pt = self.canvas_point(event.client_x(), event.client_y());
        let mut actions = self.core.on_pointer_down(pt, Button::from_dom(event.button()));
        if self.core.is_dragging() && self.capture.is_none() {
            match PointerCapture::acquire(&self.canvas, event.pointer_id()) {
                Ok(capture) => self.capture = Some(capture),
                Err(e) => tracing::warn!(error = %e, "pointer capture failed; drag ends at canvas edge"),
            }
        }
        self.flush(&mut actions);
        actions
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> Vec<Action> {
        let pt = self.canvas_point(event.client_x(), event.client_y());
        let mut actions = self.core.on_pointer_move(pt);
        self.flush(&mut actions);
        actions
    }

    /// Also wire `pointercancel` and `lostpointercapture` here.
    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> Vec<Action> {
        let pt = self.canvas_point(event.client_x(), event.client_y());
        let mut actions = self.core.on_pointer_up(pt);
        self.capture = None;
        self.flush(&mut actions);
        actions
    }

    /// Zoom about the cursor. Prevents page scrolling while over the canvas.
    pub fn on_wheel(&mut self, event: &WheelEvent) -> Vec<Action> {
        event.prevent_default();
        let pt = self.canvas_point(event.client_x(), event.client_y());
        let delta = WheelDelta { dx: event.delta_x(), dy: event.delta_y() };
        let mut actions = self.core.on_wheel(pt, delta);
        self.flush(&mut actions);
        actions
    }

    // --- Render ---

    /// Draw the current state to the canvas. A missing 2D context is logged and ignored.
    pub fn render(&self) {
        if let Err(e) = self.try_render() {
            tracing::warn!(error = %e, "crop render skipped");
        }
    }

    fn try_render(&self) -> Result<(), EngineError> {
        let ctx = self.context()?;
        let image = self.image.as_ref().filter(|_| self.core.image().is_ready());
        let (w, h) = self.core.canvas_size();
        render::draw(&ctx, image, w, h, self.core.crop_rect(), self.core.config())
    }

    fn context(&self) -> Result<CanvasRenderingContext2d, EngineError> {
        self.canvas
            .get_context("2d")?
            .ok_or(EngineError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::ContextUnavailable)
    }

    /// Paint now if any action asked for it. Render requests are consumed here.
    fn flush(&self, actions: &mut Vec<Action>) {
        let before = actions.len();
        actions.retain(|a| *a != Action::RenderNeeded);
        if actions.len() != before {
            self.render();
        }
    }

    fn canvas_point(&self, client_x: i32, client_y: i32) -> Point {
        let r = self.canvas.get_bounding_client_rect();
        let bounds = CanvasBounds { left: r.left(), top: r.top(), width: r.width(), height: r.height() };
        let (w, h) = self.core.canvas_size();
        geometry::pointer_to_canvas_space(Point::new(f64::from(client_x), f64::from(client_y)), bounds, w, h)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn state(&self) -> ViewportState {
        self.core.state()
    }

    #[must_use]
    pub fn crop_rect(&self) -> Rect {
        self.core.crop_rect()
    }

    #[must_use]
    pub fn miniature_url(&self) -> Option<&str> {
        self.core.miniature_url()
    }
}
