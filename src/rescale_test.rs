#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::geometry;

const EPSILON: f64 = 1e-9;

fn approx_rect(a: Rect, b: Rect) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON && (a.w - b.w).abs() < EPSILON && (a.h - b.h).abs() < EPSILON
}

fn rescale(x: f64, y: f64, zoom: f64) -> Rescale {
    Rescale::new(x, y, zoom).unwrap_or_default()
}

// =============================================================
// Validation
// =============================================================

#[test]
fn accepts_valid_parameters() {
    let r = Rescale::new(0.25, 1.0, 3.5);
    assert!(matches!(r, Ok(r) if r.x_offset() == 0.25 && r.y_offset() == 1.0 && r.zoom() == 3.5));
}

#[test]
fn rejects_zoom_below_one() {
    assert_eq!(Rescale::new(0.0, 0.0, 0.99), Err(RescaleError::Zoom(0.99)));
}

#[test]
fn rejects_nan_zoom() {
    assert!(matches!(Rescale::new(0.0, 0.0, f64::NAN), Err(RescaleError::Zoom(_))));
}

#[test]
fn rejects_offsets_outside_unit_range() {
    assert_eq!(Rescale::new(-0.1, 0.0, 1.0), Err(RescaleError::Offset { axis: 'x', value: -0.1 }));
    assert_eq!(Rescale::new(0.0, 1.01, 1.0), Err(RescaleError::Offset { axis: 'y', value: 1.01 }));
}

#[test]
fn rejects_nan_offset() {
    assert!(matches!(Rescale::new(f64::NAN, 0.0, 1.0), Err(RescaleError::Offset { axis: 'x', .. })));
}

#[test]
fn converts_from_viewport_state() {
    let state = ViewportState::new(0.1, 0.2, 1.5);
    assert_eq!(Rescale::try_from(state).map(Rescale::to_state), Ok(state));
}

#[test]
fn error_messages_name_the_field() {
    assert_eq!(RescaleError::Zoom(0.5).to_string(), "zoom must be >= 1, got 0.5");
    assert_eq!(
        RescaleError::Offset { axis: 'y', value: 2.0 }.to_string(),
        "y offset must be between 0 and 1, got 2"
    );
}

// =============================================================
// Crop window
// =============================================================

#[test]
fn default_window_is_left_part_of_frame() {
    let w = Rescale::default().crop_window(1920.0, 1080.0, &CropConfig::default());
    assert_eq!(w.frame, Rect::new(0.0, 0.0, 1920.0, 1080.0));
    assert_eq!((w.zoomed_w, w.zoomed_h), (1920.0, 1080.0));
    assert_eq!(w.window, Rect::new(0.0, 0.0, 1920.0, 1080.0));
    assert_eq!(w.visible_source_rect(), Rect::new(0.0, 0.0, 1320.0, 1080.0));
}

#[test]
fn zoomed_window_offsets_are_floored() {
    let w = rescale(0.333, 0.0, 1.0).crop_window(1920.0, 1080.0, &CropConfig::default());
    assert_eq!(w.window.x, 199.0);
}

#[test]
fn window_matches_editor_rectangle() {
    let config = CropConfig::default();
    for (x, y, zoom) in [(0.5, 0.5, 2.0), (0.0, 1.0, 4.0), (1.0, 0.0, 2.0), (0.25, 0.75, 5.0)] {
        let w = rescale(x, y, zoom).crop_window(1920.0, 1080.0, &config);
        let editor = geometry::rectangle_for(1920.0, 1080.0, ViewportState::new(x, y, zoom), &config);
        assert!(
            approx_rect(w.visible_source_rect(), editor),
            "({x}, {y}, {zoom}): server {:?} vs editor {editor:?}",
            w.visible_source_rect()
        );
    }
}

#[test]
fn ultrawide_source_is_trimmed_to_16_9() {
    let w = Rescale::default().crop_window(2560.0, 1080.0, &CropConfig::default());
    assert_eq!(w.frame, Rect::new(0.0, 0.0, 1920.0, 1080.0));
}

#[test]
fn tall_source_is_trimmed_to_16_9() {
    let w = Rescale::default().crop_window(1920.0, 1440.0, &CropConfig::default());
    assert_eq!(w.frame, Rect::new(0.0, 0.0, 1920.0, 1080.0));
}

#[test]
fn high_resolution_source_scales_visible_rect() {
    let w = rescale(0.5, 0.5, 2.0).crop_window(3840.0, 2160.0, &CropConfig::default());
    assert!(approx_rect(w.visible_source_rect(), Rect::new(1260.0, 540.0, 1320.0, 1080.0)));
}

// =============================================================
// Request payload
// =============================================================

#[test]
fn request_carries_teams_and_time_code() {
    let req = MiniatureRequest::new(rescale(0.5, 0.25, 2.0))
        .with_teams("/api/teams/3/", "/api/teams/8/")
        .with_time_code(0.4);
    let json: serde_json::Value = req
        .to_json()
        .and_then(|s| serde_json::from_str(&s))
        .unwrap_or_default();
    assert_eq!(
        json,
        json!({
            "xoffset": 0.5,
            "yoffset": 0.25,
            "zoom": 2.0,
            "team1": "/api/teams/3/",
            "team2": "/api/teams/8/",
            "timeCode": 0.4,
        })
    );
}

#[test]
fn request_omits_unset_fields() {
    let json = serde_json::to_value(MiniatureRequest::new(Rescale::default())).unwrap_or_default();
    assert_eq!(json, json!({ "xoffset": 0.0, "yoffset": 0.0, "zoom": 1.0 }));
}
