//! Crop/viewport engine for authoring video miniatures.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It lets the
//! user pick the region of a base frame that ends up in a YouTube miniature,
//! by dragging a crop rectangle and zooming it with the wheel. The selection
//! is kept as three normalized scalars (horizontal offset, vertical offset,
//! zoom) so it survives any display resolution. The host layer wires DOM
//! events to the engine and forwards the resulting [`engine::Action`]s to its
//! form, which submits them to the miniature-generation endpoint.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`viewport`] | Normalized selection state and host inputs |
//! | [`geometry`] | Conversions between normalized state, canvas and client pixels |
//! | [`input`] | Input event types and the drag state machine |
//! | [`hit`] | Hit-testing the crop rectangle, handle positions |
//! | [`render`] | Drawing the base image and crop overlay; deferred first paint |
//! | [`rescale`] | Persisted crop parameters and the generation request |
//! | [`config`] | Zoom policy and media geometry |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric constants (media size, zoom limits, style) |

pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod render;
pub mod rescale;
pub mod viewport;
