#![forbid(unsafe_code)]

//! WASM frontend for LifeCanvas.
//!
//! Wraps a [`lifecanvas_core::Controller`] driving the reference
//! [`lifecanvas_engine::Universe`] behind a `wasm-bindgen` API:
//! - a 2D canvas context as the draw surface,
//! - `requestAnimationFrame` as the frame scheduler,
//! - optional DOM controls (play/pause, clear, randomize, step, strategy
//!   buttons, frame-rate readout) bound by id.

pub mod options;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::LifeCanvas;

pub use options::{ControlIds, WebOptions};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct LifeCanvas;

#[cfg(not(target_arch = "wasm32"))]
impl LifeCanvas {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
