#![forbid(unsafe_code)]

//! Host boundary: the primitives the embedding environment provides.
//!
//! The browser implements these with a 2D canvas context,
//! `requestAnimationFrame`, and DOM elements. [`crate::headless`] provides
//! deterministic implementations driven explicitly by tests and the native
//! harness.

use std::time::Duration;

use crate::color::Rgba;
use crate::error::LifeError;
use crate::stats::FrameReport;
use crate::strategy::RenderStrategy;

/// A 2D drawing surface supporting path strokes, rectangle fills, and raster
/// blits.
pub trait DrawSurface {
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Stroke the current path with the current stroke color.
    fn stroke(&mut self);
    fn set_stroke_color(&mut self, color: Rgba);
    fn set_fill_color(&mut self, color: Rgba);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Copy a row-major RGBA raster to the surface origin in one operation.
    fn put_pixels(&mut self, rgba: &[u8], width: u32, height: u32) -> Result<(), LifeError>;
}

/// Opaque handle of a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// A "call me on the next display refresh" primitive.
///
/// Exactly one callback is outstanding at a time; the caller enforces this.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, LifeError>;
    /// Cancel a pending request. Must take effect synchronously.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Monotonic host clock.
pub trait HostClock {
    fn now_mono(&self) -> Duration;
}

/// Visible controls next to the canvas.
pub trait ControlPanel {
    fn set_play_label(&mut self, label: &str);
    fn set_strategy_indicator(&mut self, strategy: RenderStrategy);
    fn show_frame_report(&mut self, report: &FrameReport);
}

/// The full host environment, bundling the individual primitives.
pub trait Host {
    type Surface: DrawSurface;
    type Scheduler: FrameScheduler;
    type Clock: HostClock;
    type Panel: ControlPanel;

    fn surface(&mut self) -> &mut Self::Surface;
    fn scheduler(&mut self) -> &mut Self::Scheduler;
    fn clock(&self) -> &Self::Clock;
    fn panel(&mut self) -> &mut Self::Panel;
}
