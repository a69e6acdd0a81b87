#![forbid(unsafe_code)]

//! `lifecanvas-core` is the visualization-and-control layer for a
//! cellular-automaton canvas.
//!
//! Design goals:
//! - **Engine-agnostic**: the automaton lives behind [`SimulationEngine`];
//!   this crate only borrows its buffers for the duration of one call.
//! - **Host-driven**: drawing, frame scheduling, time, and visible controls
//!   are traits ([`Host`]) implemented by the browser frontend or by the
//!   deterministic [`headless`] host.
//! - **Single-threaded**: one [`Controller`] value, no locks, one outstanding
//!   frame request at a time.

pub mod animation;
pub mod color;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod headless;
pub mod host;
#[cfg(feature = "subscriber")]
pub mod logging;
pub mod raster;
pub mod renderer;
pub mod stats;
pub mod strategy;

pub use animation::{AnimationState, Animator};
pub use color::Rgba;
pub use config::LifeConfig;
pub use controller::Controller;
pub use engine::{Cell, GridSize, PixelFrame, RenderSettings, SimulationEngine};
pub use error::{LifeError, Result};
pub use geometry::{BoundingBox, CanvasLayout, CellIndex, PointerEvent, map_to_cell};
pub use host::{ControlPanel, DrawSurface, FrameHandle, FrameScheduler, Host, HostClock};
pub use renderer::{RenderPass, Renderer};
pub use stats::{FRAME_HISTORY_CAPACITY, FrameReport, FrameStats};
pub use strategy::{RenderStrategy, StrategySelector};
