#![forbid(unsafe_code)]

//! Reference Game-of-Life engine for `lifecanvas-core`.
//!
//! [`Universe`] implements [`lifecanvas_core::SimulationEngine`] with the
//! standard B3/S23 rule on a torus, plus the delegated draw routines and the
//! engine-owned pixel raster the renderer's delegated strategies call into.

pub mod config;
pub mod render;
pub mod universe;

pub use config::UniverseConfig;
pub use render::PixelRaster;
pub use universe::Universe;
