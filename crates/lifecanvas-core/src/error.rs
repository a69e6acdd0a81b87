#![forbid(unsafe_code)]

//! Error type shared by the control layer, the reference engine, and hosts.

use std::fmt;

/// Errors raised at the edges of the control layer.
///
/// The frame cycle itself has no recoverable failures. These variants cover
/// configuration, engine construction, and host primitives that can refuse
/// a request (e.g. `requestAnimationFrame` or `putImageData` throwing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifeError {
    /// A color string was not `#rrggbb` or `#rrggbbaa`.
    InvalidColor { input: String, reason: &'static str },
    /// Cell size must be a positive number of pixels.
    InvalidCellSize(u32),
    /// Grid dimensions must both be positive.
    InvalidDimensions { width: u32, height: u32 },
    /// The grid scaled by the cell size does not fit a canvas.
    CanvasTooLarge { width: u32, height: u32, cell_size: u32 },
    /// Configuration document could not be parsed.
    Config(String),
    /// A host primitive (scheduler, surface, DOM lookup) failed.
    Host(String),
    /// A log subscriber could not be installed.
    Logging(String),
}

impl fmt::Display for LifeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColor { input, reason } => {
                write!(f, "invalid color {input:?}: {reason}")
            }
            Self::InvalidCellSize(size) => write!(f, "invalid cell size {size}: must be positive"),
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {width}x{height}: both must be positive")
            }
            Self::CanvasTooLarge {
                width,
                height,
                cell_size,
            } => write!(
                f,
                "canvas for a {width}x{height} grid at {cell_size}px per cell is too large"
            ),
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::Host(msg) => write!(f, "host error: {msg}"),
            Self::Logging(msg) => write!(f, "logging error: {msg}"),
        }
    }
}

impl std::error::Error for LifeError {}

impl From<serde_json::Error> for LifeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Convenience alias used across the workspace.
pub type Result<T, E = LifeError> = std::result::Result<T, E>;
