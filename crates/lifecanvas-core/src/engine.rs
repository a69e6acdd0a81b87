#![forbid(unsafe_code)]

//! The simulation engine contract consumed by the control layer.
//!
//! The control layer never implements automaton rules. It only calls the
//! operations below and borrows the engine's buffers for the duration of a
//! single call. Every accessor that exposes engine memory returns a borrow
//! tied to `&self`/`&mut self`, so a view cannot outlive the next mutating
//! call (tick, reset, flip).

use crate::color::Rgba;
use crate::config::LifeConfig;
use crate::error::LifeError;
use crate::host::DrawSurface;

/// State of a single cell.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dead => Self::Alive,
            Self::Alive => Self::Dead,
        }
    }
}

/// Immutable grid dimensions, queried once from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    /// Create a grid size, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, LifeError> {
        if width == 0 || height == 0 {
            return Err(LifeError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of cells (`width * height`).
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major linear index of `(row, col)`.
    #[inline]
    #[must_use]
    pub const fn index(self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    #[must_use]
    pub const fn contains(self, row: u32, col: u32) -> bool {
        row < self.height && col < self.width
    }
}

/// Render-settings value handed to delegated draw routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Edge length of one cell in canvas pixels (positive).
    pub cell_size: u32,
    pub live_color: Rgba,
    pub dead_color: Rgba,
    pub grid_color: Rgba,
}

impl RenderSettings {
    pub fn new(
        cell_size: u32,
        live_color: Rgba,
        dead_color: Rgba,
        grid_color: Rgba,
    ) -> Result<Self, LifeError> {
        if cell_size == 0 {
            return Err(LifeError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            live_color,
            dead_color,
            grid_color,
        })
    }

    /// Canvas size in pixels needed to show `grid` 1:1.
    ///
    /// Saturates on overflow; geometry that went through
    /// [`RenderSettings::checked_canvas_size`] never does.
    #[must_use]
    pub const fn canvas_size(&self, grid: GridSize) -> (u32, u32) {
        (
            grid.width.saturating_mul(self.cell_size),
            grid.height.saturating_mul(self.cell_size),
        )
    }

    /// Canvas size for `grid`, rejecting geometry whose pixel dimensions or
    /// RGBA byte length overflow.
    pub fn checked_canvas_size(&self, grid: GridSize) -> Result<(u32, u32), LifeError> {
        let too_large = || LifeError::CanvasTooLarge {
            width: grid.width,
            height: grid.height,
            cell_size: self.cell_size,
        };
        let width = grid.width.checked_mul(self.cell_size).ok_or_else(too_large)?;
        let height = grid.height.checked_mul(self.cell_size).ok_or_else(too_large)?;
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(too_large)?;
        Ok((width, height))
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            cell_size: 5,
            live_color: Rgba::BLACK,
            dead_color: Rgba::WHITE,
            grid_color: Rgba::opaque(0xCC, 0xCC, 0xCC),
        }
    }
}

impl TryFrom<&LifeConfig> for RenderSettings {
    type Error = LifeError;

    fn try_from(config: &LifeConfig) -> Result<Self, Self::Error> {
        Self::new(
            config.cell_size,
            Rgba::parse(&config.live_color)?,
            Rgba::parse(&config.dead_color)?,
            Rgba::parse(&config.grid_color)?,
        )
    }
}

/// A borrowed, fully rendered RGBA raster owned by the engine.
///
/// Valid only until the engine is next touched.
#[derive(Debug, Clone, Copy)]
pub struct PixelFrame<'a> {
    /// Row-major RGBA bytes, `width * height * 4` long.
    pub bytes: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl PixelFrame<'_> {
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.bytes.len() == self.width as usize * self.height as usize * 4
    }
}

/// The simulation engine interface.
pub trait SimulationEngine {
    /// Grid width; fixed for the lifetime of the instance.
    fn width(&self) -> u32;

    /// Grid height; fixed for the lifetime of the instance.
    fn height(&self) -> u32;

    /// Advance exactly one generation.
    fn tick(&mut self);

    /// Borrowed view over `width * height` cells, row-major.
    ///
    /// Callers must re-request the view on every use.
    fn cells(&self) -> &[Cell];

    /// Toggle one cell. The caller guarantees `row < height && col < width`.
    fn flip_cell(&mut self, row: u32, col: u32);

    /// Set every cell to [`Cell::Dead`].
    fn reset_to_dead(&mut self);

    /// Replace the grid with an engine-chosen random pattern.
    fn reset_to_random(&mut self);

    /// Paint every cell onto `surface` using the engine's own routine.
    fn draw_cells<S: DrawSurface + ?Sized>(&self, surface: &mut S, settings: &RenderSettings);

    /// Stroke the grid separators onto `surface` using the engine's own routine.
    fn draw_grid<S: DrawSurface + ?Sized>(&self, surface: &mut S, settings: &RenderSettings);

    /// Render the whole grid into an engine-owned RGBA raster sized to the canvas.
    fn pixel_raster(&mut self, settings: &RenderSettings) -> PixelFrame<'_>;

    /// Dimensions as a [`GridSize`].
    fn grid_size(&self) -> GridSize {
        GridSize {
            width: self.width(),
            height: self.height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn grid_size_rejects_zero() {
        assert!(GridSize::new(0, 10).is_err());
        assert!(GridSize::new(10, 0).is_err());
        assert_eq!(GridSize::new(3, 2).unwrap().cell_count(), 6);
    }

    #[test]
    fn grid_index_is_row_major() {
        let g = GridSize::new(4, 3).unwrap();
        assert_eq!(g.index(0, 0), 0);
        assert_eq!(g.index(0, 3), 3);
        assert_eq!(g.index(1, 0), 4);
        assert_eq!(g.index(2, 3), 11);
        assert!(g.contains(2, 3));
        assert!(!g.contains(3, 0));
    }

    #[test]
    fn cell_toggle() {
        assert_eq!(Cell::Dead.toggled(), Cell::Alive);
        assert_eq!(Cell::Alive.toggled(), Cell::Dead);
        assert_eq!(Cell::Alive as u8, 1);
    }

    #[test]
    fn settings_reject_zero_cell_size() {
        let err = RenderSettings::new(0, Rgba::BLACK, Rgba::WHITE, Rgba::BLACK).unwrap_err();
        assert_eq!(err, LifeError::InvalidCellSize(0));
    }

    #[test]
    fn settings_from_default_config() {
        let settings = RenderSettings::try_from(&LifeConfig::default()).unwrap();
        assert_eq!(settings, RenderSettings::default());
        let grid = GridSize::new(64, 32).unwrap();
        assert_eq!(settings.canvas_size(grid), (320, 160));
        assert_eq!(settings.checked_canvas_size(grid), Ok((320, 160)));
    }

    #[test]
    fn oversized_canvas_is_rejected() {
        let settings = RenderSettings::new(5_000, Rgba::BLACK, Rgba::WHITE, Rgba::BLACK).unwrap();
        let grid = GridSize::new(900_000, 1).unwrap();
        assert_eq!(
            settings.checked_canvas_size(grid),
            Err(LifeError::CanvasTooLarge {
                width: 900_000,
                height: 1,
                cell_size: 5_000
            })
        );
        assert_eq!(settings.canvas_size(grid), (u32::MAX, 5_000));

        let tall = GridSize::new(1, u32::MAX).unwrap();
        assert!(settings.checked_canvas_size(tall).is_err());
    }
}
