#![forbid(unsafe_code)]

//! Multi-strategy grid renderer.
//!
//! One frame is cells first, grid lines last, under whichever
//! [`RenderStrategy`] is active:
//!
//! - [`RenderStrategy::DirectDraw`]: walk the engine's borrowed cell view and
//!   fill rectangles here, live cells in one pass and dead cells in a second
//!   so the fill color changes only twice per frame.
//! - [`RenderStrategy::DelegatedDraw`]: hand the surface and settings to the
//!   engine's draw routines.
//! - [`RenderStrategy::DelegatedPixelBlit`]: ask the engine for a finished
//!   raster and blit it in one call; the engine still strokes the grid.
//!
//! The renderer holds no reference to engine memory between calls.

use crate::engine::{Cell, GridSize, RenderSettings, SimulationEngine};
use crate::error::LifeError;
use crate::host::DrawSurface;
use crate::strategy::RenderStrategy;

/// What a single [`Renderer::render`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPass {
    pub strategy: RenderStrategy,
    /// Live cells painted by the renderer itself (`DirectDraw` only).
    pub live_cells: Option<usize>,
}

/// Draws frames for one grid with fixed settings.
#[derive(Debug, Clone)]
pub struct Renderer {
    settings: RenderSettings,
    grid: GridSize,
    canvas: (u32, u32),
}

impl Renderer {
    /// Fails if the grid at this cell size does not fit a canvas.
    pub fn new(settings: RenderSettings, grid: GridSize) -> Result<Self, LifeError> {
        let canvas = settings.checked_canvas_size(grid)?;
        Ok(Self {
            settings,
            grid,
            canvas,
        })
    }

    #[must_use]
    pub const fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Canvas backing-store size in pixels.
    #[must_use]
    pub const fn canvas_size(&self) -> (u32, u32) {
        self.canvas
    }

    /// Produce one frame of the engine's current state.
    pub fn render<E, S>(
        &self,
        strategy: RenderStrategy,
        engine: &mut E,
        surface: &mut S,
    ) -> Result<RenderPass, LifeError>
    where
        E: SimulationEngine,
        S: DrawSurface + ?Sized,
    {
        let _span = tracing::trace_span!("render", %strategy).entered();

        let live_cells = match strategy {
            RenderStrategy::DirectDraw => {
                let live = self.fill_cells(engine.cells(), surface);
                stroke_grid(surface, self.grid, &self.settings);
                Some(live)
            }
            RenderStrategy::DelegatedDraw => {
                engine.draw_cells(surface, &self.settings);
                engine.draw_grid(surface, &self.settings);
                None
            }
            RenderStrategy::DelegatedPixelBlit => {
                let frame = engine.pixel_raster(&self.settings);
                debug_assert!(
                    frame.is_well_formed(),
                    "raster {}x{} has {} bytes",
                    frame.width,
                    frame.height,
                    frame.bytes.len()
                );
                surface.put_pixels(frame.bytes, frame.width, frame.height)?;
                engine.draw_grid(surface, &self.settings);
                None
            }
        };

        Ok(RenderPass {
            strategy,
            live_cells,
        })
    }

    /// Two fill passes over the borrowed view. Returns the live count.
    fn fill_cells<S: DrawSurface + ?Sized>(&self, cells: &[Cell], surface: &mut S) -> usize {
        debug_assert_eq!(
            cells.len(),
            self.grid.cell_count(),
            "cell view length does not match {}x{}",
            self.grid.width,
            self.grid.height
        );

        let size = f64::from(self.settings.cell_size);
        let width = self.grid.width as usize;
        let fill_where = |surface: &mut S, want: Cell| {
            let mut painted = 0;
            for (idx, _) in cells.iter().enumerate().filter(|&(_, &c)| c == want) {
                let row = (idx / width) as f64;
                let col = (idx % width) as f64;
                surface.fill_rect(col * size, row * size, size, size);
                painted += 1;
            }
            painted
        };

        surface.set_fill_color(self.settings.live_color);
        let live = fill_where(surface, Cell::Alive);
        surface.set_fill_color(self.settings.dead_color);
        fill_where(surface, Cell::Dead);
        live
    }
}

/// Stroke every separator as one path: all vertical lines, then all
/// horizontal lines.
///
/// The closing lines at `x_end` and `y_end` sit on the canvas edge and are
/// clipped, matching the engine's own grid routine.
fn stroke_grid<S: DrawSurface + ?Sized>(
    surface: &mut S,
    grid: GridSize,
    settings: &RenderSettings,
) {
    let size = f64::from(settings.cell_size);
    let x_end = f64::from(grid.width) * size;
    let y_end = f64::from(grid.height) * size;

    surface.begin_path();
    surface.set_stroke_color(settings.grid_color);

    for i in 0..=grid.width {
        let x = f64::from(i) * size;
        surface.move_to(x, 0.0);
        surface.line_to(x, y_end);
    }
    for i in 0..=grid.height {
        let y = f64::from(i) * size;
        surface.move_to(0.0, y);
        surface.line_to(x_end, y);
    }

    surface.stroke();
}
