#![forbid(unsafe_code)]

//! Toroidal B3/S23 grid.

use std::fmt;
use std::hash::{BuildHasher, Hasher};

use lifecanvas_core::{
    Cell, DrawSurface, GridSize, LifeError, PixelFrame, RenderSettings, SimulationEngine,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::UniverseConfig;
use crate::render::{self, PixelRaster};

/// Conway's Game of Life on a torus: cells on one edge neighbour the cells on
/// the opposite edge.
#[derive(Debug, Clone)]
pub struct Universe {
    grid: GridSize,
    cells: Vec<Cell>,
    scratch: Vec<Cell>,
    density: f64,
    rng: SmallRng,
    raster: PixelRaster,
}

impl Universe {
    /// An all-dead universe with a fresh random seed.
    pub fn new(width: u32, height: u32) -> Result<Self, LifeError> {
        Self::with_seed(width, height, fresh_seed())
    }

    /// An all-dead universe whose random patterns follow `seed`.
    pub fn with_seed(width: u32, height: u32, seed: u64) -> Result<Self, LifeError> {
        let grid = GridSize::new(width, height)?;
        Ok(Self {
            grid,
            cells: vec![Cell::Dead; grid.cell_count()],
            scratch: vec![Cell::Dead; grid.cell_count()],
            density: 0.5,
            rng: SmallRng::seed_from_u64(seed),
            raster: PixelRaster::default(),
        })
    }

    /// A randomly populated universe.
    pub fn from_config(config: &UniverseConfig) -> Result<Self, LifeError> {
        let grid = config.validate()?;
        let seed = config.seed.unwrap_or_else(fresh_seed);
        let mut universe = Self::with_seed(grid.width, grid.height, seed)?;
        universe.density = config.density;
        universe.randomize();
        tracing::debug!(
            width = grid.width,
            height = grid.height,
            density = config.density,
            seed,
            live = universe.live_count(),
            "universe created"
        );
        Ok(universe)
    }

    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    #[must_use]
    pub fn cell(&self, row: u32, col: u32) -> Cell {
        self.cells[self.grid.index(row, col)]
    }

    /// Set the listed `(row, col)` cells alive, leaving the rest untouched.
    pub fn set_cells(&mut self, addresses: &[(u32, u32)]) {
        for &(row, col) in addresses {
            self.check_range(row, col);
            let idx = self.grid.index(row, col);
            self.cells[idx] = Cell::Alive;
        }
    }

    /// Every `(row, col)` in row-major order, matching the layout of the
    /// cell view.
    pub fn addresses(&self) -> impl Iterator<Item = (u32, u32)> + Clone + use<> {
        let GridSize { width, height } = self.grid;
        (0..height).flat_map(move |row| (0..width).map(move |col| (row, col)))
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    fn randomize(&mut self) {
        let density = self.density;
        for cell in &mut self.cells {
            *cell = if self.rng.gen_bool(density) {
                Cell::Alive
            } else {
                Cell::Dead
            };
        }
    }

    fn live_neighbours(&self, row: u32, col: u32) -> u8 {
        let GridSize { width, height } = self.grid;
        let mut count = 0;
        for dr in [height - 1, 0, 1] {
            for dc in [width - 1, 0, 1] {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = (row + dr) % height;
                let c = (col + dc) % width;
                count += self.cells[self.grid.index(r, c)] as u8;
            }
        }
        count
    }

    fn check_range(&self, row: u32, col: u32) {
        assert!(
            self.grid.contains(row, col),
            "cell ({row}, {col}) outside {}x{} grid",
            self.grid.width,
            self.grid.height
        );
    }
}

impl SimulationEngine for Universe {
    fn width(&self) -> u32 {
        self.grid.width
    }

    fn height(&self) -> u32 {
        self.grid.height
    }

    fn tick(&mut self) {
        for row in 0..self.grid.height {
            for col in 0..self.grid.width {
                let idx = self.grid.index(row, col);
                let next = match (self.cells[idx], self.live_neighbours(row, col)) {
                    (Cell::Alive, 2 | 3) | (Cell::Dead, 3) => Cell::Alive,
                    _ => Cell::Dead,
                };
                self.scratch[idx] = next;
            }
        }
        std::mem::swap(&mut self.cells, &mut self.scratch);
    }

    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn flip_cell(&mut self, row: u32, col: u32) {
        self.check_range(row, col);
        let idx = self.grid.index(row, col);
        self.cells[idx] = self.cells[idx].toggled();
    }

    fn reset_to_dead(&mut self) {
        self.cells.fill(Cell::Dead);
    }

    fn reset_to_random(&mut self) {
        self.randomize();
        tracing::trace!(live = self.live_count(), "universe re-randomized");
    }

    fn draw_cells<S: DrawSurface + ?Sized>(&self, surface: &mut S, settings: &RenderSettings) {
        render::draw_cells(&self.cells, self.addresses(), surface, settings);
    }

    fn draw_grid<S: DrawSurface + ?Sized>(&self, surface: &mut S, settings: &RenderSettings) {
        render::draw_grid(self.grid, surface, settings);
    }

    fn pixel_raster(&mut self, settings: &RenderSettings) -> PixelFrame<'_> {
        self.raster.render(&self.cells, self.grid, settings)
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.cells.chunks(self.grid.width as usize) {
            for &cell in line {
                let glyph = if cell.is_alive() { '◼' } else { '◻' };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Seed from the process-wide hasher keys, which std randomizes per process
/// where the platform allows it.
fn fresh_seed() -> u64 {
    let mut hasher = std::collections::hash_map::RandomState::new().build_hasher();
    hasher.write_u64(0x9E37_79B9_7F4A_7C15);
    hasher.finish()
}
