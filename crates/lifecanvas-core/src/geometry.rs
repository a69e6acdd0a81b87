#![forbid(unsafe_code)]

//! Pointer-to-grid coordinate mapping.

use crate::engine::GridSize;

/// Displayed (CSS-pixel) rectangle of the canvas, as reported by the host's
/// bounding-box query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A pointer click in client (CSS-pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// A validated in-range grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub row: u32,
    pub col: u32,
}

/// Everything needed to turn a pointer position into a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    /// Backing-store width of the canvas in device pixels.
    pub pixel_width: f64,
    /// Backing-store height of the canvas in device pixels.
    pub pixel_height: f64,
    /// Cell edge length in canvas pixels.
    pub cell_size: f64,
    pub grid: GridSize,
}

impl CanvasLayout {
    #[must_use]
    pub fn new(pixel_width: u32, pixel_height: u32, cell_size: u32, grid: GridSize) -> Self {
        Self {
            pixel_width: f64::from(pixel_width),
            pixel_height: f64::from(pixel_height),
            cell_size: f64::from(cell_size),
            grid,
        }
    }

    /// Map a pointer position onto the grid. See [`map_to_cell`].
    #[must_use]
    pub fn cell_at(&self, pointer: PointerEvent, bounds: BoundingBox) -> CellIndex {
        map_to_cell(
            pointer,
            bounds,
            self.pixel_width,
            self.pixel_height,
            self.cell_size,
            self.grid,
        )
    }
}

/// Convert a client-space pointer position into a grid cell.
///
/// The position is translated into canvas-pixel space using the ratio of the
/// canvas backing store to its displayed box, divided by `cell_size`, floored,
/// and clamped to `[0, dimension - 1]` on each axis. Clicks just outside the
/// drawn area therefore land on the nearest edge cell.
#[must_use]
pub fn map_to_cell(
    pointer: PointerEvent,
    bounds: BoundingBox,
    canvas_pixel_width: f64,
    canvas_pixel_height: f64,
    cell_size: f64,
    grid: GridSize,
) -> CellIndex {
    let scale_x = scale(canvas_pixel_width, bounds.width);
    let scale_y = scale(canvas_pixel_height, bounds.height);

    let canvas_x = (pointer.client_x - bounds.left) * scale_x;
    let canvas_y = (pointer.client_y - bounds.top) * scale_y;

    CellIndex {
        row: axis_index(canvas_y, cell_size, grid.height),
        col: axis_index(canvas_x, cell_size, grid.width),
    }
}

fn scale(pixels: f64, displayed: f64) -> f64 {
    if displayed > 0.0 && displayed.is_finite() {
        pixels / displayed
    } else {
        1.0
    }
}

fn axis_index(canvas_pos: f64, cell_size: f64, dimension: u32) -> u32 {
    let last = f64::from(dimension.saturating_sub(1));
    let raw = (canvas_pos / cell_size).floor();
    // `f64::max`/`min` drop NaN, and the final cast saturates.
    raw.max(0.0).min(last) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid64() -> GridSize {
        GridSize::new(64, 64).unwrap()
    }

    fn unscaled() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 320.0, 320.0)
    }

    fn at(x: f64, y: f64) -> CellIndex {
        map_to_cell(PointerEvent::new(x, y), unscaled(), 320.0, 320.0, 5.0, grid64())
    }

    #[test]
    fn corners() {
        assert_eq!(at(0.0, 0.0), CellIndex { row: 0, col: 0 });
        assert_eq!(at(319.0, 319.0), CellIndex { row: 63, col: 63 });
    }

    #[test]
    fn clamps_at_and_past_the_far_edge() {
        assert_eq!(at(320.0, 320.0), CellIndex { row: 63, col: 63 });
        assert_eq!(at(10_000.0, 5.0), CellIndex { row: 1, col: 63 });
    }

    #[test]
    fn clamps_before_the_origin() {
        assert_eq!(at(-3.0, -0.5), CellIndex { row: 0, col: 0 });
    }

    #[test]
    fn row_follows_y_and_col_follows_x() {
        assert_eq!(at(12.0, 27.0), CellIndex { row: 5, col: 2 });
    }

    #[test]
    fn applies_display_scale_and_offset() {
        // Canvas is 320px wide but displayed at 160 CSS px starting at (100, 50).
        let bounds = BoundingBox::new(100.0, 50.0, 160.0, 160.0);
        let cell = map_to_cell(
            PointerEvent::new(100.0 + 80.0, 50.0 + 2.0),
            bounds,
            320.0,
            320.0,
            5.0,
            grid64(),
        );
        assert_eq!(cell, CellIndex { row: 0, col: 32 });
    }

    #[test]
    fn degenerate_bounds_and_nan() {
        let bounds = BoundingBox::new(0.0, 0.0, 0.0, 0.0);
        let cell = map_to_cell(PointerEvent::new(7.0, 7.0), bounds, 320.0, 320.0, 5.0, grid64());
        assert_eq!(cell, CellIndex { row: 1, col: 1 });

        let cell = at(f64::NAN, f64::NAN);
        assert_eq!(cell, CellIndex { row: 0, col: 0 });
    }

    #[test]
    fn layout_helper_matches_free_function() {
        let layout = CanvasLayout::new(320, 320, 5, grid64());
        assert_eq!(
            layout.cell_at(PointerEvent::new(319.0, 0.0), unscaled()),
            CellIndex { row: 0, col: 63 }
        );
    }
}
