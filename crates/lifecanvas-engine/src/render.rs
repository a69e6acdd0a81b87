#![forbid(unsafe_code)]

//! The engine's own drawing routines: vector draws onto a surface and a
//! full-canvas pixel raster.

use lifecanvas_core::{Cell, DrawSurface, GridSize, PixelFrame, RenderSettings};

/// Fill every cell: live cells first, then dead cells, one fill color change
/// per pass.
pub(crate) fn draw_cells<S, I>(
    cells: &[Cell],
    addresses: I,
    surface: &mut S,
    settings: &RenderSettings,
) where
    S: DrawSurface + ?Sized,
    I: Iterator<Item = (u32, u32)> + Clone,
{
    let size = f64::from(settings.cell_size);
    for (state, color) in [
        (Cell::Alive, settings.live_color),
        (Cell::Dead, settings.dead_color),
    ] {
        surface.set_fill_color(color);
        for (_, (row, col)) in cells
            .iter()
            .zip(addresses.clone())
            .filter(|&(&cell, _)| cell == state)
        {
            surface.fill_rect(f64::from(col) * size, f64::from(row) * size, size, size);
        }
    }
}

/// Stroke all separators as one path: vertical lines, then horizontal.
///
/// The canvas is exactly `width * size` by `height * size`, so the closing
/// lines at `x_end` and `y_end` land past the last pixel and are clipped;
/// the outer frame is left to the page.
pub(crate) fn draw_grid<S: DrawSurface + ?Sized>(
    grid: GridSize,
    surface: &mut S,
    settings: &RenderSettings,
) {
    let size = f64::from(settings.cell_size);
    let y_end = f64::from(grid.height) * size;
    let x_end = f64::from(grid.width) * size;

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

/// Engine-owned RGBA raster sized to the canvas.
///
/// Pixels are packed with [`lifecanvas_core::Rgba::to_packed`], so the buffer
/// viewed as bytes is already in `[r, g, b, a]` order.
#[derive(Debug, Clone, Default)]
pub struct PixelRaster {
    pixels: Box<[u32]>,
    width: u32,
    height: u32,
}

impl PixelRaster {
    /// Paint `cells` and return the bytes. The buffer is reallocated only
    /// when the canvas geometry changes.
    pub fn render(
        &mut self,
        cells: &[Cell],
        grid: GridSize,
        settings: &RenderSettings,
    ) -> PixelFrame<'_> {
        let (width, height) = settings.canvas_size(grid);
        if (width, height) != (self.width, self.height) {
            tracing::debug!(width, height, "allocating pixel raster");
            self.pixels = vec![0; width as usize * height as usize].into_boxed_slice();
            self.width = width;
            self.height = height;
        }

        self.pixels.fill(settings.dead_color.to_packed());

        let live = settings.live_color.to_packed();
        let cell = settings.cell_size as usize;
        let stride = width as usize;
        for (idx, _) in cells.iter().enumerate().filter(|(_, c)| c.is_alive()) {
            let row = idx / grid.width as usize;
            let col = idx % grid.width as usize;
            let top = row * cell;
            for line in top..top + cell {
                let start = line * stride + col * cell;
                self.pixels[start..start + cell].fill(live);
            }
        }

        PixelFrame {
            bytes: bytemuck::cast_slice(&self.pixels[..]),
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifecanvas_core::Rgba;
    use lifecanvas_core::headless::{DrawOp, RecordingSurface};
    use pretty_assertions::assert_eq;

    fn settings(cell_size: u32) -> RenderSettings {
        RenderSettings::new(
            cell_size,
            Rgba::opaque(0x01, 0x0a, 0xbc),
            Rgba::WHITE,
            Rgba::opaque(0xCC, 0xCC, 0xCC),
        )
        .unwrap()
    }

    #[test]
    fn raster_bytes_are_rgba_order() {
        let grid = GridSize::new(2, 1).unwrap();
        let mut raster = PixelRaster::default();
        let frame = raster.render(&[Cell::Alive, Cell::Dead], grid, &settings(1));
        assert!(frame.is_well_formed());
        assert_eq!((frame.width, frame.height), (2, 1));
        assert_eq!(frame.bytes, &[0x01, 0x0a, 0xbc, 0xff, 0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn raster_fills_whole_cell_blocks() {
        let grid = GridSize::new(2, 2).unwrap();
        let mut raster = PixelRaster::default();
        let cells = [Cell::Dead, Cell::Dead, Cell::Dead, Cell::Alive];
        let frame = raster.render(&cells, grid, &settings(2));
        let px = |x: usize, y: usize| {
            let i = (y * 4 + x) * 4;
            frame.bytes[i..i + 4].to_vec()
        };
        assert_eq!(px(2, 2), vec![0x01, 0x0a, 0xbc, 0xff]);
        assert_eq!(px(3, 3), vec![0x01, 0x0a, 0xbc, 0xff]);
        assert_eq!(px(1, 3), vec![0xff; 4]);
        assert_eq!(px(3, 1), vec![0xff; 4]);
    }

    #[test]
    fn raster_is_repainted_each_call() {
        let grid = GridSize::new(1, 1).unwrap();
        let mut raster = PixelRaster::default();
        raster.render(&[Cell::Alive], grid, &settings(3));
        let frame = raster.render(&[Cell::Dead], grid, &settings(3));
        assert!(frame.bytes.iter().all(|&b| b == 0xff));
    }

    #[test]
    fn delegated_cells_two_passes() {
        let mut surface = RecordingSurface::new();
        let cells = [Cell::Dead, Cell::Alive];
        let addresses = (0..1u32).flat_map(|r| (0..2u32).map(move |c| (r, c)));
        draw_cells(&cells, addresses, &mut surface, &settings(4));
        assert_eq!(
            surface.ops(),
            &[
                DrawOp::FillColor(Rgba::opaque(0x01, 0x0a, 0xbc)),
                DrawOp::FillRect {
                    x: 4.0,
                    y: 0.0,
                    width: 4.0,
                    height: 4.0
                },
                DrawOp::FillColor(Rgba::WHITE),
                DrawOp::FillRect {
                    x: 0.0,
                    y: 0.0,
                    width: 4.0,
                    height: 4.0
                },
            ]
        );
    }

    #[test]
    fn delegated_grid_is_one_path() {
        let mut surface = RecordingSurface::new();
        draw_grid(GridSize::new(2, 1).unwrap(), &mut surface, &settings(5));
        let ops = surface.ops();
        assert_eq!(ops[0], DrawOp::BeginPath);
        assert_eq!(ops[1], DrawOp::StrokeColor(Rgba::opaque(0xCC, 0xCC, 0xCC)));
        assert_eq!(ops[2], DrawOp::MoveTo(0.0, 0.0));
        assert_eq!(ops[3], DrawOp::LineTo(0.0, 5.0));
        assert_eq!(surface.strokes(), 1);
        assert_eq!(ops.last(), Some(&DrawOp::Stroke));
        // 3 vertical + 2 horizontal.
        assert_eq!(ops.len(), 2 + 5 * 2 + 1);
    }
}
