#![forbid(unsafe_code)]

//! Software canvas used to compare what the render strategies actually paint.
//!
//! Fills snap rectangle edges to the nearest pixel. Strokes are one pixel
//! wide and land on `floor(coordinate)`; anything outside the surface is
//! clipped.

use crate::color::Rgba;
use crate::error::LifeError;
use crate::host::DrawSurface;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    from: (f64, f64),
    to: (f64, f64),
}

/// In-memory RGBA pixel buffer implementing [`DrawSurface`].
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    fill: Rgba,
    stroke: Rgba,
    cursor: Option<(f64, f64)>,
    path: Vec<Segment>,
}

impl RasterSurface {
    /// A fully transparent surface.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT.to_packed(); width as usize * height as usize],
            fill: Rgba::BLACK,
            stroke: Rgba::BLACK,
            cursor: None,
            path: Vec::new(),
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Color at `(x, y)`, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        (x < self.width && y < self.height)
            .then(|| Rgba::from_packed(self.pixels[self.offset(x, y)]))
    }

    /// Packed pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn plot(&mut self, x: i64, y: i64, color: u32) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = self.offset(x as u32, y as u32);
        self.pixels[idx] = color;
    }

    fn draw_segment(&mut self, seg: Segment, color: u32) {
        let (x0, y0) = seg.from;
        let (dx, dy) = (seg.to.0 - x0, seg.to.1 - y0);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i64;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.plot(
                (x0 + dx * t).floor() as i64,
                (y0 + dy * t).floor() as i64,
                color,
            );
        }
    }
}

/// Clip `[start, start + len)` after rounding both edges to whole pixels.
fn span(start: f64, len: f64, limit: u32) -> std::ops::Range<u32> {
    let lo = start.round().clamp(0.0, f64::from(limit)) as u32;
    let hi = (start + len).round().clamp(0.0, f64::from(limit)) as u32;
    lo..hi.max(lo)
}

impl DrawSurface for RasterSurface {
    fn begin_path(&mut self) {
        self.path.clear();
        self.cursor = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if let Some(from) = self.cursor {
            self.path.push(Segment { from, to: (x, y) });
        }
        self.cursor = Some((x, y));
    }

    fn stroke(&mut self) {
        let color = self.stroke.to_packed();
        let path = std::mem::take(&mut self.path);
        for &seg in &path {
            self.draw_segment(seg, color);
        }
        self.path = path;
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.stroke = color;
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let color = self.fill.to_packed();
        let cols = span(x, width, self.width);
        for row in span(y, height, self.height) {
            let start = self.offset(cols.start, row);
            let end = self.offset(cols.end, row);
            self.pixels[start..end].fill(color);
        }
    }

    fn put_pixels(&mut self, rgba: &[u8], width: u32, height: u32) -> Result<(), LifeError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(LifeError::Host(format!(
                "raster of {} bytes does not match {width}x{height}",
                rgba.len()
            )));
        }
        if expected == 0 {
            return Ok(());
        }
        let copy_w = width.min(self.width) as usize;
        for (row, line) in rgba
            .chunks_exact(width as usize * 4)
            .take(self.height as usize)
            .enumerate()
        {
            let start = self.offset(0, row as u32);
            let dst = &mut self.pixels[start..start + copy_w];
            for (px, src) in dst.iter_mut().zip(line.chunks_exact(4)) {
                *px = u32::from_ne_bytes([src[0], src[1], src[2], src[3]]);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Rgba = Rgba::opaque(0xFF, 0, 0);

    #[test]
    fn starts_transparent() {
        let surface = RasterSurface::new(3, 2);
        assert_eq!(surface.pixel(2, 1), Some(Rgba::TRANSPARENT));
        assert_eq!(surface.pixel(3, 0), None);
    }

    #[test]
    fn fill_rect_clips() {
        let mut surface = RasterSurface::new(4, 4);
        surface.set_fill_color(RED);
        surface.fill_rect(2.0, 2.0, 10.0, 10.0);
        assert_eq!(surface.pixel(3, 3), Some(RED));
        assert_eq!(surface.pixel(1, 3), Some(Rgba::TRANSPARENT));
        surface.fill_rect(-5.0, -5.0, 6.0, 6.0);
        assert_eq!(surface.pixel(0, 0), Some(RED));
        assert_eq!(surface.pixel(1, 1), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn stroke_draws_on_floor_coordinates() {
        let mut surface = RasterSurface::new(6, 6);
        surface.begin_path();
        surface.set_stroke_color(RED);
        surface.move_to(2.0, 0.0);
        surface.line_to(2.0, 6.0);
        surface.move_to(0.0, 6.0);
        surface.line_to(6.0, 6.0);
        surface.stroke();
        for y in 0..6 {
            assert_eq!(surface.pixel(2, y), Some(RED));
            assert_eq!(surface.pixel(3, y), Some(Rgba::TRANSPARENT));
        }
    }

    #[test]
    fn put_pixels_checks_length_and_copies() {
        let mut surface = RasterSurface::new(2, 2);
        assert!(surface.put_pixels(&[0; 15], 2, 2).is_err());

        let mut bytes = vec![0u8; 16];
        bytes[12..16].copy_from_slice(&[0xFF, 0, 0, 0xFF]);
        surface.put_pixels(&bytes, 2, 2).unwrap();
        assert_eq!(surface.pixel(1, 1), Some(RED));
        assert_eq!(surface.pixel(0, 0), Some(Rgba::TRANSPARENT));
    }
}
