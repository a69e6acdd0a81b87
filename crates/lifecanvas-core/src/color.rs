#![forbid(unsafe_code)]

//! Opaque RGBA colors used by render settings, surfaces, and pixel rasters.

use std::fmt;

use crate::error::LifeError;

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::opaque(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::opaque(0xFF, 0xFF, 0xFF);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    ///
    /// Six-digit colors are fully opaque.
    pub fn parse(input: &str) -> Result<Self, LifeError> {
        let hex = input.trim().trim_start_matches('#');
        let invalid = |reason| LifeError::InvalidColor {
            input: input.to_owned(),
            reason,
        };

        if hex.len() != 6 && hex.len() != 8 {
            return Err(invalid("expected 6 or 8 hex digits"));
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid("non-hex digit"));
        }
        let n = u32::from_str_radix(hex, 16).map_err(|_| invalid("non-hex digit"))?;

        Ok(if hex.len() == 6 {
            let [_, r, g, b] = n.to_be_bytes();
            Self::opaque(r, g, b)
        } else {
            let [r, g, b, a] = n.to_be_bytes();
            Self::new(r, g, b, a)
        })
    }

    /// Pack into a `u32` whose in-memory byte order is `[r, g, b, a]`.
    ///
    /// This is the layout `ImageData` expects, so a `[u32]` raster of packed
    /// colors can be handed to the canvas as bytes without per-pixel work.
    #[must_use]
    pub const fn to_packed(self) -> u32 {
        u32::from_ne_bytes([self.r, self.g, self.b, self.a])
    }

    /// Inverse of [`Rgba::to_packed`].
    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_ne_bytes();
        Self::new(r, g, b, a)
    }

    /// CSS color string for canvas fill/stroke styles.
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a == 0xFF {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                f32::from(self.a) / 255.0
            )
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

impl std::str::FromStr for Rgba {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
