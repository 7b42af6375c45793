//! Linear RGB color used for glyph foreground/background pairs.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A 3-channel linear color with each channel in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Rgb {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Pure white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Creates a new color.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a gray with all channels equal.
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Blends between `bg` and `fg` by coverage `alpha` in [0, 1].
    #[must_use]
    pub fn blend(bg: Self, fg: Self, alpha: f32) -> Self {
        Self {
            r: bg.r * (1.0 - alpha) + fg.r * alpha,
            g: bg.g * (1.0 - alpha) + fg.g * alpha,
            b: bg.b * (1.0 - alpha) + fg.b * alpha,
        }
    }

    /// Packs to an RGBA32 word with a fully opaque alpha in the low byte.
    ///
    /// Layout is `0xRRGGBBAA`, matching the stencil convention where the low
    /// byte of a packed pixel carries coverage.
    #[must_use]
    pub fn to_rgba(self) -> u32 {
        let r = (self.r.clamp(0.0, 1.0) * 255.0) as u32;
        let g = (self.g.clamp(0.0, 1.0) * 255.0) as u32;
        let b = (self.b.clamp(0.0, 1.0) * 255.0) as u32;
        (r << 24) | (g << 16) | (b << 8) | 0xFF
    }
}
