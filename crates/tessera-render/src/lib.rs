//! # Tessera Render
//!
//! Software rendering for Tessera:
//! - Packed-RGBA32 image buffers and framebuffer views
//! - Fixed-grid stencil font atlases (with a PNG loading convenience)
//! - A rect-clipped, nearest-neighbor stencil blitter that blends a
//!   foreground/background color pair per pixel
//! - A camera with log-space zoom, sub-tile pan, and visible-range queries
//!
//! The rasterizer is Y-down like the pixel buffer; a Y-up wrapper bridges
//! the world's Y-up convention.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod blit;
pub mod camera;
pub mod font;
pub mod image;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::blit::*;
    pub use crate::camera::*;
    pub use crate::font::*;
    pub use crate::image::*;
}

pub use prelude::*;
