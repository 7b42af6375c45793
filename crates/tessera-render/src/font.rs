//! Fixed-grid bitmap font atlases.

use std::path::Path;

use tessera_common::Rect;
use thiserror::Error;
use tracing::debug;

use crate::image::Image;

/// Font atlas errors.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Atlas image dimensions are not divisible into the declared grid.
    #[error("atlas {width}x{height} does not divide into a {cols}x{rows} grid")]
    GridMismatch {
        /// Atlas image width
        width: i32,
        /// Atlas image height
        height: i32,
        /// Declared grid columns
        cols: u32,
        /// Declared grid rows
        rows: u32,
    },

    /// The grid holds fewer than 256 cells, so some glyph bytes would map
    /// outside the atlas.
    #[error("atlas grid {cols}x{rows} holds fewer than 256 cells")]
    GridTooSmall {
        /// Declared grid columns
        cols: u32,
        /// Declared grid rows
        rows: u32,
    },

    /// Reading the atlas file failed.
    #[error("failed to read atlas: {0}")]
    Io(#[from] std::io::Error),

    /// Decoding the atlas image failed.
    #[error("failed to decode atlas: {0}")]
    Decode(String),
}

/// Result type for atlas operations.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// A stencil font atlas on a fixed cell grid.
///
/// Glyph bytes 0-255 index cells left-to-right, top-to-bottom. Only the low
/// byte of each atlas pixel matters to the rasterizer.
#[derive(Debug, Clone)]
pub struct FontAtlas {
    image: Image,
    cols: u32,
    rows: u32,
    cell_w: i32,
    cell_h: i32,
}

impl FontAtlas {
    /// Wraps decoded atlas pixels with a glyph grid.
    pub fn new(image: Image, cols: u32, rows: u32) -> AtlasResult<Self> {
        if cols == 0 || rows == 0 || cols * rows < 256 {
            return Err(AtlasError::GridTooSmall { cols, rows });
        }
        if image.width() % cols as i32 != 0 || image.height() % rows as i32 != 0 {
            return Err(AtlasError::GridMismatch {
                width: image.width(),
                height: image.height(),
                cols,
                rows,
            });
        }
        let cell_w = image.width() / cols as i32;
        let cell_h = image.height() / rows as i32;
        Ok(Self {
            image,
            cols,
            rows,
            cell_w,
            cell_h,
        })
    }

    /// Loads and decodes a PNG atlas.
    ///
    /// This is a platform-boundary convenience; the core only ever consumes
    /// the decoded pixels.
    pub fn load_png<P: AsRef<Path>>(path: P, cols: u32, rows: u32) -> AtlasResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| AtlasError::Decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();

        let pixels: Vec<u32> = decoded
            .pixels()
            .map(|p| {
                (u32::from(p[0]) << 24)
                    | (u32::from(p[1]) << 16)
                    | (u32::from(p[2]) << 8)
                    | u32::from(p[3])
            })
            .collect();

        debug!(path = %path.display(), width, height, "loaded font atlas");
        let image = Image::from_pixels(pixels, width as i32, height as i32)
            .map_err(|e| AtlasError::Decode(e.to_string()))?;
        Self::new(image, cols, rows)
    }

    /// The atlas stencil image.
    #[must_use]
    pub const fn image(&self) -> &Image {
        &self.image
    }

    /// Grid columns.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Grid rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cell width in pixels.
    #[must_use]
    pub const fn cell_width(&self) -> i32 {
        self.cell_w
    }

    /// Cell height in pixels.
    #[must_use]
    pub const fn cell_height(&self) -> i32 {
        self.cell_h
    }

    /// The source rectangle of a glyph's atlas cell.
    #[must_use]
    pub fn glyph_rect(&self, glyph: u8) -> Rect {
        let col = i32::from(glyph) % self.cols as i32;
        let row = i32::from(glyph) / self.cols as i32;
        Rect::new(col * self.cell_w, row * self.cell_h, self.cell_w, self.cell_h)
    }
}
