//! Rect-clipped stencil blitting with foreground/background blending.

use tessera_common::{Rect, Rgb};
use thiserror::Error;

use crate::font::FontAtlas;
use crate::image::{Image, ImageMut};

/// Rasterizer errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RasterError {
    /// The source rectangle must be non-empty and lie fully inside the
    /// source image.
    #[error("source rect {x},{y} {w}x{h} outside source image {width}x{height}")]
    SourceRectOutOfBounds {
        /// Source rect left edge
        x: i32,
        /// Source rect top edge
        y: i32,
        /// Source rect width
        w: i32,
        /// Source rect height
        h: i32,
        /// Source image width
        width: i32,
        /// Source image height
        height: i32,
    },

    /// The destination rectangle has zero width or height. Clipping is
    /// handled here, but a degenerate rect is a caller error (it has no
    /// defined source mapping).
    #[error("destination rect has zero width or height")]
    EmptyDestRect,

    /// A pixel buffer's length does not match its declared dimensions.
    #[error("pixel buffer length {len} does not match {width}x{height}")]
    BufferSizeMismatch {
        /// Actual buffer length in pixels
        len: usize,
        /// Declared width
        width: i32,
        /// Declared height
        height: i32,
    },
}

/// Result type for rasterizer operations.
pub type RasterResult<T> = Result<T, RasterError>;

/// Blits a stencil into `dst`, blending `fg` over `bg` by per-pixel coverage.
///
/// Only the low byte of each source pixel carries coverage; the rest of the
/// source color is ignored. The destination rectangle may differ in size
/// from the source rectangle (nearest-neighbor scaling) and may lie partly
/// or fully outside the destination image; it is clipped per edge, and each
/// surviving pixel keeps the source mapping it would have had unclipped.
/// Affected pixels are fully overwritten (opaque output); there is no
/// blending across separate calls.
pub fn blit_stencil(
    src: &Image,
    src_rect: Rect,
    dst: &mut ImageMut<'_>,
    dst_rect: Rect,
    fg: Rgb,
    bg: Rgb,
) -> RasterResult<()> {
    let src_bounds = Rect::new(0, 0, src.width(), src.height());
    if src_rect.is_empty() || !src_bounds.contains(src_rect) {
        return Err(RasterError::SourceRectOutOfBounds {
            x: src_rect.x,
            y: src_rect.y,
            w: src_rect.w,
            h: src_rect.h,
            width: src.width(),
            height: src.height(),
        });
    }
    if dst_rect.is_empty() {
        return Err(RasterError::EmptyDestRect);
    }

    let clipped = dst_rect.clipped_to(dst.width(), dst.height());
    if clipped.is_empty() {
        // Soft-clip: nothing to draw, not an error.
        return Ok(());
    }

    let src_pixels = src.pixels();
    let src_width = src.width();
    let dst_width = dst.width();
    let dst_pixels = dst.pixels_mut();

    for row in clipped.y..clipped.max_y() {
        // Ratios are relative to the unclipped rect so clipping never
        // distorts the source-to-destination mapping.
        let y_ratio = (row - dst_rect.y) as f32 / dst_rect.h as f32;
        let src_y = src_rect.y + (y_ratio * src_rect.h as f32) as i32;

        for col in clipped.x..clipped.max_x() {
            let x_ratio = (col - dst_rect.x) as f32 / dst_rect.w as f32;
            let src_x = src_rect.x + (x_ratio * src_rect.w as f32) as i32;

            let coverage = src_pixels[(src_y * src_width + src_x) as usize] & 0xFF;
            let alpha = coverage as f32 / 255.0;
            dst_pixels[(row * dst_width + col) as usize] = Rgb::blend(bg, fg, alpha).to_rgba();
        }
    }

    Ok(())
}

/// [`blit_stencil`] with the destination rectangle given in Y-up
/// coordinates: the rect is flipped about the destination image's height
/// before blitting, bridging the Y-up world convention to the Y-down pixel
/// buffer.
pub fn blit_stencil_yup(
    src: &Image,
    src_rect: Rect,
    dst: &mut ImageMut<'_>,
    dst_rect: Rect,
    fg: Rgb,
    bg: Rgb,
) -> RasterResult<()> {
    let flipped = Rect::new(
        dst_rect.x,
        dst.height() - (dst_rect.y + dst_rect.h),
        dst_rect.w,
        dst_rect.h,
    );
    blit_stencil(src, src_rect, dst, flipped, fg, bg)
}

/// Draws one glyph from the atlas into a Y-up destination rectangle.
pub fn draw_glyph(
    atlas: &FontAtlas,
    glyph: u8,
    dst: &mut ImageMut<'_>,
    dst_rect: Rect,
    fg: Rgb,
    bg: Rgb,
) -> RasterResult<()> {
    blit_stencil_yup(atlas.image(), atlas.glyph_rect(glyph), dst, dst_rect, fg, bg)
}
