//! Camera with log-space zoom and viewport queries.

use serde::{Deserialize, Serialize};
use tessera_common::{ChunkCoord, TileCoord};

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Minimum pixels-per-tile scale (fully zoomed out)
    pub min_scale: f32,
    /// Maximum pixels-per-tile scale (fully zoomed in)
    pub max_scale: f32,
    /// Zoom log-position change per second while a zoom key is held
    pub zoom_rate: f32,
    /// Maximum pan offset magnitude per axis, in tiles
    pub max_pan: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            max_scale: 10.0,
            zoom_rate: 1.0,
            max_pan: 0.5,
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Which side of the neutral log-position a zoom hold started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZoomAnchor {
    /// No zoom key held.
    Idle,
    /// Hold started exactly at neutral; no side clamp applies.
    AtNeutral,
    /// Hold started below neutral; the position may not rise above it.
    Below,
    /// Hold started above neutral; the position may not fall below it.
    Above,
}

/// The camera: log-space zoom, sub-tile pan, and an integer center tile.
///
/// Zoom is a normalized log-position in [0, 1] mapped exponentially onto the
/// `[min_scale, max_scale]` pixels-per-tile range. The neutral position is
/// the one that maps to scale 1.0. The center tile snaps exactly to the
/// tracked entity; there is no smoothing.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    zoom_pos: f32,
    neutral_pos: f32,
    anchor: ZoomAnchor,
    pan: (f32, f32),
    center: TileCoord,
}

impl Camera {
    /// Creates a camera at neutral zoom, centered on the origin.
    #[must_use]
    pub fn new(config: CameraConfig) -> Self {
        // Solve lerp(ln min, ln max, t) = ln 1 for t.
        let ln_min = config.min_scale.ln();
        let ln_max = config.max_scale.ln();
        let neutral_pos = (-ln_min / (ln_max - ln_min)).clamp(0.0, 1.0);
        Self {
            config,
            zoom_pos: neutral_pos,
            neutral_pos,
            anchor: ZoomAnchor::Idle,
            pan: (0.0, 0.0),
            center: TileCoord::new(0, 0, 0),
        }
    }

    /// Current zoom log-position in [0, 1].
    #[must_use]
    pub const fn zoom_pos(&self) -> f32 {
        self.zoom_pos
    }

    /// The log-position that maps to scale 1.0.
    #[must_use]
    pub const fn neutral_pos(&self) -> f32 {
        self.neutral_pos
    }

    /// Sets the zoom log-position directly (clamped to [0, 1]).
    pub fn set_zoom_pos(&mut self, pos: f32) {
        self.zoom_pos = pos.clamp(0.0, 1.0);
    }

    /// Current pixels-per-tile scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        lerp(
            self.config.min_scale.ln(),
            self.config.max_scale.ln(),
            self.zoom_pos,
        )
        .exp()
    }

    /// Advances the zoom while a key is held.
    ///
    /// `direction` is +1 zooming in, -1 zooming out, 0 when no key is held
    /// (which ends the hold). On the first tick of a hold the current side
    /// of neutral is recorded; for the rest of that hold the position may
    /// approach neutral but not cross to the opposite side. The absolute
    /// [0, 1] clamp always applies.
    pub fn update_zoom(&mut self, direction: f32, dt: f32) {
        if direction == 0.0 {
            self.anchor = ZoomAnchor::Idle;
            return;
        }

        if self.anchor == ZoomAnchor::Idle {
            self.anchor = if self.zoom_pos > self.neutral_pos {
                ZoomAnchor::Above
            } else if self.zoom_pos < self.neutral_pos {
                ZoomAnchor::Below
            } else {
                ZoomAnchor::AtNeutral
            };
        }

        let pos = (self.zoom_pos + direction * self.config.zoom_rate * dt).clamp(0.0, 1.0);
        self.zoom_pos = match self.anchor {
            ZoomAnchor::Above => pos.max(self.neutral_pos),
            ZoomAnchor::Below => pos.min(self.neutral_pos),
            ZoomAnchor::AtNeutral | ZoomAnchor::Idle => pos,
        };
    }

    /// The tile the camera is centered on.
    #[must_use]
    pub const fn center(&self) -> TileCoord {
        self.center
    }

    /// Snaps the center onto a tile.
    pub fn set_center(&mut self, tile: TileCoord) {
        self.center = tile;
    }

    /// Current pan offset in tiles.
    #[must_use]
    pub const fn pan(&self) -> (f32, f32) {
        self.pan
    }

    /// Shifts the pan offset, clamping each axis to the configured maximum
    /// magnitude.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        let limit = self.config.max_pan;
        self.pan.0 = (self.pan.0 + dx).clamp(-limit, limit);
        self.pan.1 = (self.pan.1 + dy).clamp(-limit, limit);
    }

    /// The tile range covered by the screen at the reference tile size.
    ///
    /// `tile_px` is the non-animated reference size, so the range is stable
    /// across zoom animation. Half-extents are floored/ceiled outward.
    #[must_use]
    pub fn visible_tile_range(
        &self,
        screen_w: i32,
        screen_h: i32,
        tile_px: u32,
    ) -> (TileCoord, TileCoord) {
        let half_x = screen_w as f32 / tile_px as f32 / 2.0;
        let half_y = screen_h as f32 / tile_px as f32 / 2.0;
        let min = TileCoord::new(
            self.center.x - half_x.floor() as i32,
            self.center.y - half_y.floor() as i32,
            self.center.z,
        );
        let max = TileCoord::new(
            self.center.x + half_x.ceil() as i32,
            self.center.y + half_y.ceil() as i32,
            self.center.z,
        );
        (min, max)
    }

    /// The chunk range covered by the screen (inclusive on both ends).
    #[must_use]
    pub fn visible_chunk_range(
        &self,
        screen_w: i32,
        screen_h: i32,
        tile_px: u32,
        chunk_dim: u32,
    ) -> (ChunkCoord, ChunkCoord) {
        let (min_tile, max_tile) = self.visible_tile_range(screen_w, screen_h, tile_px);
        (
            min_tile.to_chunk_coord(chunk_dim),
            max_tile.to_chunk_coord(chunk_dim),
        )
    }

    /// Maps a tile to its Y-up screen pixel position (the bottom-left corner
    /// of the tile's cell).
    ///
    /// The center tile's cell lands centered on screen; the pan offset
    /// shifts everything by whole fractions of a tile.
    #[must_use]
    pub fn world_to_screen(
        &self,
        tile: TileCoord,
        tile_px: f32,
        screen_w: i32,
        screen_h: i32,
    ) -> (f32, f32) {
        let x = (tile.x - self.center.x) as f32 * tile_px - tile_px / 2.0
            + screen_w as f32 / 2.0
            + self.pan.0 * tile_px;
        let y = (tile.y - self.center.y) as f32 * tile_px - tile_px / 2.0
            + screen_h as f32 / 2.0
            + self.pan.1 * tile_px;
        (x, y)
    }
}
