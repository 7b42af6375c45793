//! Entity records.

use tessera_arena::Handle;
use tessera_common::{Rgb, TileCoord};

/// Handle to an entity record in the world's entity pool.
pub type EntityHandle = Handle<EntityRecord>;

/// One entity in the world: a glyph, a color pair, and a tile position.
///
/// Records are created during chunk generation or world setup and live for
/// the process's lifetime; there is no delete path in steady state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityRecord {
    /// Glyph code selecting a cell in the font atlas
    pub glyph: u8,
    /// Foreground (ink) color
    pub foreground: Rgb,
    /// Background (paper) color
    pub background: Rgb,
    /// Tile position
    pub position: TileCoord,
    /// Whether the entity blocks movement into its tile
    pub blocking: bool,
    /// Whether the entity blocks sight. Reserved: no visibility algorithm
    /// consumes this yet.
    pub opaque: bool,
}

impl EntityRecord {
    /// Creates a passable, transparent entity.
    #[must_use]
    pub const fn new(glyph: u8, foreground: Rgb, background: Rgb, position: TileCoord) -> Self {
        Self {
            glyph,
            foreground,
            background,
            position,
            blocking: false,
            opaque: false,
        }
    }

    /// Returns the record with the blocking flag set.
    #[must_use]
    pub const fn with_blocking(mut self) -> Self {
        self.blocking = true;
        self
    }

    /// Returns the record with the opaque flag set.
    #[must_use]
    pub const fn with_opaque(mut self) -> Self {
        self.opaque = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_flags() {
        let record = EntityRecord::new(b'@', Rgb::WHITE, Rgb::BLACK, TileCoord::new(0, 0, 0));
        assert!(!record.blocking);
        assert!(!record.opaque);

        let wall = record.with_blocking().with_opaque();
        assert!(wall.blocking);
        assert!(wall.opaque);
    }
}
