//! # Tessera Common
//!
//! Common types shared across all Tessera subsystems:
//! - Coordinate types (tile, chunk, local)
//! - Linear RGB color
//! - Integer pixel rectangles
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod coords;
pub mod rect;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::coords::*;
    pub use crate::rect::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_chunk_local_conversion() {
        let tile = TileCoord::new(100, 200, 0);
        let chunk = tile.to_chunk_coord(16);
        let local = tile.to_local_coord(16);

        assert_eq!(chunk, ChunkCoord::new(6, 12, 0));
        assert_eq!(local, LocalCoord::new(4, 8));
    }
}
