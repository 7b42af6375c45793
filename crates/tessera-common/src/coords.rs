//! Coordinate types for tile, chunk, and local positions.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Tile coordinate in world space (one discrete grid cell).
///
/// The world is unbounded; tiles may have arbitrarily large negative or
/// positive coordinates. Y increases upward, Z selects a world layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct TileCoord {
    /// X coordinate in tile space
    pub x: i32,
    /// Y coordinate in tile space (up)
    pub y: i32,
    /// Z layer
    pub z: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this coordinate offset by (dx, dy) on the same layer.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z,
        }
    }

    /// Converts to the coordinate of the chunk containing this tile.
    ///
    /// Uses euclidean division so negative tiles land in the correct chunk
    /// (truncation toward zero would fold tiles -1..-dim into chunk 0).
    #[must_use]
    pub const fn to_chunk_coord(self, chunk_dim: u32) -> ChunkCoord {
        let dim = chunk_dim as i32;
        ChunkCoord {
            x: self.x.div_euclid(dim),
            y: self.y.div_euclid(dim),
            z: self.z,
        }
    }

    /// Converts to the local coordinate within the containing chunk.
    #[must_use]
    pub const fn to_local_coord(self, chunk_dim: u32) -> LocalCoord {
        let dim = chunk_dim as i32;
        LocalCoord {
            x: self.x.rem_euclid(dim) as u16,
            y: self.y.rem_euclid(dim) as u16,
        }
    }
}

/// Chunk coordinate (identifies one chunk in the world grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct ChunkCoord {
    /// X coordinate in chunk space
    pub x: i32,
    /// Y coordinate in chunk space
    pub y: i32,
    /// Z layer
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the tile coordinate of this chunk's leftmost/bottom corner.
    #[must_use]
    pub const fn base_tile(self, chunk_dim: u32) -> TileCoord {
        let dim = chunk_dim as i32;
        TileCoord {
            x: self.x * dim,
            y: self.y * dim,
            z: self.z,
        }
    }
}

/// Local coordinate within a chunk (0 to chunk_dim-1 on each axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct LocalCoord {
    /// X coordinate within the chunk
    pub x: u16,
    /// Y coordinate within the chunk
    pub y: u16,
}

impl LocalCoord {
    /// Creates a new local coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Converts to a linear index for array access.
    #[must_use]
    pub const fn to_index(self, chunk_dim: u32) -> usize {
        (self.y as usize) * (chunk_dim as usize) + (self.x as usize)
    }

    /// Creates from a linear index.
    #[must_use]
    pub const fn from_index(index: usize, chunk_dim: u32) -> Self {
        let dim = chunk_dim as usize;
        Self {
            x: (index % dim) as u16,
            y: (index / dim) as u16,
        }
    }
}
