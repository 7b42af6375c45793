//! Chunk records and the coordinate-indexed chunk store.

use ahash::AHashMap;
use tessera_arena::{Handle, Pool, PoolResult};
use tessera_common::{ChunkCoord, LocalCoord};

use crate::entity::EntityHandle;

/// Handle to a chunk record in the world's chunk pool.
pub type ChunkHandle = Handle<Chunk>;

/// Ordered entity layers on one tile, bottom-most first.
///
/// A tile may layer floor + decoration + occupant; only the topmost layer is
/// drawn. "Topmost" is an explicit query rather than an implicit link chain.
#[derive(Debug, Clone, Default)]
pub struct TileStack {
    entries: Vec<EntityHandle>,
}

impl TileStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Pushes an entity on top of the stack.
    pub fn push(&mut self, entity: EntityHandle) {
        self.entries.push(entity);
    }

    /// The entity drawn for this tile, if any.
    #[must_use]
    pub fn topmost(&self) -> Option<EntityHandle> {
        self.entries.last().copied()
    }

    /// All layers, bottom-most first.
    #[must_use]
    pub fn entries(&self) -> &[EntityHandle] {
        &self.entries
    }

    /// Returns whether the tile holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A fixed-footprint batch of tiles generated and cached as one unit.
#[derive(Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    dim: u32,
    tiles: Box<[TileStack]>,
}

impl Chunk {
    /// Creates an empty chunk with a `dim` x `dim` footprint.
    #[must_use]
    pub fn new(coord: ChunkCoord, dim: u32) -> Self {
        let tile_count = (dim * dim) as usize;
        Self {
            coord,
            dim,
            tiles: vec![TileStack::new(); tile_count].into_boxed_slice(),
        }
    }

    /// Returns the chunk coordinate.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Returns the footprint dimension in tiles.
    #[must_use]
    pub const fn dim(&self) -> u32 {
        self.dim
    }

    /// The tile stack at a local coordinate.
    #[must_use]
    pub fn tile(&self, local: LocalCoord) -> &TileStack {
        &self.tiles[local.to_index(self.dim)]
    }

    /// Mutable tile stack at a local coordinate.
    pub fn tile_mut(&mut self, local: LocalCoord) -> &mut TileStack {
        &mut self.tiles[local.to_index(self.dim)]
    }

    /// All tile stacks in row-major local order.
    #[must_use]
    pub fn tiles(&self) -> &[TileStack] {
        &self.tiles
    }
}

/// Chunk records in a stable pool, indexed by coordinate.
///
/// The hash index maps each coordinate to at most one chunk handle; pool
/// growth never moves records, so handles held elsewhere stay valid. Chunks
/// are never evicted.
#[derive(Debug)]
pub struct ChunkStore {
    pool: Pool<Chunk>,
    index: AHashMap<ChunkCoord, ChunkHandle>,
}

impl ChunkStore {
    /// Creates a store with a fixed chunk capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pool: Pool::with_capacity(capacity),
            index: AHashMap::with_capacity(capacity),
        }
    }

    /// Returns whether a chunk exists at the coordinate.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.index.contains_key(&coord)
    }

    /// Looks up the handle for a coordinate.
    #[must_use]
    pub fn handle_at(&self, coord: ChunkCoord) -> Option<ChunkHandle> {
        self.index.get(&coord).copied()
    }

    /// Resolves a chunk handle.
    #[must_use]
    pub fn get(&self, handle: ChunkHandle) -> Option<&Chunk> {
        self.pool.get(handle)
    }

    /// Mutable chunk handle resolution.
    pub fn get_mut(&mut self, handle: ChunkHandle) -> Option<&mut Chunk> {
        self.pool.get_mut(handle)
    }

    /// Inserts a freshly generated chunk.
    ///
    /// Callers must check [`ChunkStore::handle_at`] first; at most one chunk
    /// may exist per coordinate.
    pub fn insert(&mut self, chunk: Chunk) -> PoolResult<ChunkHandle> {
        debug_assert!(
            !self.index.contains_key(&chunk.coord()),
            "duplicate chunk at {:?}",
            chunk.coord()
        );
        let coord = chunk.coord();
        let handle = self.pool.insert(chunk)?;
        self.index.insert(coord, handle);
        Ok(handle)
    }

    /// Number of generated chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Returns whether no chunks have been generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_arena::Pool;
    use tessera_common::{Rgb, TileCoord};

    use crate::entity::EntityRecord;

    #[test]
    fn tile_stack_topmost_is_last_pushed() {
        let mut entities: Pool<EntityRecord> = Pool::with_capacity(4);
        let floor = entities
            .insert(EntityRecord::new(
                b'.',
                Rgb::WHITE,
                Rgb::BLACK,
                TileCoord::new(0, 0, 0),
            ))
            .expect("insert");
        let occupant = entities
            .insert(EntityRecord::new(
                b'@',
                Rgb::WHITE,
                Rgb::BLACK,
                TileCoord::new(0, 0, 0),
            ))
            .expect("insert");

        let mut stack = TileStack::new();
        assert!(stack.topmost().is_none());
        stack.push(floor);
        stack.push(occupant);
        assert_eq!(stack.topmost(), Some(occupant));
        assert_eq!(stack.entries(), &[floor, occupant]);
    }

    #[test]
    fn store_indexes_one_chunk_per_coord() {
        let mut store = ChunkStore::with_capacity(8);
        let coord = ChunkCoord::new(-1, 2, 0);
        assert!(!store.contains(coord));

        let handle = store.insert(Chunk::new(coord, 16)).expect("insert");
        assert!(store.contains(coord));
        assert_eq!(store.handle_at(coord), Some(handle));
        assert_eq!(store.get(handle).map(Chunk::coord), Some(coord));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn handles_stay_valid_as_the_store_grows() {
        let mut store = ChunkStore::with_capacity(64);
        let first = store
            .insert(Chunk::new(ChunkCoord::new(0, 0, 0), 16))
            .expect("insert");
        for i in 1..64 {
            store
                .insert(Chunk::new(ChunkCoord::new(i, 0, 0), 16))
                .expect("insert");
        }
        assert_eq!(
            store.get(first).map(Chunk::coord),
            Some(ChunkCoord::new(0, 0, 0))
        );
    }
}
