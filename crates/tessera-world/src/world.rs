//! World facade: lazy chunk generation, entity spawning, movement.

use serde::{Deserialize, Serialize};
use tessera_arena::{Pool, PoolError};
use tessera_common::{ChunkCoord, TileCoord};
use tessera_worldgen::{GeneratorConfig, TerrainGenerator, TerrainKind};
use thiserror::Error;
use tracing::debug;

use crate::chunk::{Chunk, ChunkHandle, ChunkStore};
use crate::entity::{EntityHandle, EntityRecord};

/// World errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The entity pool's fixed capacity is exhausted.
    #[error("entity pool exhausted: {0}")]
    EntityPool(PoolError),
    /// The chunk pool's fixed capacity is exhausted.
    #[error("chunk pool exhausted: {0}")]
    ChunkPool(PoolError),
    /// A handle that must resolve did not (stale or foreign handle).
    #[error("entity handle did not resolve")]
    StaleEntity,
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;

/// World sizing configuration.
///
/// Capacities are fixed at construction; running out of records is an error
/// by design, recovered from by sizing generously, not by growing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunk footprint dimension in tiles
    pub chunk_dim: u32,
    /// Entity pool capacity
    pub entity_capacity: usize,
    /// Chunk pool capacity
    pub chunk_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_dim: 16,
            entity_capacity: 1 << 20,
            chunk_capacity: 4096,
        }
    }
}

/// The world: entity pool, chunk store, and terrain generator.
///
/// All state mutation happens through `&mut self` from a single frame driver;
/// there is no interior mutability and no concurrency.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    entities: Pool<EntityRecord>,
    chunks: ChunkStore,
    generator: TerrainGenerator,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new(config: WorldConfig, generator_config: GeneratorConfig) -> Self {
        Self {
            entities: Pool::with_capacity(config.entity_capacity),
            chunks: ChunkStore::with_capacity(config.chunk_capacity),
            generator: TerrainGenerator::new(generator_config),
            config,
        }
    }

    /// Chunk footprint dimension in tiles.
    #[must_use]
    pub const fn chunk_dim(&self) -> u32 {
        self.config.chunk_dim
    }

    /// Number of generated chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Resolves an entity handle.
    #[must_use]
    pub fn entity(&self, handle: EntityHandle) -> Option<&EntityRecord> {
        self.entities.get(handle)
    }

    /// Mutable entity handle resolution.
    pub fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut EntityRecord> {
        self.entities.get_mut(handle)
    }

    /// Spawns a standalone entity (not layered onto any tile).
    pub fn spawn(&mut self, record: EntityRecord) -> WorldResult<EntityHandle> {
        self.entities.insert(record).map_err(WorldError::EntityPool)
    }

    /// Layers an already-spawned entity onto the tile stack at its position.
    ///
    /// The containing chunk is generated first if absent.
    pub fn place(&mut self, handle: EntityHandle) -> WorldResult<()> {
        let tile = self
            .entity(handle)
            .ok_or(WorldError::StaleEntity)?
            .position;
        let chunk_handle = self.ensure_chunk(tile.to_chunk_coord(self.config.chunk_dim))?;
        let local = tile.to_local_coord(self.config.chunk_dim);
        if let Some(chunk) = self.chunks.get_mut(chunk_handle) {
            chunk.tile_mut(local).push(handle);
        }
        Ok(())
    }

    /// Resolves a chunk handle.
    #[must_use]
    pub fn chunk(&self, handle: ChunkHandle) -> Option<&Chunk> {
        self.chunks.get(handle)
    }

    /// Looks up a generated chunk by coordinate.
    #[must_use]
    pub fn chunk_at(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.handle_at(coord).and_then(|h| self.chunks.get(h))
    }

    /// Returns the chunk at a coordinate, generating it if absent.
    pub fn ensure_chunk(&mut self, coord: ChunkCoord) -> WorldResult<ChunkHandle> {
        if let Some(handle) = self.chunks.handle_at(coord) {
            return Ok(handle);
        }
        self.generate_chunk(coord)
    }

    /// Generates one chunk: one terrain entity per tile, classified by the
    /// continental and terrain fields at the tile's world position.
    fn generate_chunk(&mut self, coord: ChunkCoord) -> WorldResult<ChunkHandle> {
        let dim = self.config.chunk_dim;
        let base = coord.base_tile(dim);
        let mut chunk = Chunk::new(coord, dim);

        for local_y in 0..dim {
            for local_x in 0..dim {
                let tile = base.offset(local_x as i32, local_y as i32);
                let kind = self.generator.classify(tile);
                let look = self.generator.appearance(kind);

                let mut record =
                    EntityRecord::new(look.glyph, look.foreground, look.background, tile);
                if kind.is_blocking() {
                    record = record.with_blocking();
                }
                if kind.is_opaque() {
                    record = record.with_opaque();
                }

                let handle = self
                    .entities
                    .insert(record)
                    .map_err(WorldError::EntityPool)?;
                chunk
                    .tile_mut(tile.to_local_coord(dim))
                    .push(handle);
            }
        }

        let handle = self.chunks.insert(chunk).map_err(WorldError::ChunkPool)?;
        debug!(?coord, "generated chunk");
        Ok(handle)
    }

    /// Terrain category at a tile (deterministic; does not generate).
    #[must_use]
    pub fn terrain_at(&self, tile: TileCoord) -> TerrainKind {
        self.generator.classify(tile)
    }

    /// The topmost entity on a tile's stack, if the chunk is generated.
    #[must_use]
    pub fn topmost_at(&self, tile: TileCoord) -> Option<EntityHandle> {
        let chunk = self.chunk_at(tile.to_chunk_coord(self.config.chunk_dim))?;
        chunk.tile(tile.to_local_coord(self.config.chunk_dim)).topmost()
    }

    /// Whether any entity layered on the tile blocks movement.
    ///
    /// The containing chunk must be generated; ungenerated tiles read as
    /// open (movement ensures the target chunk first).
    #[must_use]
    pub fn is_blocked(&self, tile: TileCoord) -> bool {
        let Some(chunk) = self.chunk_at(tile.to_chunk_coord(self.config.chunk_dim)) else {
            return false;
        };
        chunk
            .tile(tile.to_local_coord(self.config.chunk_dim))
            .entries()
            .iter()
            .any(|&h| self.entities.get(h).is_some_and(|e| e.blocking))
    }

    /// Attempts a one-tile move. Generates the target chunk if needed, then
    /// applies the move unless the target tile blocks. Returns whether the
    /// entity moved.
    pub fn try_move(&mut self, handle: EntityHandle, dx: i32, dy: i32) -> WorldResult<bool> {
        let target = self
            .entity(handle)
            .ok_or(WorldError::StaleEntity)?
            .position
            .offset(dx, dy);

        self.ensure_chunk(target.to_chunk_coord(self.config.chunk_dim))?;
        if self.is_blocked(target) {
            return Ok(false);
        }

        if let Some(record) = self.entities.get_mut(handle) {
            record.position = target;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_common::Rgb;

    fn test_world(seed: u32) -> World {
        World::new(
            WorldConfig {
                chunk_dim: 16,
                entity_capacity: 1 << 16,
                chunk_capacity: 64,
            },
            GeneratorConfig {
                seed,
                ..GeneratorConfig::default()
            },
        )
    }

    #[test]
    fn ensure_chunk_is_idempotent() {
        let mut world = test_world(42);
        let coord = ChunkCoord::new(-1, 3, 0);
        let first = world.ensure_chunk(coord).expect("generate");
        let entities_after_first = world.entity_count();
        let second = world.ensure_chunk(coord).expect("lookup");
        assert_eq!(first, second);
        assert_eq!(world.chunk_count(), 1);
        assert_eq!(world.entity_count(), entities_after_first);
    }

    #[test]
    fn chunk_has_one_terrain_entity_per_tile() {
        let mut world = test_world(42);
        let handle = world.ensure_chunk(ChunkCoord::new(0, 0, 0)).expect("generate");
        let chunk = world.chunk(handle).expect("resolve");
        assert_eq!(chunk.tiles().len(), 16 * 16);
        assert!(chunk.tiles().iter().all(|stack| stack.entries().len() == 1));
        assert_eq!(world.entity_count(), 16 * 16);
    }

    #[test]
    fn regeneration_preserves_layout_but_not_variants() {
        let coord = ChunkCoord::new(2, -5, 0);
        let mut a = test_world(4242);
        let mut b = test_world(4242);
        let ha = a.ensure_chunk(coord).expect("generate");
        let hb = b.ensure_chunk(coord).expect("generate");

        let chunk_a = a.chunk(ha).expect("resolve");
        let chunk_b = b.chunk(hb).expect("resolve");
        for (stack_a, stack_b) in chunk_a.tiles().iter().zip(chunk_b.tiles()) {
            let ea = a.entity(stack_a.topmost().expect("terrain")).expect("record");
            let eb = b.entity(stack_b.topmost().expect("terrain")).expect("record");
            // Position, blocking, and category are deterministic; the
            // cosmetic glyph variant is allowed to differ.
            assert_eq!(ea.position, eb.position);
            assert_eq!(ea.blocking, eb.blocking);
            assert_eq!(a.terrain_at(ea.position), b.terrain_at(eb.position));
        }
    }

    #[test]
    fn blocked_tiles_reject_moves() {
        let mut world = test_world(7);
        let start = TileCoord::new(0, 0, 0);
        let player = world
            .spawn(EntityRecord::new(b'@', Rgb::WHITE, Rgb::BLACK, start))
            .expect("spawn");

        let wall = world
            .spawn(
                EntityRecord::new(b'#', Rgb::WHITE, Rgb::BLACK, start.offset(1, 0))
                    .with_blocking(),
            )
            .expect("spawn");
        world.place(wall).expect("place");

        assert!(world.is_blocked(start.offset(1, 0)));
        assert!(!world.try_move(player, 1, 0).expect("move attempt"));
        assert_eq!(world.entity(player).expect("record").position, start);
    }

    #[test]
    fn open_tiles_accept_moves_and_generate_chunks() {
        let mut world = test_world(7);
        let start = TileCoord::new(400, -900, 0);
        // Pick a start far from origin so the move generates fresh chunks.
        let walker = world
            .spawn(EntityRecord::new(b'@', Rgb::WHITE, Rgb::BLACK, start))
            .expect("spawn");

        let moved = world.try_move(walker, 0, 1).expect("move attempt");
        let target_open = !world.is_blocked(start.offset(0, 1));
        assert_eq!(moved, target_open);
        assert!(world.chunk_count() > 0);
    }

    #[test]
    fn topmost_prefers_later_layers() {
        let mut world = test_world(7);
        let tile = TileCoord::new(3, 3, 0);
        world
            .ensure_chunk(tile.to_chunk_coord(16))
            .expect("generate");
        let terrain = world.topmost_at(tile).expect("terrain entity");

        let decoration = world
            .spawn(EntityRecord::new(b'*', Rgb::WHITE, Rgb::BLACK, tile))
            .expect("spawn");
        world.place(decoration).expect("place");

        assert_eq!(world.topmost_at(tile), Some(decoration));
        assert_ne!(world.topmost_at(tile), Some(terrain));
    }
}
