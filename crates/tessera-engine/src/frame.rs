//! The per-tick frame driver.
//!
//! One `Engine::frame` call runs a whole tick in a fixed order: input →
//! movement/collision → camera update → chunk-ensure → render. All mutable
//! state (world, camera, scratch arena) is owned here and touched by nothing
//! else; the platform boundary supplies the input snapshot and framebuffer
//! and observes the quit flag.

use tessera_arena::{Arena, ArenaError};
use tessera_common::{ChunkCoord, Rect, Rgb, TileCoord};
use tessera_render::{draw_glyph, Camera, FontAtlas, ImageMut, RasterError};
use tessera_world::{EntityHandle, EntityRecord, World, WorldError};
use thiserror::Error;
use tracing::info;

use crate::config::EngineConfig;
use crate::input::{InputState, KeyCode, MouseButton};

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// World/generation failure
    #[error("world error: {0}")]
    World(#[from] WorldError),
    /// Rasterizer failure
    #[error("raster error: {0}")]
    Raster(#[from] RasterError),
    /// Scratch arena failure
    #[error("arena error: {0}")]
    Arena(#[from] ArenaError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Movement bindings: roguelike HJKL + YUBN diagonals, plus arrow keys for
/// the cardinals. Offsets are in Y-up tile space.
const MOVE_BINDINGS: [(KeyCode, (i32, i32)); 12] = [
    (KeyCode::H, (-1, 0)),
    (KeyCode::L, (1, 0)),
    (KeyCode::K, (0, 1)),
    (KeyCode::J, (0, -1)),
    (KeyCode::Y, (-1, 1)),
    (KeyCode::U, (1, 1)),
    (KeyCode::B, (-1, -1)),
    (KeyCode::N, (1, -1)),
    (KeyCode::Left, (-1, 0)),
    (KeyCode::Right, (1, 0)),
    (KeyCode::Up, (0, 1)),
    (KeyCode::Down, (0, -1)),
];

const ZOOM_IN_KEY: KeyCode = KeyCode::Z;
const ZOOM_OUT_KEY: KeyCode = KeyCode::X;
const QUIT_KEY: KeyCode = KeyCode::Escape;
const PAN_BUTTON: MouseButton = MouseButton::Right;

const PLAYER_GLYPH: u8 = b'@';
const COMPANION_GLYPH: u8 = b'd';

/// The engine: owns the world, camera, font, and scratch memory, and
/// advances them one frame at a time.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    world: World,
    camera: Camera,
    font: FontAtlas,
    frame_arena: Arena,
    player: EntityHandle,
    companion: EntityHandle,
    quit: bool,
}

impl Engine {
    /// Creates the engine: world and pools, tracked player plus companion,
    /// and every chunk in the initially visible range (using the configured
    /// window size as the reference surface).
    pub fn new(config: EngineConfig, font: FontAtlas) -> EngineResult<Self> {
        let mut world = World::new(config.world.clone(), config.generator.clone());

        let spawn_tile = TileCoord::new(0, 0, 0);
        let player = world.spawn(
            EntityRecord::new(PLAYER_GLYPH, Rgb::WHITE, Rgb::BLACK, spawn_tile).with_blocking(),
        )?;
        let companion = world.spawn(EntityRecord::new(
            COMPANION_GLYPH,
            Rgb::new(0.85, 0.65, 0.30),
            Rgb::BLACK,
            spawn_tile.offset(1, -1),
        ))?;

        let mut camera = Camera::new(config.camera.clone());
        camera.set_center(spawn_tile);

        let mut engine = Self {
            frame_arena: Arena::with_capacity(config.frame_arena_bytes),
            config,
            world,
            camera,
            font,
            player,
            companion,
            quit: false,
        };

        let (min_chunk, max_chunk) = engine.camera.visible_chunk_range(
            engine.config.window_width as i32,
            engine.config.window_height as i32,
            engine.config.tile_px,
            engine.world.chunk_dim(),
        );
        engine.ensure_chunks(min_chunk, max_chunk)?;

        info!(
            chunks = engine.world.chunk_count(),
            entities = engine.world.entity_count(),
            "engine initialized"
        );
        Ok(engine)
    }

    /// Whether a quit has been requested. Observed by the outer loop.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.quit
    }

    /// The world state.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// The camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The tracked player entity.
    #[must_use]
    pub const fn player(&self) -> EntityHandle {
        self.player
    }

    /// Advances one frame: movement, camera, lazy generation, rendering.
    pub fn frame(&mut self, input: &mut InputState, frame: &mut ImageMut<'_>) -> EngineResult<()> {
        let dt = input.delta_time();

        if input.just_pressed(QUIT_KEY) {
            self.quit = true;
        }

        // Movement: each accepted repeat event is a one-tile attempt.
        for (key, (dx, dy)) in MOVE_BINDINGS {
            if input.repeat(key) {
                self.world.try_move(self.player, dx, dy)?;
            }
        }

        // Camera: snap to the player, then apply pan and zoom holds.
        if let Some(player) = self.world.entity(self.player) {
            self.camera.set_center(player.position);
        }
        if input.mouse_down(PAN_BUTTON) {
            let (dx, dy) = input.mouse_logical_delta();
            let tile_px = self.config.tile_px as f32 * self.camera.scale();
            // Screen-space drag is Y-down; pan lives in Y-up tile space.
            self.camera.pan_by(dx / tile_px, -dy / tile_px);
        }
        let mut zoom_dir = 0.0;
        if input.is_down(ZOOM_IN_KEY) {
            zoom_dir += 1.0;
        }
        if input.is_down(ZOOM_OUT_KEY) {
            zoom_dir -= 1.0;
        }
        self.camera.update_zoom(zoom_dir, dt);

        // Lazy generation over the visible range, then draw.
        let (min_chunk, max_chunk) = self.camera.visible_chunk_range(
            frame.width(),
            frame.height(),
            self.config.tile_px,
            self.world.chunk_dim(),
        );
        self.ensure_chunks(min_chunk, max_chunk)?;
        self.render(min_chunk, max_chunk, frame)?;

        Ok(())
    }

    /// Generates every absent chunk in the inclusive coordinate range.
    ///
    /// The coordinate list lives in the frame arena under a freeze mark, so
    /// the scratch memory is reclaimed wholesale at the end of the pass.
    fn ensure_chunks(&mut self, min: ChunkCoord, max: ChunkCoord) -> EngineResult<()> {
        self.frame_arena.freeze()?;
        let result = self.ensure_chunks_inner(min, max);
        self.frame_arena.unfreeze()?;
        result
    }

    fn ensure_chunks_inner(&mut self, min: ChunkCoord, max: ChunkCoord) -> EngineResult<()> {
        let count = ((max.x - min.x + 1) * (max.y - min.y + 1)) as usize;
        let span = self.frame_arena.alloc_array::<ChunkCoord>(count)?;

        let coords = self.frame_arena.slice_mut::<ChunkCoord>(span);
        let mut i = 0;
        for cy in min.y..=max.y {
            for cx in min.x..=max.x {
                coords[i] = ChunkCoord::new(cx, cy, min.z);
                i += 1;
            }
        }

        for i in 0..count {
            let coord = self.frame_arena.slice::<ChunkCoord>(span)[i];
            self.world.ensure_chunk(coord)?;
        }
        Ok(())
    }

    /// Draws every in-range chunk tile's topmost entity, then the standalone
    /// entities on top.
    fn render(
        &self,
        min: ChunkCoord,
        max: ChunkCoord,
        frame: &mut ImageMut<'_>,
    ) -> EngineResult<()> {
        frame.fill(Rgb::BLACK.to_rgba());
        let tile_px = self.config.tile_px as f32 * self.camera.scale();

        for cy in min.y..=max.y {
            for cx in min.x..=max.x {
                let Some(chunk) = self.world.chunk_at(ChunkCoord::new(cx, cy, min.z)) else {
                    continue;
                };
                for stack in chunk.tiles() {
                    let Some(handle) = stack.topmost() else {
                        continue;
                    };
                    if let Some(record) = self.world.entity(handle) {
                        self.draw_record(record, tile_px, frame)?;
                    }
                }
            }
        }

        for handle in [self.companion, self.player] {
            if let Some(record) = self.world.entity(handle) {
                self.draw_record(record, tile_px, frame)?;
            }
        }
        Ok(())
    }

    /// Draws one entity's glyph cell at its tile position.
    fn draw_record(
        &self,
        record: &EntityRecord,
        tile_px: f32,
        frame: &mut ImageMut<'_>,
    ) -> EngineResult<()> {
        let (x, y) =
            self.camera
                .world_to_screen(record.position, tile_px, frame.width(), frame.height());
        let size = tile_px.round().max(1.0) as i32;
        let dest = Rect::new(x.floor() as i32, y.floor() as i32, size, size);
        draw_glyph(
            &self.font,
            record.glyph,
            frame,
            dest,
            record.foreground,
            record.background,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_render::Image;
    use tessera_world::WorldConfig;
    use tessera_worldgen::GeneratorConfig;

    /// A 16x16-cell atlas with 2x2 fully-covered cells.
    fn test_font() -> FontAtlas {
        let mut image = Image::new(32, 32);
        image.pixels_mut().fill(0xFFFF_FFFF);
        FontAtlas::new(image, 16, 16).expect("atlas")
    }

    fn test_config() -> EngineConfig {
        EngineConfig {
            window_width: 64,
            window_height: 64,
            tile_px: 8,
            world: WorldConfig {
                chunk_dim: 16,
                entity_capacity: 1 << 16,
                chunk_capacity: 256,
            },
            generator: GeneratorConfig {
                seed: 12345,
                ..GeneratorConfig::default()
            },
            ..EngineConfig::default()
        }
    }

    fn test_input() -> InputState {
        let mut input = InputState::new(0.25, 0.05);
        input.set_delta_time(1.0 / 60.0);
        input
    }

    #[test]
    fn init_generates_the_visible_range() {
        let engine = Engine::new(test_config(), test_font()).expect("engine");
        // 64px surface at 8px tiles spans 9 tiles around the origin, which
        // touches four chunks at dimension 16.
        assert_eq!(engine.world().chunk_count(), 4);
        assert_eq!(
            engine.world().entity_count(),
            4 * 16 * 16 + 2 // terrain plus player and companion
        );
    }

    #[test]
    fn frame_renders_into_the_framebuffer() {
        let mut engine = Engine::new(test_config(), test_font()).expect("engine");
        let mut pixels = vec![0u32; 64 * 64];
        let mut frame = ImageMut::from_pixels(&mut pixels, 64, 64).expect("view");
        let mut input = test_input();

        engine.frame(&mut input, &mut frame).expect("frame");
        // Every pixel was written opaque, and terrain backgrounds differ
        // from the clear color.
        assert!(pixels.iter().all(|&p| p & 0xFF == 0xFF));
        assert!(pixels.iter().any(|&p| p != Rgb::BLACK.to_rgba()));
    }

    #[test]
    fn movement_respects_terrain_blocking() {
        let mut engine = Engine::new(test_config(), test_font()).expect("engine");
        let start = engine
            .world()
            .entity(engine.player())
            .expect("player")
            .position;
        let target = start.offset(1, 0);
        let target_open = !engine.world().terrain_at(target).is_blocking();

        let mut pixels = vec![0u32; 64 * 64];
        let mut frame = ImageMut::from_pixels(&mut pixels, 64, 64).expect("view");
        let mut input = test_input();
        input.set_key(KeyCode::L, true);

        engine.frame(&mut input, &mut frame).expect("frame");
        let end = engine
            .world()
            .entity(engine.player())
            .expect("player")
            .position;
        if target_open {
            assert_eq!(end, target);
            // The camera snaps to the player with no smoothing.
            assert_eq!(engine.camera().center(), target);
        } else {
            assert_eq!(end, start);
        }
    }

    #[test]
    fn a_wider_viewport_generates_more_chunks() {
        let mut engine = Engine::new(test_config(), test_font()).expect("engine");
        let before = engine.world().chunk_count();
        assert_eq!(before, 4);

        // A 256px surface at 8px tiles spans tiles -16..=16, touching nine
        // chunks; the frame generates the five that are still absent.
        let mut input = test_input();
        let mut pixels = vec![0u32; 256 * 256];
        let mut frame = ImageMut::from_pixels(&mut pixels, 256, 256).expect("view");
        engine.frame(&mut input, &mut frame).expect("frame");
        assert_eq!(engine.world().chunk_count(), 9);
    }

    #[test]
    fn escape_requests_quit() {
        let mut engine = Engine::new(test_config(), test_font()).expect("engine");
        assert!(!engine.should_quit());

        let mut input = test_input();
        input.set_key(KeyCode::Escape, true);
        let mut pixels = vec![0u32; 64 * 64];
        let mut frame = ImageMut::from_pixels(&mut pixels, 64, 64).expect("view");
        engine.frame(&mut input, &mut frame).expect("frame");
        assert!(engine.should_quit());
    }

    #[test]
    fn held_zoom_key_changes_scale() {
        let mut engine = Engine::new(test_config(), test_font()).expect("engine");
        let before = engine.camera().scale();

        let mut input = test_input();
        input.set_delta_time(0.1);
        input.set_key(KeyCode::Z, true);
        let mut pixels = vec![0u32; 64 * 64];
        let mut frame = ImageMut::from_pixels(&mut pixels, 64, 64).expect("view");
        engine.frame(&mut input, &mut frame).expect("frame");
        assert!(engine.camera().scale() > before);
    }

    #[test]
    fn pan_applies_while_the_button_is_held() {
        let mut engine = Engine::new(test_config(), test_font()).expect("engine");
        let mut input = test_input();
        input.set_mouse_button(MouseButton::Right, true);
        input.set_mouse_delta((4, 0), (4.0, 0.0));

        let mut pixels = vec![0u32; 64 * 64];
        let mut frame = ImageMut::from_pixels(&mut pixels, 64, 64).expect("view");
        engine.frame(&mut input, &mut frame).expect("frame");
        assert!(engine.camera().pan().0 > 0.0);
        assert_eq!(engine.camera().pan().1, 0.0);
    }
}
