//! Terrain classification from layered noise fields.

use serde::{Deserialize, Serialize};
use tessera_common::{Rgb, TileCoord};
use tracing::info;

use crate::field::NoiseField;

/// Terrain category of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Open water; passable.
    Water,
    /// Grassland; passable. The fallback category.
    Grass,
    /// Mountain; blocks movement and sight.
    Mountain,
}

impl TerrainKind {
    /// Whether this terrain blocks movement.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Mountain)
    }

    /// Whether this terrain blocks sight.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        matches!(self, Self::Mountain)
    }
}

/// Classifies a tile from its two normalized field samples.
///
/// The check order is load-bearing: water wins over mountain when both
/// conditions hold, and grass is strictly the fallback.
#[must_use]
pub fn classify_fields(continental: f64, terrain: f64) -> TerrainKind {
    if continental < 0.5 || terrain <= 0.4 {
        TerrainKind::Water
    } else if terrain >= 0.6 {
        TerrainKind::Mountain
    } else {
        TerrainKind::Grass
    }
}

/// How a terrain tile renders: glyph cell plus color pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileAppearance {
    /// Glyph code selecting a font-atlas cell
    pub glyph: u8,
    /// Foreground (ink) color
    pub foreground: Rgb,
    /// Background (paper) color
    pub background: Rgb,
}

/// Two cosmetic glyph variants per category.
const WATER_GLYPHS: [u8; 2] = [b'~', b'='];
const GRASS_GLYPHS: [u8; 2] = [b'.', b','];
const MOUNTAIN_GLYPHS: [u8; 2] = [b'^', b'#'];

const WATER_FG: Rgb = Rgb::new(0.33, 0.55, 0.85);
const WATER_BG: Rgb = Rgb::new(0.05, 0.10, 0.25);
const GRASS_FG: Rgb = Rgb::new(0.35, 0.62, 0.28);
const GRASS_BG: Rgb = Rgb::new(0.07, 0.15, 0.05);
const MOUNTAIN_FG: Rgb = Rgb::new(0.66, 0.63, 0.58);
const MOUNTAIN_BG: Rgb = Rgb::new(0.16, 0.15, 0.14);

/// World generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// World seed
    pub seed: u32,
    /// Continental field scale in tiles (larger = broader landmasses)
    pub continental_scale: f64,
    /// Terrain field scale in tiles
    pub terrain_scale: f64,
    /// Octave count for the continental field
    pub continental_octaves: u32,
    /// Octave count for the terrain field
    pub terrain_octaves: u32,
    /// Per-octave frequency multiplier
    pub lacunarity: f64,
    /// Per-octave amplitude multiplier
    pub gain: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            continental_scale: 192.0,
            terrain_scale: 48.0,
            continental_octaves: 4,
            terrain_octaves: 6,
            lacunarity: 1.8,
            gain: 0.5,
        }
    }
}

/// Procedural terrain generator.
///
/// Classification is fully deterministic from (seed, tile position); the
/// cosmetic glyph-variant pick runs on a separate non-deterministic
/// generator, so regenerating a chunk preserves terrain layout but may swap
/// variants.
#[derive(Debug)]
pub struct TerrainGenerator {
    config: GeneratorConfig,
    continental: NoiseField,
    terrain: NoiseField,
    cosmetic: fastrand::Rng,
}

impl TerrainGenerator {
    /// Creates a generator with the given config.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let continental = NoiseField::new(config.seed);
        let terrain = NoiseField::new(config.seed.wrapping_add(1));
        info!(seed = config.seed, "terrain generator initialized");
        Self {
            config,
            continental,
            terrain,
            cosmetic: fastrand::Rng::new(),
        }
    }

    /// Creates a generator with default config and the given seed.
    #[must_use]
    pub fn with_seed(seed: u32) -> Self {
        Self::new(GeneratorConfig {
            seed,
            ..GeneratorConfig::default()
        })
    }

    /// Returns the generator configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Normalized continental sample at a tile.
    #[must_use]
    pub fn continental_at(&self, tile: TileCoord) -> f64 {
        self.continental.sample_octaves(
            f64::from(tile.x) / self.config.continental_scale,
            f64::from(tile.y) / self.config.continental_scale,
            self.config.continental_octaves,
            self.config.lacunarity,
            self.config.gain,
        )
    }

    /// Normalized terrain sample at a tile.
    #[must_use]
    pub fn terrain_at(&self, tile: TileCoord) -> f64 {
        self.terrain.sample_octaves(
            f64::from(tile.x) / self.config.terrain_scale,
            f64::from(tile.y) / self.config.terrain_scale,
            self.config.terrain_octaves,
            self.config.lacunarity,
            self.config.gain,
        )
    }

    /// Classifies the terrain at a tile. Deterministic.
    #[must_use]
    pub fn classify(&self, tile: TileCoord) -> TerrainKind {
        classify_fields(self.continental_at(tile), self.terrain_at(tile))
    }

    /// Picks a rendering for a terrain category, choosing one of its two
    /// cosmetic glyph variants uniformly at random.
    pub fn appearance(&mut self, kind: TerrainKind) -> TileAppearance {
        let variant = usize::from(self.cosmetic.bool());
        match kind {
            TerrainKind::Water => TileAppearance {
                glyph: WATER_GLYPHS[variant],
                foreground: WATER_FG,
                background: WATER_BG,
            },
            TerrainKind::Grass => TileAppearance {
                glyph: GRASS_GLYPHS[variant],
                foreground: GRASS_FG,
                background: GRASS_BG,
            },
            TerrainKind::Mountain => TileAppearance {
                glyph: MOUNTAIN_GLYPHS[variant],
                foreground: MOUNTAIN_FG,
                background: MOUNTAIN_BG,
            },
        }
    }
}
