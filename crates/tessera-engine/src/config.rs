//! Engine configuration.
//!
//! Configurable parameters for the window reference size, world sizing,
//! generation, camera, rendering, and input. Configuration can be loaded
//! from and saved to a TOML file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tessera_render::CameraConfig;
use tessera_world::WorldConfig;
use tessera_worldgen::GeneratorConfig;
use thiserror::Error;
use tracing::{info, warn};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed.
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file did not parse as TOML.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config did not serialize to TOML.
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Window Settings ===
    /// Reference surface width in pixels, used for initial chunk generation
    /// before the first framebuffer arrives
    pub window_width: u32,
    /// Reference surface height in pixels
    pub window_height: u32,

    // === World Settings ===
    /// World sizing (chunk dimension, pool capacities)
    pub world: WorldConfig,
    /// Terrain generation parameters
    pub generator: GeneratorConfig,

    // === Camera Settings ===
    /// Zoom range, zoom rate, and pan limit
    pub camera: CameraConfig,

    // === Rendering Settings ===
    /// Reference tile size in pixels at scale 1.0
    pub tile_px: u32,
    /// Font atlas grid columns
    pub atlas_cols: u32,
    /// Font atlas grid rows
    pub atlas_rows: u32,

    // === Input Settings ===
    /// Seconds a key must be held before it starts repeating
    pub key_repeat_delay: f32,
    /// Seconds between repeats once repeating
    pub key_repeat_period: f32,

    // === Memory Settings ===
    /// Per-frame scratch arena capacity in bytes
    pub frame_arena_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            world: WorldConfig::default(),
            generator: GeneratorConfig::default(),
            camera: CameraConfig::default(),
            tile_px: 48,
            atlas_cols: 16,
            atlas_rows: 16,
            key_repeat_delay: 0.25,
            key_repeat_period: 0.05,
            frame_arena_bytes: 1 << 20,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&text)?;
        info!(path = %path.as_ref().display(), "loaded config");
        Ok(config)
    }

    /// Loads configuration, falling back to defaults when the file is
    /// missing or invalid.
    #[must_use]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.as_ref().display(), "using default config: {e}");
                Self::default()
            },
        }
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), text)?;
        info!(path = %path.as_ref().display(), "saved config");
        Ok(())
    }
}
