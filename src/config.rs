//! # Engine Configuration
//!
//! Serde-backed configuration for world dimensions, terrain and the linear heap.
//! Every field has a default, so a partial JSON document (or `{}`) is valid.
//!
//! ```
//! use voxel_world::{EngineConfig, TerrainMethod};
//!
//! let config = EngineConfig::from_json_str(
//!     r#"{ "world": { "cluster_size": 4 }, "terrain": { "method": "flat", "flat_height": 6 } }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.world.cluster_size, 4);
//! assert_eq!(config.terrain.method, TerrainMethod::Flat);
//! ```

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::coordinates::WorldDimensions;
use crate::engine_state::voxels::generation::elevation::{
    Elevation, FlatElevation, NoiseElevation,
};
use crate::error::ConfigError;

/// Default byte budget of the shared linear heap.
pub const DEFAULT_ALLOCATOR_CAPACITY: u64 = 32 * 1024 * 1024;

/// How the first generation pass decides column heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TerrainMethod {
    /// Simplex noise seeded by [`TerrainConfig::seed`].
    #[default]
    Noise,
    /// Every column is [`TerrainConfig::flat_height`] tall.
    Flat,
    /// Nothing is placed.
    Empty,
}

/// Terrain shaping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Height source.
    pub method: TerrainMethod,
    /// Noise seed.
    pub seed: u32,
    /// Column height for [`TerrainMethod::Flat`].
    pub flat_height: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            method: TerrainMethod::Noise,
            seed: 0,
            flat_height: 0,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World layout.
    pub world: WorldDimensions,
    /// Terrain shaping.
    pub terrain: TerrainConfig,
    /// Byte budget of the linear heap backing every mesh buffer.
    pub allocator_capacity: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            world: WorldDimensions::default(),
            terrain: TerrainConfig::default(),
            allocator_capacity: DEFAULT_ALLOCATOR_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());

        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks the world dimensions and the heap budget.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;

        if self.allocator_capacity == 0 {
            return Err(ConfigError::Invalid(
                "allocator_capacity must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Builds the elevation source selected by the terrain configuration.
    pub fn build_elevation(&self) -> Box<dyn Elevation> {
        match self.terrain.method {
            TerrainMethod::Noise => Box::new(NoiseElevation::new(self.terrain.seed, self.world)),
            TerrainMethod::Flat => Box::new(FlatElevation(self.terrain.flat_height)),
            TerrainMethod::Empty => Box::new(FlatElevation(0)),
        }
    }
}
