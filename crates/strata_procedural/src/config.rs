//! # World Configuration
//!
//! Seed, block table, terrain shape and camera tuning, loaded from TOML.
//!
//! ```toml
//! seed = 18125.25
//! blocks = ["grass", "dirt", "stone", "sand"]
//!
//! [terrain]
//! surface_amplitude = 30.0
//!
//! [camera]
//! resolution = 3
//! ```
//!
//! `blocks` may also be a table of explicit identifiers:
//!
//! ```toml
//! [blocks]
//! grass = 2
//! dirt = 1
//! stone = 7
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::blocks::BlockTable;
use crate::camera::CameraParams;
use crate::error::{WorldError, WorldResult};
use crate::noise::WorldSeed;
use crate::terrain::TerrainParams;

/// Where block identifiers come from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockSource {
    /// Names assigned `1, 2, 3, ...` in order.
    Names(Vec<String>),
    /// Explicit name → identifier map.
    Table(BlockTable),
}

impl Default for BlockSource {
    fn default() -> Self {
        Self::Names(BlockTable::REQUIRED.iter().map(|&name| name.to_owned()).collect())
    }
}

impl BlockSource {
    /// Resolves the source into a table.
    #[must_use]
    pub fn to_table(&self) -> BlockTable {
        match self {
            Self::Names(names) => BlockTable::from_names(names.iter().cloned()),
            Self::Table(table) => table.clone(),
        }
    }
}

/// Everything needed to start a world.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed (None = random).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<WorldSeed>,
    /// Block identifiers.
    pub blocks: BlockSource,
    /// Terrain shape.
    pub terrain: TerrainParams,
    /// Camera tuning.
    pub camera: CameraParams,
}

impl WorldConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ConfigParse`] on malformed input, or the
    /// error from [`WorldConfig::validate`].
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that parse but cannot drive a world.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NonFiniteSeed`] or [`WorldError::InvalidCamera`].
    pub fn validate(&self) -> WorldResult<()> {
        if let Some(seed) = self.seed.filter(|seed| !seed.value().is_finite()) {
            return Err(WorldError::NonFiniteSeed(seed.value()));
        }
        self.camera.validate()
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load_from<P: AsRef<Path>>(path: P) -> WorldResult<Self> {
        let path = path.as_ref();
        let config = Self::from_toml_str(&fs::read_to_string(path)?)?;
        info!("Loaded world config from {}", path.display());
        Ok(config)
    }

    /// Loads a configuration file, falling back to defaults on any failure.
    #[must_use]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }
        Self::load_from(path).unwrap_or_else(|e| {
            warn!("Failed to load {}: {e}", path.display());
            Self::default()
        })
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ConfigSerialize`] if serialization fails.
    pub fn to_toml_string(&self) -> WorldResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Writes the configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails if serialization or any file operation fails.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> WorldResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        info!("Saved world config to {}", path.display());
        Ok(())
    }

    /// Returns the configured seed or draws a random one.
    #[must_use]
    pub fn seed_or_generate(&self) -> WorldSeed {
        self.seed.unwrap_or_else(WorldSeed::generate)
    }

    /// Returns the configured block table.
    #[must_use]
    pub fn block_table(&self) -> BlockTable {
        self.blocks.to_table()
    }
}
