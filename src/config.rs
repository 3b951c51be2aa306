//! Static world configuration
//!
//! Everything tunable is loaded once up front: seed, tile and grid sizing,
//! classifier thresholds, palettes and the optional explicit rule table.
//! `TileWorld::reload_config` swaps a new configuration in atomically.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::autotile::{Palette, RuleTable};
use crate::biome::ClassifierParams;
use crate::grid::TileId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration surface for one world.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Master noise seed
    pub seed: u64,
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Toroidal grid side length (the wrap period)
    pub grid_side: usize,
    /// Cells classified beyond the viewport on every side during `prepare`
    pub prefill_border: i32,
    /// Classifier thresholds and weights
    pub classifier: ClassifierParams,
    /// Grass tile variants, indexed by rounded vegetation intensity
    pub grass_variants: Vec<TileId>,
    /// Single tile for wall cells
    pub wall_tile: TileId,
    /// Palette for water cells edged against grass
    pub water_grass: Palette,
    /// Palette for loose-dirt cells edged against grass
    pub dirt_grass: Palette,
    /// Explicit rule-table entries; empty means the standard 8-neighbor set
    pub rule_entries: Vec<(u16, u8)>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tile_size: 32,
            grid_side: 1024,
            prefill_border: 2,
            classifier: ClassifierParams::default(),
            grass_variants: vec![118, 183, 182, 181],
            wall_tile: 249,
            water_grass: Palette::new([
                Some(391),
                Some(328),
                Some(327),
                Some(359),
                Some(296),
                Some(390),
                None,
                Some(358),
                Some(295),
                None,
                Some(392),
                Some(360),
                Some(423),
                Some(422),
                Some(424),
                Some(326),
            ]),
            dirt_grass: Palette::new([
                Some(385),
                Some(322),
                Some(321),
                Some(353),
                Some(290),
                Some(384),
                None,
                Some(352),
                Some(289),
                None,
                Some(386),
                Some(354),
                Some(417),
                Some(416),
                Some(418),
                Some(320),
            ]),
            rule_entries: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_side == 0 {
            return Err(ConfigError::Invalid("grid_side must be positive".into()));
        }
        if self.tile_size == 0 {
            return Err(ConfigError::Invalid("tile_size must be positive".into()));
        }
        if self.prefill_border < 1 {
            return Err(ConfigError::Invalid(
                "prefill_border must be at least 1".into(),
            ));
        }
        if self.grass_variants.is_empty() {
            return Err(ConfigError::Invalid(
                "grass_variants must not be empty".into(),
            ));
        }
        let c = &self.classifier;
        if c.noise_size <= 0.0 || c.elevation_size <= 0.0 {
            return Err(ConfigError::Invalid("noise sizes must be positive".into()));
        }
        let weight_sum = c.macro_weight + c.micro_weight;
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::Invalid(format!(
                "blend weights must sum to 1.0, got {weight_sum}"
            )));
        }
        Ok(())
    }

    /// The rule table this configuration describes.
    pub fn rule_table(&self) -> RuleTable {
        if self.rule_entries.is_empty() {
            RuleTable::standard8()
        } else {
            RuleTable::from_entries(&self.rule_entries)
        }
    }

    /// Tile selection data derived from this configuration.
    pub fn catalog(&self) -> TileCatalog {
        TileCatalog {
            grass_variants: self.grass_variants.clone(),
            wall_tile: self.wall_tile,
            water_grass: self.water_grass,
            dirt_grass: self.dirt_grass,
        }
    }
}

/// The per-biome tile selection data the grid and resolver consult.
#[derive(Clone, Debug)]
pub struct TileCatalog {
    pub grass_variants: Vec<TileId>,
    pub wall_tile: TileId,
    pub water_grass: Palette,
    pub dirt_grass: Palette,
}

impl TileCatalog {
    /// Palette for a transition pair. The pair set is closed, so this is a
    /// plain switch rather than open-ended dispatch.
    pub fn palette_for(&self, primary: crate::biome::Biome) -> Option<&Palette> {
        match primary {
            crate::biome::Biome::Water => Some(&self.water_grass),
            crate::biome::Biome::LooseDirt => Some(&self.dirt_grass),
            _ => None,
        }
    }
}
