//! World facade consumed by the renderer
//!
//! One `TileWorld` owns the classified grid, the rule table and optionally
//! the sliced atlas. A renderer calls `prepare` once per frame with the
//! visible viewport, then `get_tile` for each visible cell; steady-state
//! scrolling only performs lookups.

use image::RgbaImage;
use log::info;

use crate::atlas::TileAtlas;
use crate::autotile::{AutotileResolver, RuleTable};
use crate::biome::{Biome, BiomeClassifier};
use crate::config::{ConfigError, WorldConfig};
use crate::grid::{BiomeGrid, Rect, TileId};
use crate::seeds::WorldSeeds;

/// The only layer this engine populates.
pub const BASE_LAYER: u32 = 0;

pub struct TileWorld {
    config: WorldConfig,
    grid: BiomeGrid,
    rules: RuleTable,
    atlas: Option<TileAtlas>,
}

impl TileWorld {
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = BiomeGrid::new(
            config.grid_side,
            Self::classifier_from(&config),
            config.catalog(),
        );
        let rules = config.rule_table();
        Ok(Self {
            config,
            grid,
            rules,
            atlas: None,
        })
    }

    /// Attach a sliced atlas so `get_tile` can return pixel data.
    pub fn with_atlas(mut self, atlas: TileAtlas) -> Self {
        self.atlas = Some(atlas);
        self
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn grid(&self) -> &BiomeGrid {
        &self.grid
    }

    fn classifier_from(config: &WorldConfig) -> BiomeClassifier {
        BiomeClassifier::new(WorldSeeds::from_master(config.seed), config.classifier)
    }

    /// Classify and edge-resolve everything in and around the viewport.
    ///
    /// Call once per frame before any `get_tile`. The viewport is expanded
    /// by the configured pre-fill border so scrolling stays on cache hits;
    /// already-classified cells cost nothing.
    pub fn prepare(&mut self, viewport: Rect) {
        let region = viewport.expand(self.config.prefill_border);
        self.grid.ensure_window(region);

        // Edge pass: one resolver (and thus one scanline cache) per row.
        for y in region.y..region.bottom() {
            let mut resolver = AutotileResolver::new(&self.rules);
            for x in region.x..region.right() {
                let biome = self.grid.biome_at(x, y);
                let Some(pair) = biome.edge_pair() else {
                    continue;
                };
                let Some(&palette) = self.grid.catalog().palette_for(biome) else {
                    continue;
                };
                let tile = resolver.resolve_edge(&self.grid, x, y, pair, &palette);
                self.grid.set_tile(x, y, tile);
            }
        }
    }

    /// Tile image for a cell, or `None` for unpopulated layers, a missing
    /// atlas, or an id outside the atlas. Expects the cell's window to have
    /// been `prepare`d this frame.
    pub fn get_tile(&self, x: i32, y: i32, layer: u32) -> Option<&RgbaImage> {
        if layer != BASE_LAYER {
            return None;
        }
        self.atlas.as_ref()?.get(self.grid.tile_at(x, y))
    }

    /// Headless variant of `get_tile`: the atlas index for a cell.
    pub fn tile_id(&self, x: i32, y: i32) -> TileId {
        self.grid.tile_at(x, y)
    }

    pub fn biome_at(&self, x: i32, y: i32) -> Biome {
        self.grid.biome_at(x, y)
    }

    /// Atomically swap in a new configuration; the grid is invalidated and
    /// refills on the next `prepare`.
    pub fn reload_config(&mut self, config: WorldConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let classifier = Self::classifier_from(&config);
        if config.grid_side == self.config.grid_side {
            self.grid.reset(classifier, config.catalog());
        } else {
            self.grid = BiomeGrid::new(config.grid_side, classifier, config.catalog());
        }
        self.rules = config.rule_table();
        info!(
            "configuration reloaded (seed {}, grid side {})",
            config.seed, config.grid_side
        );
        self.config = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autotile::{self, Palette};
    use image::DynamicImage;

    fn world() -> TileWorld {
        TileWorld::new(WorldConfig::default()).unwrap()
    }

    #[test]
    fn test_repeated_query_is_stable() {
        // seed 42, grid side 1024 (the defaults)
        let mut w = world();
        w.prepare(Rect::new(0, 0, 1, 1));

        let biome = w.biome_at(0, 0);
        let tile = w.tile_id(0, 0);
        assert_ne!(biome, Biome::Unknown);

        w.prepare(Rect::new(0, 0, 1, 1));
        assert_eq!(w.biome_at(0, 0), biome);
        assert_eq!(w.tile_id(0, 0), tile);
    }

    #[test]
    fn test_incremental_run_matches_cold_recompute() {
        let mut w = world();
        // Covers the x=10..20, y=5 run with margin to spare.
        w.prepare(Rect::new(8, 3, 16, 6));

        let rules = RuleTable::standard8();
        for y in 3..9 {
            for x in 8..24 {
                let biome = w.biome_at(x, y);
                let Some(pair) = biome.edge_pair() else {
                    continue;
                };
                let palette = *w.grid().catalog().palette_for(biome).unwrap();
                let mut cold = AutotileResolver::new(&rules);
                let recomputed = cold.resolve_edge(w.grid(), x, y, pair, &palette);
                assert_eq!(
                    w.tile_id(x, y),
                    recomputed,
                    "scanline tile diverged from cold recompute at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let mut w = world();
        let viewport = Rect::new(-20, 40, 30, 20);

        w.prepare(viewport);
        let count = w.grid().classified_count();
        assert!(count > 0);

        w.prepare(viewport);
        assert_eq!(
            w.grid().classified_count(),
            count,
            "second prepare must classify nothing"
        );
    }

    #[test]
    fn test_determinism_across_worlds() {
        let mut a = world();
        let mut b = world();
        let viewport = Rect::new(100, -50, 16, 16);
        a.prepare(viewport);
        b.prepare(viewport);

        for y in -50..-34 {
            for x in 100..116 {
                assert_eq!(a.biome_at(x, y), b.biome_at(x, y));
                assert_eq!(a.tile_id(x, y), b.tile_id(x, y));
            }
        }
    }

    #[test]
    fn test_transition_cells_got_edge_tiles() {
        let mut w = world();
        let viewport = Rect::new(0, 0, 64, 64);
        w.prepare(viewport);

        let rules = RuleTable::standard8();
        let mut checked = 0;
        for y in 0..64 {
            for x in 0..64 {
                let biome = w.biome_at(x, y);
                if !biome.is_transition() {
                    continue;
                }
                checked += 1;
                let palette = w.grid().catalog().palette_for(biome).unwrap();
                let mask = autotile::neighbor_mask(w.grid(), x, y, Biome::Grass);
                let category = rules.category(mask).unwrap_or(0);
                assert_eq!(w.tile_id(x, y), palette.tile(category));
            }
        }
        assert!(checked > 0, "window contained no transition cells");
    }

    #[test]
    fn test_layers_other_than_base_are_empty() {
        let mut w = world();
        w.prepare(Rect::new(0, 0, 2, 2));
        assert!(w.get_tile(0, 0, 1).is_none());
    }

    #[test]
    fn test_get_tile_resolves_through_atlas() {
        // 2-tile atlas; every biome points at a valid id.
        let sheet = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            8,
            4,
            image::Rgba([9, 9, 9, 255]),
        ));
        let atlas = TileAtlas::from_image(&sheet, 4).unwrap();

        let config = WorldConfig {
            grass_variants: vec![0, 1],
            wall_tile: 1,
            water_grass: Palette::new([Some(1); 16]),
            dirt_grass: Palette::new([Some(0); 16]),
            ..WorldConfig::default()
        };
        let mut w = TileWorld::new(config).unwrap().with_atlas(atlas);
        w.prepare(Rect::new(0, 0, 4, 4));

        assert!(w.get_tile(2, 2, BASE_LAYER).is_some());
    }

    #[test]
    fn test_reload_config_invalidates_grid() {
        let mut w = world();
        w.prepare(Rect::new(0, 0, 8, 8));
        assert!(w.grid().classified_count() > 0);

        let mut config = WorldConfig::default();
        config.seed = 7;
        w.reload_config(config).unwrap();

        assert_eq!(w.grid().classified_count(), 0);
        assert_eq!(w.biome_at(0, 0), Biome::Unknown);

        w.prepare(Rect::new(0, 0, 8, 8));
        assert_ne!(w.biome_at(0, 0), Biome::Unknown);
    }

    #[test]
    fn test_reload_rejects_invalid_config() {
        let mut w = world();
        let bad = WorldConfig {
            grid_side: 0,
            ..WorldConfig::default()
        };
        assert!(w.reload_config(bad).is_err());
    }
}
