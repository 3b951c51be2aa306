//! Bounded-memory biome storage
//!
//! A fixed-size toroidal grid addressed by wrapping logical coordinates.
//! Cells are classified lazily on first touch; windowed pre-fill skips
//! already-seen cells, which is the dominant performance lever since
//! classification (noise sampling) dominates over a lookup.
//!
//! Logical coordinates that differ by a multiple of the side length alias
//! to the same storage slot. That trades true infinity for O(1) bounded
//! memory; the world repeats with period `side`.

use log::debug;

use crate::biome::{variant_index, Biome, BiomeClassifier};
use crate::config::TileCatalog;

/// Atlas index of one tile image.
pub type TileId = u16;

/// An axis-aligned cell rectangle, `w × h` cells starting at (x, y).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Grow the rectangle by `margin` cells on every side.
    pub fn expand(&self, margin: i32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            w: self.w + margin * 2,
            h: self.h + margin * 2,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}

/// Per-cell storage: biome label, resolved tile, vegetation intensity.
#[derive(Clone, Copy, Debug)]
struct CellRecord {
    biome: Biome,
    tile: TileId,
    intensity: f32,
}

impl Default for CellRecord {
    fn default() -> Self {
        Self {
            biome: Biome::Unknown,
            tile: 0,
            intensity: 0.0,
        }
    }
}

/// Toroidal grid of classified cells.
///
/// `biome_at`/`tile_at` are pure lookups that return the `Unknown` sentinel
/// for cells never ensured; callers are expected to pre-fill with
/// `ensure_window` first.
pub struct BiomeGrid {
    side: usize,
    cells: Vec<CellRecord>,
    classifier: BiomeClassifier,
    catalog: TileCatalog,
    /// Classifier invocations so far; pre-fill idempotence is observable here
    classified: u64,
}

impl BiomeGrid {
    pub fn new(side: usize, classifier: BiomeClassifier, catalog: TileCatalog) -> Self {
        assert!(side > 0, "grid side must be positive");
        Self {
            side,
            cells: vec![CellRecord::default(); side * side],
            classifier,
            catalog,
            classified: 0,
        }
    }

    /// Side length of the toroidal storage (the wrap period).
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    /// Number of classifier invocations since creation or the last reset.
    pub fn classified_count(&self) -> u64 {
        self.classified
    }

    fn slot(&self, x: i32, y: i32) -> usize {
        let side = self.side as i32;
        let sx = x.rem_euclid(side) as usize;
        let sy = y.rem_euclid(side) as usize;
        sy * self.side + sx
    }

    /// Classify the cell if it has not been classified yet. Idempotent.
    pub fn ensure(&mut self, x: i32, y: i32) {
        let slot = self.slot(x, y);
        if self.cells[slot].biome != Biome::Unknown {
            return;
        }

        // Classify at the canonical coordinate so a slot's content does
        // not depend on which alias touched it first.
        let side = self.side as i32;
        let cell = self
            .classifier
            .classify(x.rem_euclid(side), y.rem_euclid(side));
        self.classified += 1;

        // Base tile; transition cells get refined by the autotile pass.
        let tile = match cell.biome {
            Biome::Grass => {
                let variants = &self.catalog.grass_variants;
                variants[variant_index(cell.intensity, variants.len())]
            }
            Biome::Water => self.catalog.water_grass.fallback(),
            Biome::LooseDirt => self.catalog.dirt_grass.fallback(),
            Biome::Wall => self.catalog.wall_tile,
            Biome::Unknown => 0,
        };

        self.cells[slot] = CellRecord {
            biome: cell.biome,
            tile,
            intensity: cell.intensity,
        };
    }

    /// Classify every cell in `rect`, plus a 1-cell border so edge
    /// detection always has full neighbor data at the window boundary.
    /// Already-seen cells are skipped.
    pub fn ensure_window(&mut self, rect: Rect) {
        let padded = rect.expand(1);
        let before = self.classified;

        for y in padded.y..padded.bottom() {
            for x in padded.x..padded.right() {
                self.ensure(x, y);
            }
        }

        debug!(
            "ensure_window {:?}: {} new classifications",
            rect,
            self.classified - before
        );
    }

    /// Biome at (x, y), or `Unknown` if the cell was never ensured.
    pub fn biome_at(&self, x: i32, y: i32) -> Biome {
        self.cells[self.slot(x, y)].biome
    }

    /// Resolved tile at (x, y), or tile 0 if the cell was never ensured.
    pub fn tile_at(&self, x: i32, y: i32) -> TileId {
        self.cells[self.slot(x, y)].tile
    }

    /// Vegetation intensity at (x, y) in [0, 1].
    pub fn intensity_at(&self, x: i32, y: i32) -> f32 {
        self.cells[self.slot(x, y)].intensity
    }

    /// Overwrite the resolved tile for a classified cell (autotile pass).
    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileId) {
        let slot = self.slot(x, y);
        self.cells[slot].tile = tile;
    }

    /// Drop all classified cells and install a new classifier and catalog.
    /// Used by configuration hot-reload; the next window fill reclassifies.
    pub fn reset(&mut self, classifier: BiomeClassifier, catalog: TileCatalog) {
        self.cells.fill(CellRecord::default());
        self.classifier = classifier;
        self.catalog = catalog;
        self.classified = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::ClassifierParams;
    use crate::config::WorldConfig;
    use crate::seeds::WorldSeeds;

    fn grid(side: usize) -> BiomeGrid {
        let config = WorldConfig::default();
        let classifier =
            BiomeClassifier::new(WorldSeeds::from_master(42), ClassifierParams::default());
        BiomeGrid::new(side, classifier, config.catalog())
    }

    #[test]
    fn test_unensured_cell_is_sentinel() {
        let g = grid(64);
        assert_eq!(g.biome_at(10, 10), Biome::Unknown);
        assert_eq!(g.tile_at(10, 10), 0);
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut g = grid(64);
        g.ensure(5, 9);
        let count = g.classified_count();
        let biome = g.biome_at(5, 9);
        let tile = g.tile_at(5, 9);

        g.ensure(5, 9);
        assert_eq!(g.classified_count(), count);
        assert_eq!(g.biome_at(5, 9), biome);
        assert_eq!(g.tile_at(5, 9), tile);
    }

    #[test]
    fn test_window_prefill_idempotent() {
        let mut g = grid(128);
        let rect = Rect::new(-4, -4, 20, 12);

        g.ensure_window(rect);
        let count = g.classified_count();
        // 1-cell margin on every side
        assert_eq!(count, 22 * 14);

        g.ensure_window(rect);
        assert_eq!(g.classified_count(), count, "second fill must be free");
    }

    #[test]
    fn test_overlapping_windows_share_work() {
        let mut g = grid(128);
        g.ensure_window(Rect::new(0, 0, 10, 10));
        let first = g.classified_count();

        // Shift by one cell; almost everything is already classified.
        g.ensure_window(Rect::new(1, 0, 10, 10));
        let added = g.classified_count() - first;
        assert_eq!(added, 12, "one new column of 12 padded cells");
    }

    #[test]
    fn test_periodicity() {
        let side = 64;
        let mut g = grid(side);
        let s = side as i32;
        g.ensure_window(Rect::new(0, 0, 8, 8));

        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(g.biome_at(x, y), g.biome_at(x + s, y));
                assert_eq!(g.biome_at(x, y), g.biome_at(x, y + s));
                assert_eq!(g.tile_at(x, y), g.tile_at(x + s, y));
            }
        }
    }

    #[test]
    fn test_negative_coordinates_wrap() {
        let mut g = grid(64);
        g.ensure(-1, -1);
        assert_ne!(g.biome_at(-1, -1), Biome::Unknown);
        assert_eq!(g.biome_at(-1, -1), g.biome_at(63, 63));
    }

    #[test]
    fn test_reset_clears_cells_and_counter() {
        let mut g = grid(64);
        g.ensure_window(Rect::new(0, 0, 4, 4));
        assert!(g.classified_count() > 0);

        let config = WorldConfig::default();
        let classifier =
            BiomeClassifier::new(WorldSeeds::from_master(42), ClassifierParams::default());
        g.reset(classifier, config.catalog());

        assert_eq!(g.classified_count(), 0);
        assert_eq!(g.biome_at(0, 0), Biome::Unknown);
    }
}
