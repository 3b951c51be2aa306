//! Biome classification from layered noise
//!
//! Turns noise samples at a cell into a discrete biome label plus a
//! continuous intensity used to pick among near-duplicate tile variants.

use serde::{Deserialize, Serialize};

use crate::noise_field::NoiseField;
use crate::seeds::WorldSeeds;

/// Discrete terrain category for one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Biome {
    /// Default vegetation, rendered from intensity-picked variants
    Grass = 0,
    /// Streams and pools, autotiled against grass
    Water = 1,
    /// Sparse vegetation patches, autotiled against grass
    LooseDirt = 2,
    /// Rare high-elevation rock, single tile
    Wall = 3,
    /// Sentinel for cells that were never classified
    Unknown = 255,
}

/// A (primary, secondary) biome pair that shares an edge ruleset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BiomePair {
    pub primary: Biome,
    pub secondary: Biome,
}

impl Biome {
    /// The edge ruleset for this biome, if it is a transition biome.
    ///
    /// Transition biomes are drawn with seam tiles computed against their
    /// designated secondary biome; base biomes render a single tile.
    pub fn edge_pair(self) -> Option<BiomePair> {
        match self {
            Biome::Water => Some(BiomePair {
                primary: Biome::Water,
                secondary: Biome::Grass,
            }),
            Biome::LooseDirt => Some(BiomePair {
                primary: Biome::LooseDirt,
                secondary: Biome::Grass,
            }),
            Biome::Grass | Biome::Wall | Biome::Unknown => None,
        }
    }

    /// Whether this biome needs neighbor-dependent tile resolution.
    pub fn is_transition(self) -> bool {
        self.edge_pair().is_some()
    }
}

// =============================================================================
// CLASSIFIER PARAMETERS
// =============================================================================

/// Thresholds and weights for biome classification.
///
/// Defaults are the reference sizing: macro features every ~32 cells,
/// 70/30 macro/micro blend, streams above the 0.75 quantile of the macro
/// channel, walls only near the extreme of the elevation channel.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ClassifierParams {
    /// Cell span of one macro noise feature (coordinate divisor)
    pub noise_size: f64,
    /// Cell span of one elevation feature
    pub elevation_size: f64,
    /// Macro sample in [0, 1] above this is water
    pub water_threshold: f64,
    /// Elevation sample in [0, 1] above this is wall (checked first)
    pub wall_threshold: f64,
    /// Blended vegetation value in [0, 4] below this is loose dirt
    pub dirt_threshold: f64,
    /// Weight of the macro sample in the vegetation blend
    pub macro_weight: f64,
    /// Weight of the micro sample in the vegetation blend
    pub micro_weight: f64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            noise_size: 32.0,
            elevation_size: 128.0,
            water_threshold: 0.75,
            wall_threshold: 0.85,
            dirt_threshold: 0.9,
            macro_weight: 0.7,
            micro_weight: 0.3,
        }
    }
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Result of classifying one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub biome: Biome,
    /// Normalized vegetation intensity in [0, 1]; meaningful for base biomes
    pub intensity: f32,
}

/// Classifies cells into biomes from two seeded noise channels.
///
/// Classification is a pure function of (x, y) and the seeds; it does not
/// depend on call order.
pub struct BiomeClassifier {
    terrain: NoiseField,
    elevation: NoiseField,
    params: ClassifierParams,
}

impl BiomeClassifier {
    pub fn new(seeds: WorldSeeds, params: ClassifierParams) -> Self {
        Self {
            terrain: NoiseField::new(seeds.terrain),
            elevation: NoiseField::new(seeds.elevation),
            params,
        }
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    /// Classify the cell at integer coordinates (x, y).
    ///
    /// Thresholds apply in fixed priority order: wall elevation first
    /// (rarest), then water, then loose dirt on the blended vegetation
    /// value, with grass as the default. A cell resolves to exactly one
    /// biome; ties go to the earlier check.
    pub fn classify(&self, x: i32, y: i32) -> Classification {
        let p = &self.params;
        let fx = f64::from(x);
        let fy = f64::from(y);

        let macro01 = self
            .terrain
            .sample2_unit(fx / p.noise_size, fy / p.noise_size);
        let vegetation = self.vegetation_value(fx, fy, macro01);
        let intensity = (vegetation / 4.0).clamp(0.0, 1.0) as f32;

        let elevation01 = self
            .elevation
            .sample2_unit(fx / p.elevation_size, fy / p.elevation_size);
        if elevation01 > p.wall_threshold {
            return Classification {
                biome: Biome::Wall,
                intensity,
            };
        }

        if macro01 > p.water_threshold {
            return Classification {
                biome: Biome::Water,
                intensity,
            };
        }

        if vegetation < p.dirt_threshold {
            return Classification {
                biome: Biome::LooseDirt,
                intensity,
            };
        }

        Classification {
            biome: Biome::Grass,
            intensity,
        }
    }

    /// Blended vegetation value in [0, 4]: a flattened macro gradient plus
    /// fine-grained micro variation to avoid visually flat regions.
    fn vegetation_value(&self, fx: f64, fy: f64, macro01: f64) -> f64 {
        let p = &self.params;
        let macro_veg = (macro01 * 4.0).powf(0.9);
        // Perlin vanishes on the integer lattice; sample the micro
        // channel half a cell off it.
        let micro_veg = self.terrain.sample2_unit(fx + 0.5, fy + 0.5) * 4.0;
        (macro_veg * p.macro_weight + micro_veg * p.micro_weight).clamp(0.0, 4.0)
    }
}

/// Pick a tile-variant index from a normalized intensity.
///
/// The intensity is scaled back to [0, 4], rounded to nearest, and clamped
/// to the variant list.
pub fn variant_index(intensity: f32, variants: usize) -> usize {
    debug_assert!(variants > 0);
    let idx = (f64::from(intensity) * 4.0).round() as usize;
    idx.min(variants - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(params: ClassifierParams) -> BiomeClassifier {
        BiomeClassifier::new(WorldSeeds::from_master(42), params)
    }

    #[test]
    fn test_classification_deterministic() {
        let a = classifier(ClassifierParams::default());
        let b = classifier(ClassifierParams::default());

        for i in 0..200 {
            let x = i * 13 - 1000;
            let y = i * 7 - 500;
            assert_eq!(a.classify(x, y), b.classify(x, y));
        }
    }

    #[test]
    fn test_intensity_in_unit_range() {
        let c = classifier(ClassifierParams::default());

        for i in 0..500 {
            let cell = c.classify(i * 3 - 700, i * 11 - 200);
            assert!((0.0..=1.0).contains(&cell.intensity));
        }
    }

    #[test]
    fn test_wall_check_wins_over_water() {
        // Force both the wall and water checks to pass everywhere; the
        // elevation check runs first, so every cell must be wall.
        let params = ClassifierParams {
            wall_threshold: -1.0,
            water_threshold: -1.0,
            ..ClassifierParams::default()
        };
        let c = classifier(params);

        for i in 0..100 {
            let cell = c.classify(i * 17, i * 5 - 300);
            assert_eq!(cell.biome, Biome::Wall);
        }
    }

    #[test]
    fn test_water_check_wins_over_dirt() {
        let params = ClassifierParams {
            wall_threshold: 2.0,
            water_threshold: -1.0,
            dirt_threshold: 5.0,
            ..ClassifierParams::default()
        };
        let c = classifier(params);

        for i in 0..100 {
            let cell = c.classify(i, -i);
            assert_eq!(cell.biome, Biome::Water);
        }
    }

    #[test]
    fn test_all_biomes_reachable() {
        let c = classifier(ClassifierParams::default());
        let mut found = std::collections::HashSet::new();

        for x in (-2000..2000).step_by(3) {
            for y in (-300..300).step_by(3) {
                found.insert(c.classify(x, y).biome);
            }
        }

        assert!(found.contains(&Biome::Grass), "no grass found");
        assert!(found.contains(&Biome::Water), "no water found");
        assert!(found.contains(&Biome::LooseDirt), "no loose dirt found");
    }

    #[test]
    fn test_variant_index_clamps() {
        assert_eq!(variant_index(0.0, 4), 0);
        assert_eq!(variant_index(0.5, 4), 2);
        assert_eq!(variant_index(1.0, 4), 3);
        assert_eq!(variant_index(1.0, 5), 4);
    }

    #[test]
    fn test_edge_pairs() {
        assert_eq!(Biome::Water.edge_pair().unwrap().secondary, Biome::Grass);
        assert_eq!(
            Biome::LooseDirt.edge_pair().unwrap().secondary,
            Biome::Grass
        );
        assert!(Biome::Grass.edge_pair().is_none());
        assert!(Biome::Wall.edge_pair().is_none());
        assert!(!Biome::Unknown.is_transition());
    }
}
