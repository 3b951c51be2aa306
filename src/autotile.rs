//! Autotile edge resolution
//!
//! Transition biomes (water, loose dirt) are drawn with seam tiles chosen
//! from the pattern of neighboring cells. Each cell's 3x3 neighborhood is
//! packed into a 9-bit mask, the mask is looked up in a static rule table
//! to get a tile category, and the category indexes a per-biome-pair
//! palette.
//!
//! # Bitmask layout
//!
//! Column-major over the neighborhood: `bit = column * 3 + row`, columns
//! left to right (x-1, x, x+1), rows top to bottom (y-1, y, y+1):
//!
//! ```text
//!   0 3 6        NW N NE
//!   1 4 7   =    W  C E
//!   2 5 8        SW S SE
//! ```
//!
//! Bit *i* is set when that cell's biome equals the secondary biome. The
//! center slot (bit 4) never counts: the effective mask is the 8-neighbor
//! mask. The column layout exists for the scanline optimization: two
//! horizontally adjacent cells share 6 of their 9 slots, so the next mask
//! is the previous one shifted right by 3 with one fresh trailing column.

use serde::{Deserialize, Serialize};

use crate::biome::{Biome, BiomePair};
use crate::grid::{BiomeGrid, TileId};

const BIT_W: u16 = 1;
const BIT_N: u16 = 3;
const BIT_CENTER: u16 = 4;
const BIT_S: u16 = 5;
const BIT_E: u16 = 7;

/// (diagonal bit, adjacent cardinal bits)
const DIAGONALS: [(u16, [u16; 2]); 4] = [
    (0, [BIT_N, BIT_W]), // NW
    (2, [BIT_S, BIT_W]), // SW
    (6, [BIT_N, BIT_E]), // NE
    (8, [BIT_S, BIT_E]), // SE
];

/// Mask with all 8 neighbors set (center clear): the "fully surrounded"
/// pattern and the largest defined mask.
pub const FULL_SURROUND: u16 = 0b111_101_111;

/// Anything that can report a biome for a cell. `BiomeGrid` is the real
/// source; tests substitute small fixtures.
pub trait BiomeSource {
    fn biome_at(&self, x: i32, y: i32) -> Biome;
}

impl BiomeSource for BiomeGrid {
    fn biome_at(&self, x: i32, y: i32) -> Biome {
        BiomeGrid::biome_at(self, x, y)
    }
}

// =============================================================================
// RULE TABLE
// =============================================================================

/// Static mapping from a neighbor bitmask to a tile category in 0..16.
///
/// This is pure configuration data, independent of any biome pair, and the
/// single source of truth for how neighbor patterns translate to visual
/// corner/edge tiles. Unmapped masks resolve to category 0 at lookup sites.
pub struct RuleTable {
    categories: Vec<Option<u8>>,
}

impl RuleTable {
    /// The standard 8-neighbor ruleset.
    ///
    /// A mask is mapped when every set diagonal is supported by at least
    /// one of its adjacent cardinals; its category is the 4-bit cardinal
    /// code (N=1, E=2, S=4, W=8). Diagonal-only pockets stay unmapped and
    /// fall back to category 0, a deliberate best guess for isolated
    /// single-cell biome pockets the noise occasionally produces.
    pub fn standard8() -> Self {
        let mut categories = vec![None; 512];

        for (mask, slot) in categories.iter_mut().enumerate() {
            let mask = mask as u16;
            if mask & (1 << BIT_CENTER) != 0 {
                continue;
            }

            let supported = DIAGONALS.iter().all(|&(diag, cardinals)| {
                mask & (1 << diag) == 0
                    || cardinals.iter().any(|&c| mask & (1 << c) != 0)
            });
            if !supported {
                continue;
            }

            *slot = Some(Self::cardinal_code(mask));
        }

        Self { categories }
    }

    /// Build a table from explicit (mask, category) entries, for worlds
    /// that ship their own ruleset. Entries must satisfy `mask < 512` and
    /// `category < 16`; offending entries are ignored.
    pub fn from_entries(entries: &[(u16, u8)]) -> Self {
        let mut categories = vec![None; 512];
        for &(mask, category) in entries {
            if usize::from(mask) < categories.len() && category < 16 {
                categories[usize::from(mask)] = Some(category);
            }
        }
        Self { categories }
    }

    /// Category for a mask, or `None` if the mask is unmapped.
    pub fn category(&self, mask: u16) -> Option<u8> {
        self.categories.get(usize::from(mask)).copied().flatten()
    }

    fn cardinal_code(mask: u16) -> u8 {
        let bit = |b: u16| u8::from(mask & (1 << b) != 0);
        bit(BIT_N) | bit(BIT_E) << 1 | bit(BIT_S) << 2 | bit(BIT_W) << 3
    }
}

// =============================================================================
// PALETTE
// =============================================================================

/// Ordered tile ids for one biome-transition pair, one slot per category.
///
/// `None` means "no distinct tile for this configuration"; lookups fall
/// back to slot 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    slots: [Option<TileId>; 16],
}

impl Palette {
    pub fn new(slots: [Option<TileId>; 16]) -> Self {
        Self { slots }
    }

    /// Tile for a category, falling back to slot 0 for absent entries.
    pub fn tile(&self, category: u8) -> TileId {
        self.slots
            .get(usize::from(category))
            .copied()
            .flatten()
            .unwrap_or_else(|| self.fallback())
    }

    /// The category-0 tile (the plain, fully-interior tile).
    pub fn fallback(&self) -> TileId {
        self.slots[0].unwrap_or(0)
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Private scanline state: the last resolved cell and its mask.
#[derive(Clone, Copy, Debug)]
struct ScanPoint {
    x: i32,
    y: i32,
    pair: BiomePair,
    mask: u16,
}

/// Resolves edge tiles for transition-biome cells.
///
/// One resolver owns one scanline cache; parallel row scans must each use
/// their own instance. Create a fresh resolver per row (construction is
/// free, the rule table is borrowed).
pub struct AutotileResolver<'a> {
    rules: &'a RuleTable,
    last: Option<ScanPoint>,
}

impl<'a> AutotileResolver<'a> {
    pub fn new(rules: &'a RuleTable) -> Self {
        Self { rules, last: None }
    }

    /// Resolve the tile for a transition cell at (x, y).
    ///
    /// When calls proceed left to right along one row with no gap and the
    /// same biome pair, the previous mask is reused: shift right by 3 to
    /// drop the column that fell out of range, then add the new trailing
    /// column. Any discontinuity forces a full 9-cell recompute. Both
    /// paths are value-equivalent; the cache is purely an optimization.
    pub fn resolve_edge<S: BiomeSource>(
        &mut self,
        source: &S,
        x: i32,
        y: i32,
        pair: BiomePair,
        palette: &Palette,
    ) -> TileId {
        let mask = match self.last {
            Some(prev) if prev.y == y && prev.x + 1 == x && prev.pair == pair => {
                let shifted = prev.mask >> 3;
                // center never counts
                (shifted | column_bits(source, x + 1, y, pair.secondary) << 6)
                    & !(1 << BIT_CENTER)
            }
            _ => neighbor_mask(source, x, y, pair.secondary),
        };
        self.last = Some(ScanPoint { x, y, pair, mask });

        let category = self.rules.category(mask).unwrap_or(0);
        palette.tile(category)
    }

    /// Drop the scanline cache, forcing the next call to recompute fully.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

/// Full 9-cell mask for the cell at (x, y), center slot cleared.
///
/// Neighbors outside the classified window report the `Unknown` sentinel
/// and contribute 0.
pub fn neighbor_mask<S: BiomeSource>(source: &S, x: i32, y: i32, secondary: Biome) -> u16 {
    let mask = column_bits(source, x - 1, y, secondary)
        | column_bits(source, x, y, secondary) << 3
        | column_bits(source, x + 1, y, secondary) << 6;
    mask & !(1 << BIT_CENTER)
}

/// Three vertical bits (top, middle, bottom) for one column.
fn column_bits<S: BiomeSource>(source: &S, col_x: i32, y: i32, secondary: Biome) -> u16 {
    let mut bits = 0;
    if source.biome_at(col_x, y - 1) == secondary {
        bits |= 1;
    }
    if source.biome_at(col_x, y) == secondary {
        bits |= 2;
    }
    if source.biome_at(col_x, y + 1) == secondary {
        bits |= 4;
    }
    bits
}
