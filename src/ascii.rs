//! ASCII rendering of classified windows
//!
//! Debug views for inspecting a window of the world without an atlas.

use crate::biome::Biome;
use crate::grid::{BiomeGrid, Rect};

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// One character per biome
    Biome,
    /// Vegetation intensity gradient
    Intensity,
}

/// Character for a biome.
pub fn biome_char(biome: Biome) -> char {
    match biome {
        Biome::Grass => '.',
        Biome::Water => '~',
        Biome::LooseDirt => ',',
        Biome::Wall => '#',
        Biome::Unknown => '?',
    }
}

/// Render a window of the grid as ASCII, one row per line.
/// Cells that were never ensured show as `?`.
pub fn render_window(grid: &BiomeGrid, rect: Rect, mode: AsciiMode) -> String {
    let mut out = String::with_capacity((rect.w as usize + 1) * rect.h as usize);

    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let ch = match mode {
                AsciiMode::Biome => biome_char(grid.biome_at(x, y)),
                AsciiMode::Intensity => intensity_char(grid.intensity_at(x, y)),
            };
            out.push(ch);
        }
        out.push('\n');
    }

    out
}

fn intensity_char(intensity: f32) -> char {
    const RAMP: [char; 5] = [' ', '.', ':', 'o', '@'];
    let idx = (intensity * (RAMP.len() - 1) as f32).round() as usize;
    RAMP[idx.min(RAMP.len() - 1)]
}
