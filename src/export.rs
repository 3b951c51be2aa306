//! PNG export of prepared windows
//!
//! Composites resolved tiles into a single image through the atlas. The
//! caller is responsible for `prepare`-ing the window first; unresolved
//! cells (and tile ids outside the atlas) are left transparent rather than
//! failing, matching the render path's fail-soft policy.

use image::RgbaImage;

use crate::atlas::TileAtlas;
use crate::grid::{BiomeGrid, Rect};

/// Render a window of the grid to an image, one atlas tile per cell.
pub fn render_window_image(grid: &BiomeGrid, atlas: &TileAtlas, rect: Rect) -> RgbaImage {
    let ts = atlas.tile_size();
    let mut img = RgbaImage::new(rect.w as u32 * ts, rect.h as u32 * ts);

    for (row, y) in (rect.y..rect.bottom()).enumerate() {
        for (col, x) in (rect.x..rect.right()).enumerate() {
            let Some(tile) = atlas.get(grid.tile_at(x, y)) else {
                continue;
            };

            let dest_x = col as u32 * ts;
            let dest_y = row as u32 * ts;
            for ty in 0..ts {
                for tx in 0..ts {
                    img.put_pixel(dest_x + tx, dest_y + ty, *tile.get_pixel(tx, ty));
                }
            }
        }
    }

    img
}
