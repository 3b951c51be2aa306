//! Tile atlas loading and slicing
//!
//! Slices a source image into fixed-size square tiles, row-major with the
//! top row first. The engine only ever holds integer indices into this
//! sequence; pixel data is looked up at the last moment by the renderer.

use image::{DynamicImage, RgbaImage};
use thiserror::Error;

use crate::grid::TileId;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to open atlas image: {0}")]
    Image(#[from] image::ImageError),
    #[error("atlas size {width}x{height} is not a multiple of tile size {tile_size}")]
    TileSizeMismatch {
        width: u32,
        height: u32,
        tile_size: u32,
    },
    #[error("tile size must be positive")]
    ZeroTileSize,
}

/// A pre-sliced tile atlas, indexable by integer id.
#[derive(Debug)]
pub struct TileAtlas {
    tiles: Vec<RgbaImage>,
    tile_size: u32,
}

impl TileAtlas {
    /// Load an atlas image from disk and slice it.
    pub fn load(path: &str, tile_size: u32) -> Result<Self, AtlasError> {
        let img = image::open(path)?;
        Self::from_image(&img, tile_size)
    }

    /// Slice a loaded image into `tile_size`-square tiles.
    pub fn from_image(img: &DynamicImage, tile_size: u32) -> Result<Self, AtlasError> {
        if tile_size == 0 {
            return Err(AtlasError::ZeroTileSize);
        }
        let (width, height) = (img.width(), img.height());
        if width % tile_size != 0 || height % tile_size != 0 {
            return Err(AtlasError::TileSizeMismatch {
                width,
                height,
                tile_size,
            });
        }

        let cols = width / tile_size;
        let rows = height / tile_size;
        let mut tiles = Vec::with_capacity((cols * rows) as usize);

        for row in 0..rows {
            for col in 0..cols {
                let x = col * tile_size;
                let y = row * tile_size;
                tiles.push(img.crop_imm(x, y, tile_size, tile_size).to_rgba8());
            }
        }

        Ok(Self { tiles, tile_size })
    }

    /// Sub-image for a tile id, if the id is within the atlas.
    pub fn get(&self, id: TileId) -> Option<&RgbaImage> {
        self.tiles.get(usize::from(id))
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }
}
