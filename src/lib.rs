//! Procedural tile-world engine
//!
//! Deterministic biome synthesis and autotile edge resolution for an
//! infinitely-scrollable 2D tile world: any integer cell resolves to a
//! biome and a concrete atlas tile without materializing the world.

pub mod ascii;
pub mod atlas;
pub mod autotile;
pub mod biome;
pub mod config;
pub mod export;
pub mod grid;
pub mod noise_field;
pub mod seeds;
pub mod world;

pub use atlas::TileAtlas;
pub use autotile::{AutotileResolver, Palette, RuleTable};
pub use biome::{Biome, BiomeClassifier};
pub use config::WorldConfig;
pub use grid::{BiomeGrid, Rect, TileId};
pub use world::TileWorld;
