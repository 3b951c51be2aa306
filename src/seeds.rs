//! Seed management for world generation
//!
//! Derives one sub-seed per noise channel from a master seed, so individual
//! channels can be varied or pinned independently.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeds for every noise channel used by the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Base terrain channel (macro regions + micro variation)
    pub terrain: u64,
    /// Large-scale elevation channel (wall placement)
    pub elevation: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            terrain: derive_seed(master, "terrain"),
            elevation: derive_seed(master, "elevation"),
        }
    }
}

impl Default for WorldSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Derive a sub-seed from a master seed and a channel name.
/// Hashing keeps channels decorrelated but deterministic.
fn derive_seed(master: u64, channel: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    channel.hash(&mut hasher);
    hasher.finish()
}
