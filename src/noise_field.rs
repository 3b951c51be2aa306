//! Seeded 2D coherent-noise field
//!
//! Thin wrapper over the `noise` crate that pins down the contract the rest
//! of the engine relies on: deterministic for a fixed seed, continuous in its
//! inputs, values in [-1, 1], no mutable state after construction.

use noise::{NoiseFn, Perlin};

/// A seeded, read-only 2D noise field.
///
/// Safe to share across readers; sampling never mutates.
pub struct NoiseField {
    inner: Perlin,
}

impl NoiseField {
    /// Create a field from a seed. The same seed always reproduces the
    /// same field, including across process restarts.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Perlin::new(seed as u32),
        }
    }

    /// Sample the field at (possibly fractional) coordinates.
    /// Returns a value in [-1, 1].
    pub fn sample2(&self, fx: f64, fy: f64) -> f64 {
        self.inner.get([fx, fy])
    }

    /// Sample remapped to [0, 1].
    pub fn sample2_unit(&self, fx: f64, fy: f64) -> f64 {
        (self.sample2(fx, fy) + 1.0) * 0.5
    }
}
