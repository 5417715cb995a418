//! Spawn helpers for randomized element creation.
//!
//! Populations draw every random attribute through a [`SpawnContext`] so a
//! configured seed reproduces the same field, while unseeded runs differ.

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use std::ops::Range;

/// Random source plus helpers for common spawn patterns.
#[derive(Debug, Clone)]
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Seeded context, or entropy-seeded when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { rng }
    }

    /// Uniform value in `range`; returns `range.start` for empty ranges.
    pub fn range(&mut self, range: Range<f32>) -> f32 {
        if range.start < range.end {
            self.rng.gen_range(range)
        } else {
            range.start
        }
    }

    /// Uniform index in `0..len`.
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.rng.gen_range(0..len)
        }
    }

    /// Uniform point in the rectangle `[0, size)`.
    pub fn in_rect(&mut self, size: Vec2) -> Vec2 {
        Vec2::new(self.range(0.0..size.x), self.range(0.0..size.y))
    }

    /// Vector with each component uniform in `[-half, half)`.
    pub fn symmetric2(&mut self, half: f32) -> Vec2 {
        Vec2::new(self.range(-half..half), self.range(-half..half))
    }

    /// Vector with each component uniform in `[-half, half)`.
    pub fn symmetric3(&mut self, half: f32) -> Vec3 {
        Vec3::new(
            self.range(-half..half),
            self.range(-half..half),
            self.range(-half..half),
        )
    }

    /// Point in an axis-aligned box given per-axis ranges.
    pub fn in_box(&mut self, x: Range<f32>, y: Range<f32>, z: Range<f32>) -> Vec3 {
        Vec3::new(self.range(x), self.range(y), self.range(z))
    }

    /// Euler angles, each uniform in `[0, 2π)`.
    pub fn euler(&mut self) -> Vec3 {
        Vec3::new(self.range(0.0..TAU), self.range(0.0..TAU), self.range(0.0..TAU))
    }
}
