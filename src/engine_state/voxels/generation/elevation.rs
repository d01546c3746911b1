//! Column height sources for terrain generation.

use noise::{NoiseFn, Simplex};

use crate::engine_state::voxels::coordinates::WorldDimensions;

/// Height of the terrain column at `(x, z)`, in blocks.
///
/// Implementations must be pure: the data pass may sample a column more than once and
/// expects the same answer. Any `Fn(f32, f32) -> i32` closure is an elevation source.
pub trait Elevation {
    /// Number of solid blocks in the column at absolute block position `(x, z)`.
    fn elevation(&self, x: f32, z: f32) -> i32;
}

impl<F> Elevation for F
where
    F: Fn(f32, f32) -> i32,
{
    fn elevation(&self, x: f32, z: f32) -> i32 {
        self(x, z)
    }
}

/// The same height everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatElevation(pub i32);

impl Elevation for FlatElevation {
    fn elevation(&self, _x: f32, _z: f32) -> i32 {
        self.0
    }
}

/// Rolling hills from 2D simplex noise.
///
/// The noise is sampled every four clusters, scaled to one cluster of amplitude and
/// centred on the middle of the world's height.
pub struct NoiseElevation {
    simplex: Simplex,
    /// Blocks per noise period
    frequency: f64,
    /// Blocks of amplitude
    amplitude: f64,
    /// Height of the zero crossing
    base: i32,
}

impl NoiseElevation {
    /// Creates a noise source sized to the given world.
    pub fn new(seed: u32, dimensions: WorldDimensions) -> Self {
        Self {
            simplex: Simplex::new(seed),
            frequency: (dimensions.cluster_size * 4) as f64,
            amplitude: dimensions.cluster_size as f64,
            base: dimensions.world_height() / 2,
        }
    }
}

impl Elevation for NoiseElevation {
    fn elevation(&self, x: f32, z: f32) -> i32 {
        let sample = self
            .simplex
            .get([x as f64 / self.frequency, z as f64 / self.frequency]);
        (sample * self.amplitude) as i32 + self.base
    }
}
