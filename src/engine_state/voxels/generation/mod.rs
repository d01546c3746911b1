//! # World Generation Module
//!
//! Fills a world from an elevation source and builds the geometry of every cluster.
//!
//! ## Two Passes
//!
//! 1. **Data**: every chunk, in row-major order, is reset and filled column by column,
//!    clusters bottom to top. A column is GRASS below its elevation and AIR above.
//! 2. **Geometry**: every cluster is meshed with the world supplied, so faces on chunk
//!    boundaries see the neighbor's data.
//!
//! The data pass finishes for the whole world before the geometry pass starts. Meshing
//! a chunk before its neighbors are filled would read their empty data as AIR and emit
//! faces that the finished neighbor hides, so no per-chunk interleaving is offered.

use std::time::Duration;

use cgmath::Point3;
use log::{debug, info, warn};
use web_time::Instant;

use crate::engine_state::linear_heap::AllocatorHandle;
use crate::engine_state::rendering::meshing::{MeshReport, Mesher};
use crate::error::Result;

use super::block::{block_type::BlockType, Block};
use super::chunk::Chunk;
use super::coordinates::ClusterAddress;
use super::world::World;

pub mod elevation;

use elevation::Elevation;

/// Totals from a full generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Chunks filled by the data pass.
    pub chunks: usize,
    /// Clusters handed to the mesher.
    pub clusters_meshed: usize,
    /// Clusters that produced geometry but could not get memory for it.
    pub clusters_without_geometry: usize,
    /// Clusters with no visible faces at all.
    pub empty_clusters: usize,
    /// Faces emitted over the whole world.
    pub faces: usize,
    /// Vertex bytes allocated over the whole world.
    pub bytes: u64,
    /// Wall time of the data pass.
    pub data_pass: Duration,
    /// Wall time of the geometry pass.
    pub geometry_pass: Duration,
}

impl GenerationReport {
    fn record(&mut self, report: &MeshReport) {
        self.clusters_meshed += 1;
        self.faces += report.face_count;
        self.bytes += report.bytes;

        if !report.generated {
            self.clusters_without_geometry += 1;
        } else if report.face_count == 0 {
            self.empty_clusters += 1;
        }
    }
}

/// Drives both generation passes over a world.
pub struct WorldGenerator {
    elevation: Box<dyn Elevation>,
}

impl WorldGenerator {
    /// Creates a generator from any elevation source.
    pub fn new<E: Elevation + 'static>(elevation: E) -> Self {
        Self::from_boxed(Box::new(elevation))
    }

    /// Creates a generator from an already boxed elevation source.
    pub fn from_boxed(elevation: Box<dyn Elevation>) -> Self {
        Self { elevation }
    }

    /// Runs the data pass to completion, then the geometry pass.
    pub fn generate(
        &self,
        world: &mut World,
        mesher: &mut Mesher,
        allocator: &AllocatorHandle,
    ) -> Result<GenerationReport> {
        let data_pass = self.fill_data(world);
        let mut report = Self::build_geometry(world, mesher, allocator)?;

        report.chunks = world.chunks().len();
        report.data_pass = data_pass;
        Ok(report)
    }

    /// Pass 1: resets every chunk and fills it from the elevation source.
    pub fn fill_data(&self, world: &mut World) -> Duration {
        let start = Instant::now();
        let dimensions = world.dimensions();
        info!(
            "Filling {0}x{0} chunks from elevation data",
            dimensions.world_size
        );

        for x in 0..dimensions.world_size {
            for z in 0..dimensions.world_size {
                if let Some(chunk) = world.chunk_mut(x, z) {
                    self.fill_chunk(chunk);
                }
            }
            debug!("Filled chunk row {x}");
        }

        let elapsed = start.elapsed();
        info!("Data pass finished in {elapsed:?}");
        elapsed
    }

    fn fill_chunk(&self, chunk: &mut Chunk) {
        chunk.reset();

        let origin = chunk.position();
        for cluster in chunk.clusters_mut() {
            let size = cluster.size();
            let base_y = cluster.position().y * size as i32;
            let grass = Block::new(BlockType::GRASS);

            for i in 0..size {
                for k in 0..size {
                    let x = origin.x * size as i32 + i as i32;
                    let z = origin.z * size as i32 + k as i32;
                    let height = self.elevation.elevation(x as f32, z as f32);

                    let solid = height.saturating_sub(base_y).clamp(0, size as i32) as usize;
                    for j in 0..solid {
                        cluster.set_local(Point3::new(i, j, k), grass);
                    }
                }
            }
        }
    }

    /// Pass 2: meshes every cluster of an already filled world.
    pub fn build_geometry(
        world: &mut World,
        mesher: &mut Mesher,
        allocator: &AllocatorHandle,
    ) -> Result<GenerationReport> {
        let start = Instant::now();
        let dimensions = world.dimensions();
        info!("Meshing {} clusters", dimensions.cluster_count());

        let mut report = GenerationReport::default();
        let mut row = None;
        for address in dimensions.cluster_addresses() {
            let mesh = world.generate_cluster_geometry(address, mesher, allocator)?;
            report.record(&mesh);

            if row != Some(address.chunk_x) {
                row = Some(address.chunk_x);
                debug!("Meshing chunk row {}", address.chunk_x);
            }
        }

        report.geometry_pass = start.elapsed();
        if report.clusters_without_geometry > 0 {
            warn!(
                "{} clusters have no geometry after the geometry pass",
                report.clusters_without_geometry
            );
        }
        info!(
            "Geometry pass finished in {:?}: {} faces, {} bytes",
            report.geometry_pass, report.faces, report.bytes
        );

        Ok(report)
    }

    /// Rebuilds the geometry of the given clusters, usually those returned by
    /// [`World::set_block`].
    pub fn remesh(
        world: &mut World,
        addresses: &[ClusterAddress],
        mesher: &mut Mesher,
        allocator: &AllocatorHandle,
    ) -> Result<Vec<MeshReport>> {
        addresses
            .iter()
            .map(|&address| world.generate_cluster_geometry(address, mesher, allocator))
            .collect()
    }
}
