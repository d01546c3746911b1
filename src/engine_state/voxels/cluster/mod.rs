//! # Cluster Module
//!
//! The smallest unit of voxel storage: a dense cube of `cluster_size³` blocks that owns
//! its own mesh buffer.
//!
//! ## Storage
//!
//! Blocks live in a single vector indexed `(x * size + y) * size + z`. The vector is
//! sized once at creation and never resized; resetting a cluster zero-fills it in place.
//!
//! ## Mesh Lifecycle
//!
//! * `generated` is false until the mesher has installed geometry
//! * Regeneration always destroys the previous mesh buffer first; there is no
//!   incremental update
//! * Every installation bumps the generation counter, which keys the mesh buffer's
//!   compiled command cache

use cgmath::{Point3, Vector3};
use log::trace;

use crate::engine_state::linear_heap::AllocatorHandle;
use crate::engine_state::rendering::meshing::{
    mesh_buffer::{CacheKey, MeshBuffer},
    MeshOutcome, MeshReport, Mesher,
};
use crate::error::{MeshBufferError, WorldError};

use super::block::Block;
use super::world::World;

pub mod cluster_iteration;

use cluster_iteration::ClusterBlockIterator;

/// A cube of blocks plus the geometry built from it.
#[derive(Debug)]
pub struct Cluster {
    /// Edge length in blocks
    size: usize,
    /// Position in cluster units
    position: Point3<i32>,
    /// Block data, `size³` entries
    blocks: Vec<Block>,
    /// Whether `mesh_buffer` matches the data as of the last generation
    generated: bool,
    /// Number of geometry installations so far
    generation: u64,
    mesh_buffer: MeshBuffer,
}

impl Cluster {
    /// Creates an all-AIR cluster with an empty mesh buffer.
    pub fn new(size: usize, position: Point3<i32>) -> Self {
        Self {
            size,
            position,
            blocks: vec![Block::AIR; size * size * size],
            generated: false,
            generation: 0,
            mesh_buffer: MeshBuffer::new(),
        }
    }

    /// Edge length in blocks.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Position in cluster units.
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    /// Absolute position of local block `(0, 0, 0)`.
    pub fn world_origin(&self) -> Point3<i32> {
        self.position * self.size as i32
    }

    /// Whether the mesh buffer holds geometry for the current generation.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Number of geometry installations so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The owned mesh buffer.
    pub fn mesh_buffer(&self) -> &MeshBuffer {
        &self.mesh_buffer
    }

    /// The owned mesh buffer, mutably (drawing compiles its command cache).
    pub fn mesh_buffer_mut(&mut self) -> &mut MeshBuffer {
        &mut self.mesh_buffer
    }

    /// The raw block data in storage order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Iterates every block with its local position.
    pub fn iter_blocks(&self) -> ClusterBlockIterator<'_> {
        ClusterBlockIterator::new(self)
    }

    fn index(&self, local: Point3<i32>) -> Option<usize> {
        let size = self.size as i32;
        let range = 0..size;
        if !(range.contains(&local.x) && range.contains(&local.y) && range.contains(&local.z)) {
            return None;
        }

        Some(((local.x * size + local.y) * size + local.z) as usize)
    }

    /// Whether a local position lies inside the cluster.
    pub fn contains(&self, local: Point3<i32>) -> bool {
        self.index(local).is_some()
    }

    /// The block at a local position, or `None` outside the cluster.
    pub fn get_block(&self, local: Point3<i32>) -> Option<Block> {
        self.index(local).map(|index| self.blocks[index])
    }

    /// Writes a block at a local position. Does not touch the geometry.
    pub fn set_block(&mut self, local: Point3<i32>, block: Block) -> Result<(), WorldError> {
        let index = self
            .index(local)
            .ok_or(WorldError::BlockOutOfRange(local))?;
        self.blocks[index] = block;
        Ok(())
    }

    /// Writes a block at a local position already validated by the caller.
    pub(crate) fn set_local(&mut self, local: Point3<usize>, block: Block) {
        let index = (local.x * self.size + local.y) * self.size + local.z;
        self.blocks[index] = block;
    }

    /// Sets every block to `block`.
    pub fn fill(&mut self, block: Block) {
        self.blocks.fill(block);
    }

    /// Zero-fills the data and destroys any geometry.
    pub fn reset(&mut self) {
        self.blocks.fill(Block::AIR);
        self.destroy_geometry();
    }

    /// Frees the mesh buffer and its command cache, leaving the cluster ungenerated.
    pub fn destroy_geometry(&mut self) {
        self.mesh_buffer.destroy();
        self.generated = false;
    }

    /// Installs freshly built geometry and starts a new generation.
    pub fn install_geometry(&mut self, outcome: MeshOutcome) -> MeshReport {
        let MeshOutcome {
            mut mesh_buffer,
            face_count,
            generated,
        } = outcome;

        self.generation += 1;
        if generated {
            mesh_buffer.bind_cache_key(CacheKey {
                cluster: self.position,
                generation: self.generation,
            });
        }

        let report = MeshReport {
            face_count,
            bytes: mesh_buffer.current_size(),
            generated,
        };

        self.mesh_buffer = mesh_buffer;
        self.generated = generated;
        trace!(
            "Cluster {:?} generation {}: {} faces",
            self.position,
            self.generation,
            face_count
        );

        report
    }

    /// Destroys the previous geometry and rebuilds it from the current data.
    ///
    /// Boundary neighbors are read from `world` when given. A cluster owned by a world
    /// is regenerated through [`World::generate_cluster_geometry`] instead, since the
    /// world cannot be borrowed while one of its clusters is.
    pub fn generate_geometry(
        &mut self,
        mesher: &mut Mesher,
        world: Option<&World>,
        allocator: &AllocatorHandle,
    ) -> Result<MeshReport, MeshBufferError> {
        self.destroy_geometry();
        let outcome = mesher.mesh_cluster(self, world, allocator)?;
        Ok(self.install_geometry(outcome))
    }

    /// Absolute position of a local position.
    pub fn to_world(&self, local: Point3<i32>) -> Point3<i32> {
        self.world_origin() + Vector3::new(local.x, local.y, local.z)
    }
}
