//! Rendering system for the voxel world.
//!
//! This module owns everything between cluster geometry and the backend: the matrix
//! stacks, the handle to the linear heap that backs mesh buffers, and the backend
//! itself, bundled into a [`RenderContext`] that is passed around explicitly.
//!
//! Each cluster is drawn inside its own push/translate/pop on the modelview stack, so
//! mesh vertices stay cluster-local and the command blobs compiled for them stay valid
//! however the camera moves.

use cgmath::Vector3;
use log::trace;

use crate::engine_state::linear_heap::AllocatorHandle;
use crate::engine_state::voxels::{chunk::Chunk, cluster::Cluster, world::World};
use crate::error::Result;

pub mod backend;
pub mod meshing;
pub mod transform;
pub mod vertex;

use backend::RenderBackend;
use meshing::mesh_buffer::DrawPath;
use transform::{MatrixType, TransformStack};

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Clusters whose geometry reached the backend.
    pub clusters_drawn: usize,
    /// Clusters without geometry, or with no faces.
    pub clusters_skipped: usize,
    /// Draws served from a compiled command blob.
    pub replayed: usize,
    /// Draws encoded directly.
    pub direct: usize,
    /// Vertices drawn.
    pub vertices: u64,
}

impl FrameStats {
    fn record(&mut self, path: Option<DrawPath>, vertices: u32) {
        match path {
            None => self.clusters_skipped += 1,
            Some(path) => {
                self.clusters_drawn += 1;
                self.vertices += vertices as u64;
                match path {
                    DrawPath::Replayed => self.replayed += 1,
                    DrawPath::Direct => self.direct += 1,
                }
            }
        }
    }
}

/// Transform stacks, allocator handle and backend, passed explicitly to whatever
/// draws or builds geometry.
#[derive(Debug)]
pub struct RenderContext<B: RenderBackend> {
    transforms: TransformStack,
    allocator: AllocatorHandle,
    backend: B,
}

impl<B: RenderBackend> RenderContext<B> {
    /// Creates a context with fresh matrix stacks.
    pub fn new(allocator: AllocatorHandle, backend: B) -> Self {
        Self {
            transforms: TransformStack::new(),
            allocator,
            backend,
        }
    }

    /// The matrix stacks.
    pub fn transforms(&self) -> &TransformStack {
        &self.transforms
    }

    /// The matrix stacks, mutably.
    pub fn transforms_mut(&mut self) -> &mut TransformStack {
        &mut self.transforms
    }

    /// The heap backing every mesh buffer.
    pub fn allocator(&self) -> &AllocatorHandle {
        &self.allocator
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Draws one cluster translated to `position × cluster_size`.
    ///
    /// Returns `None` without touching the backend if the cluster has no geometry.
    /// The modelview matrix is restored even when the draw fails.
    pub fn draw_cluster(&mut self, cluster: &mut Cluster) -> Result<Option<DrawPath>> {
        if !cluster.is_generated() || cluster.mesh_buffer().is_empty() {
            return Ok(None);
        }

        let offset = cluster.world_origin();
        self.transforms.matrix_mode(MatrixType::MODELVIEW);
        self.transforms.push()?;
        self.transforms
            .translate(Vector3::new(offset.x as f32, offset.y as f32, offset.z as f32));

        let drawn = cluster
            .mesh_buffer_mut()
            .draw(&mut self.transforms, &mut self.backend);
        self.transforms.pop()?;

        let path = drawn?;
        trace!("Drew cluster {:?} via {:?}", cluster.position(), path);
        Ok(Some(path))
    }

    /// Draws every cluster of a chunk, bottom to top.
    pub fn draw_chunk(&mut self, chunk: &mut Chunk, stats: &mut FrameStats) -> Result<()> {
        for cluster in chunk.clusters_mut() {
            let path = self.draw_cluster(cluster)?;
            stats.record(path, cluster.mesh_buffer().vertex_count());
        }
        Ok(())
    }

    /// Draws the whole world with the current modelview matrix as the camera.
    pub fn draw_world(&mut self, world: &mut World) -> Result<FrameStats> {
        let mut stats = FrameStats::default();
        self.transforms.matrix_mode(MatrixType::MODELVIEW);

        for chunk in world.chunks_mut() {
            self.draw_chunk(chunk, &mut stats)?;
        }

        Ok(stats)
    }
}
