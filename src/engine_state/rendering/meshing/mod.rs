//! Mesh generation for voxel clusters.
//!
//! This module turns a cluster's block grid into triangles, one quad per visible face.
//! There is no face merging: every solid block bordering non-solid space contributes
//! one quad per exposed side.
//!
//! # Architecture
//! - `Mesher`: runs the culling scan and writes the surviving faces into a mesh buffer
//! - `culling`: decides which faces are visible, reading across cluster boundaries
//! - `face`: the transient per-face record and its vertex layout
//! - `mesh_buffer`: vertex storage with its compiled draw-command cache
//!
//! # Memory
//! The scan stages faces in a vector owned by the mesher, reused between clusters and
//! grown on demand, so no cluster can overflow it. The mesh buffer is then allocated
//! once, at exactly `faces × BYTES_PER_FACE` bytes.

use log::{debug, warn};

use crate::engine_state::linear_heap::AllocatorHandle;
use crate::engine_state::voxels::{cluster::Cluster, world::World};
use crate::error::MeshBufferError;

use super::vertex::{BYTES_PER_FACE, FACE_VERTEX_COUNT};

pub mod culling;
pub mod face;
pub mod mesh_buffer;

use face::BlockFace;
use mesh_buffer::MeshBuffer;

/// Freshly built geometry, ready to be installed into its cluster.
#[derive(Debug)]
pub struct MeshOutcome {
    /// The filled buffer; empty when there were no faces or no memory.
    pub mesh_buffer: MeshBuffer,
    /// Visible faces found by the scan.
    pub face_count: usize,
    /// False only when the buffer could not be allocated.
    pub generated: bool,
}

/// Summary of an installed mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshReport {
    /// Visible faces found by the scan.
    pub face_count: usize,
    /// Vertex bytes held by the cluster.
    pub bytes: u64,
    /// Whether the cluster now holds its geometry.
    pub generated: bool,
}

/// Builds cluster meshes, reusing its staging list between clusters.
#[derive(Debug, Default)]
pub struct Mesher {
    staging: Vec<BlockFace>,
}

impl Mesher {
    /// Creates a mesher with an empty staging list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the mesh of `cluster`.
    ///
    /// Boundary neighbors are read from `world` if given, otherwise treated as open
    /// space. Running out of memory is not an error: the outcome is ungenerated and
    /// the cluster renders nothing. The caller is responsible for having destroyed the
    /// cluster's previous mesh.
    ///
    /// # Errors
    ///
    /// Returns a [`MeshBufferError`] if the geometry does not fit the buffer sized for
    /// it, which would be a sizing bug.
    pub fn mesh_cluster(
        &mut self,
        cluster: &Cluster,
        world: Option<&World>,
        allocator: &AllocatorHandle,
    ) -> Result<MeshOutcome, MeshBufferError> {
        self.staging.clear();
        culling::collect_faces(cluster, world, &mut self.staging);

        let face_count = self.staging.len();
        if face_count == 0 {
            return Ok(MeshOutcome {
                mesh_buffer: MeshBuffer::new(),
                face_count,
                generated: true,
            });
        }

        let size = face_count as u64 * BYTES_PER_FACE;
        let mut mesh_buffer = match MeshBuffer::allocate(allocator, size) {
            Ok(mesh_buffer) => mesh_buffer,
            Err(err) => {
                warn!(
                    "Cluster {:?} left without geometry ({} faces): {}",
                    cluster.position(),
                    face_count,
                    err
                );
                self.staging.clear();
                return Ok(MeshOutcome {
                    mesh_buffer: MeshBuffer::new(),
                    face_count,
                    generated: false,
                });
            }
        };

        while let Some(face) = self.staging.pop() {
            let vertices = face.vertices();
            mesh_buffer.append(bytemuck::cast_slice(&vertices[..]), FACE_VERTEX_COUNT as u32)?;
        }

        debug!(
            "Meshed cluster {:?}: {} faces, {} bytes",
            cluster.position(),
            face_count,
            mesh_buffer.current_size()
        );

        Ok(MeshOutcome {
            mesh_buffer,
            face_count,
            generated: true,
        })
    }
}
