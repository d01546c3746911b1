//! Vertex data structures for voxel rendering.
//!
//! This module defines the vertex format written into mesh buffers. Backends receive
//! these bytes unparsed, so the layout is fixed by `#[repr(C)]`.

use cgmath::{Point3, Vector3};

/// Vertices emitted per face: two triangles, no index buffer.
pub const FACE_VERTEX_COUNT: usize = 6;

/// Bytes of vertex data emitted per face.
pub const BYTES_PER_FACE: u64 = (FACE_VERTEX_COUNT * std::mem::size_of::<Vertex>()) as u64;

/// A vertex of a cluster mesh.
///
/// Positions are local to the cluster; the renderer translates each cluster into place.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Block Type: u32 (4 bytes)
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in cluster-local block units
    pub position: [f32; 3],
    /// Outward normal of the face this vertex belongs to
    pub normal: [f32; 3],
    /// UV texture coordinates (0.0-1.0)
    pub tex_coords: [f32; 2],
    /// Type byte of the block the face belongs to, widened for alignment
    pub block_type: u32,
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(
        position: Point3<i32>,
        normal: Vector3<f32>,
        tex_coords: [f32; 2],
        block_type: u32,
    ) -> Self {
        Vertex {
            position: [position.x as f32, position.y as f32, position.z as f32],
            normal: normal.into(),
            tex_coords,
            block_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
        assert_eq!(BYTES_PER_FACE, 216);
    }
}
