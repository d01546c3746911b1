use cgmath::Point3;

use crate::engine_state::rendering::vertex::{Vertex, FACE_VERTEX_COUNT};
use crate::engine_state::voxels::block::{block_side::BlockSide, Block};

/// Texture coordinates of the four corners, in corner order.
const CORNER_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Corner indices of the two triangles making up a face.
const TRIANGLES: [usize; FACE_VERTEX_COUNT] = [0, 1, 2, 0, 2, 3];

/// A visible face found while meshing a cluster.
///
/// Faces only live between the culling scan and the vertex write-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFace {
    /// The block the face belongs to
    pub block: Block,
    /// Which side of the block this face represents
    pub side: BlockSide,
    /// Position of the block inside its cluster
    pub position: Point3<i32>,
}

impl BlockFace {
    /// Creates a face of the block at local `(i, j, k)`.
    pub fn new(block: Block, side: BlockSide, position: Point3<i32>) -> Self {
        Self {
            block,
            side,
            position,
        }
    }

    /// The four corners of the face, counter-clockwise when seen from outside the
    /// block.
    pub fn corners(&self) -> [Point3<i32>; 4] {
        let Point3 { x: i, y: j, z: k } = self.position;
        let p = Point3::new;

        match self.side {
            BlockSide::RIGHT => [
                p(i + 1, j, k + 1),
                p(i + 1, j, k),
                p(i + 1, j + 1, k),
                p(i + 1, j + 1, k + 1),
            ],
            BlockSide::LEFT => [
                p(i, j, k),
                p(i, j, k + 1),
                p(i, j + 1, k + 1),
                p(i, j + 1, k),
            ],
            BlockSide::TOP => [
                p(i, j + 1, k),
                p(i, j + 1, k + 1),
                p(i + 1, j + 1, k + 1),
                p(i + 1, j + 1, k),
            ],
            BlockSide::BOTTOM => [
                p(i, j, k + 1),
                p(i, j, k),
                p(i + 1, j, k),
                p(i + 1, j, k + 1),
            ],
            BlockSide::FRONT => [
                p(i, j, k + 1),
                p(i + 1, j, k + 1),
                p(i + 1, j + 1, k + 1),
                p(i, j + 1, k + 1),
            ],
            BlockSide::BACK => [
                p(i + 1, j, k),
                p(i, j, k),
                p(i, j + 1, k),
                p(i + 1, j + 1, k),
            ],
        }
    }

    /// The two triangles of the face as six vertices.
    pub fn vertices(&self) -> [Vertex; FACE_VERTEX_COUNT] {
        let corners = self.corners();
        let normal = self.side.normal();
        let block_type = self.block.block_type as u32;

        TRIANGLES.map(|corner| {
            Vertex::new(
                corners[corner],
                normal,
                CORNER_TEX_COORDS[corner],
                block_type,
            )
        })
    }
}
