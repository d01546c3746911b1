//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the direction each one
//! points in.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminants give the order in which the mesher visits the sides of a block.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The face pointing towards positive X
    RIGHT = 0,

    /// The face pointing towards negative X
    LEFT = 1,

    /// The face pointing towards positive Y
    TOP = 2,

    /// The face pointing towards negative Y
    BOTTOM = 3,

    /// The face pointing towards positive Z
    FRONT = 4,

    /// The face pointing towards negative Z
    BACK = 5,
}

impl BlockSide {
    /// Returns all six block faces in discriminant order:
    /// [RIGHT, LEFT, TOP, BOTTOM, FRONT, BACK]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// Offset from a block to the neighbor this face looks at.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
        }
    }

    /// Outward unit normal of the face.
    pub fn normal(self) -> Vector3<f32> {
        let offset = self.offset();
        Vector3::new(offset.x as f32, offset.y as f32, offset.z as f32)
    }

    /// The face on the other side of the shared boundary.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::RIGHT => BlockSide::LEFT,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_sides_cancel() {
        for side in BlockSide::all() {
            assert_eq!(side.offset() + side.opposite().offset(), Vector3::new(0, 0, 0));
            assert_eq!(side.opposite().opposite(), side);
        }
    }

    #[test]
    fn normals_are_unit_axes() {
        assert_eq!(BlockSide::TOP.normal(), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(BlockSide::BACK.normal(), Vector3::new(0.0, 0.0, -1.0));
    }
}
