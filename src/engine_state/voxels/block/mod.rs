//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel world.
//! It includes block type definitions, block side handling, and the face classifier
//! that decides whether the boundary between two blocks needs a quad.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage and serialization of block data.
pub type BlockTypeSize = u8;

/// Represents a single voxel block in the world.
///
/// This is a lightweight structure that stores only the block type byte. Identity is
/// positional: a block is wherever its store places it.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute ensures a consistent memory layout, so a cluster's block
/// vector can be viewed as raw bytes with `bytemuck`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq, Hash, Default)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// The empty block.
    pub const AIR: Block = Block {
        block_type: BlockType::AIR as BlockTypeSize,
    };

    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// Wraps a raw type byte. Bytes without a named [`BlockType`] are still valid
    /// blocks and classify as solid.
    pub fn from_raw(block_type: BlockTypeSize) -> Self {
        Block { block_type }
    }

    /// The named type of this block, if the byte has one.
    pub fn block_type(&self) -> Option<BlockType> {
        BlockType::from_int(self.block_type)
    }

    /// Whether the block occupies its voxel. Everything except AIR is solid.
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.block_type != BlockType::AIR as BlockTypeSize
    }
}

/// Decides whether `current` needs a face towards `neighbor`.
///
/// `None` is the out-of-range sentinel: unknown space is treated as see-through, so a
/// solid block next to it gets a face rather than leaving a hole.
#[inline]
pub fn face_needed(current: Block, neighbor: Option<Block>) -> bool {
    current.is_solid() && neighbor.map_or(true, |neighbor| !neighbor.is_solid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_never_needs_a_face() {
        assert!(!face_needed(Block::AIR, Some(Block::AIR)));
        assert!(!face_needed(Block::AIR, None));
        assert!(!face_needed(Block::AIR, Some(Block::new(BlockType::GRASS))));
    }

    #[test]
    fn solid_faces_air_and_the_sentinel() {
        let grass = Block::new(BlockType::GRASS);
        assert!(face_needed(grass, Some(Block::AIR)));
        assert!(face_needed(grass, None));
        assert!(!face_needed(grass, Some(Block::new(BlockType::STONE))));
    }

    #[test]
    fn classifier_is_total_over_every_byte() {
        for current in 0..=BlockTypeSize::MAX {
            for neighbor in 0..=BlockTypeSize::MAX {
                let current = Block::from_raw(current);
                let neighbor = Block::from_raw(neighbor);
                let expected = current.is_solid() && !neighbor.is_solid();
                assert_eq!(face_needed(current, Some(neighbor)), expected);
            }
            assert_eq!(face_needed(Block::from_raw(current), None), current != 0);
        }
    }

    #[test]
    fn unnamed_bytes_are_solid() {
        let block = Block::from_raw(200);
        assert!(block.is_solid());
        assert_eq!(block.block_type(), None);
        assert_eq!(Block::default(), Block::AIR);
    }
}
