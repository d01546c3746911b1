//! # Block Type Module
//!
//! This module defines the named block types of the voxel world and their conversion
//! from the compact storage byte.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates the named block types in the voxel world.
///
/// The `FromPrimitive` derive allows conversion from the storage byte. Only AIR is
/// non-solid; the remaining variants differ only in the type byte handed to the
/// renderer with every vertex.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An empty voxel.
    AIR = 0,

    /// The surface block placed by terrain generation.
    GRASS = 1,

    /// A basic dirt block.
    DIRT = 2,

    /// A stone block.
    STONE = 3,

    /// A wooden block.
    WOOD = 4,
}

impl BlockType {
    /// Converts a `BlockTypeSize` to a `BlockType`, or `None` for unnamed bytes.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(btype)
    }

    /// Whether blocks of this type occupy their voxel.
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_types_round_trip_through_their_byte() {
        for block_type in [
            BlockType::AIR,
            BlockType::GRASS,
            BlockType::DIRT,
            BlockType::STONE,
            BlockType::WOOD,
        ] {
            assert_eq!(BlockType::from_int(block_type as BlockTypeSize), Some(block_type));
        }
        assert_eq!(BlockType::from_int(5), None);
    }

    #[test]
    fn only_air_is_not_solid() {
        assert!(!BlockType::AIR.is_solid());
        assert!(BlockType::GRASS.is_solid());
        assert!(BlockType::WOOD.is_solid());
    }
}
