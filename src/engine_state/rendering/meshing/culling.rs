//! Face culling: finds every face of a cluster that borders non-solid space.

use cgmath::Point3;

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, face_needed, Block},
    cluster::Cluster,
    world::World,
};

use super::face::BlockFace;

/// The block a face of the block at `local` looks at.
///
/// Neighbors inside the cluster come from the cluster. Neighbors across its boundary
/// come from the world at absolute coordinates, or are the sentinel without a world.
pub fn neighbor(
    cluster: &Cluster,
    world: Option<&World>,
    local: Point3<i32>,
    side: BlockSide,
) -> Option<Block> {
    let target = local + side.offset();

    if cluster.contains(target) {
        return cluster.get_block(target);
    }

    world.and_then(|world| world.get_block(cluster.to_world(target)))
}

/// Pushes every visible face of `cluster` onto `faces`, visiting blocks in storage
/// order and sides in [`BlockSide::all`] order.
pub fn collect_faces(cluster: &Cluster, world: Option<&World>, faces: &mut Vec<BlockFace>) {
    for (local, block) in cluster.iter_blocks() {
        if !block.is_solid() {
            continue;
        }

        for side in BlockSide::all() {
            if face_needed(block, neighbor(cluster, world, local, side)) {
                faces.push(BlockFace::new(block, side, local));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{block::block_type::BlockType, coordinates::WorldDimensions};

    #[test]
    fn boundary_neighbors_without_a_world_are_the_sentinel() {
        let mut cluster = Cluster::new(2, Point3::new(0, 0, 0));
        cluster.fill(Block::new(BlockType::STONE));

        assert_eq!(
            neighbor(&cluster, None, Point3::new(1, 0, 0), BlockSide::RIGHT),
            None
        );
        assert_eq!(
            neighbor(&cluster, None, Point3::new(1, 0, 0), BlockSide::LEFT),
            Some(Block::new(BlockType::STONE))
        );
    }

    #[test]
    fn boundary_neighbors_come_from_the_world() {
        let mut world = World::new(WorldDimensions::new(2, 1, 2)).unwrap();
        let dirt = Block::new(BlockType::DIRT);
        world.set_block(Point3::new(2, 0, 1), dirt).unwrap();

        let cluster = world.chunk(0, 0).unwrap().cluster(0).unwrap();
        assert_eq!(
            neighbor(cluster, Some(&world), Point3::new(1, 0, 1), BlockSide::RIGHT),
            Some(dirt)
        );
        assert_eq!(
            neighbor(cluster, Some(&world), Point3::new(0, 0, 1), BlockSide::LEFT),
            None
        );
    }

    #[test]
    fn interior_faces_are_culled() {
        let mut cluster = Cluster::new(3, Point3::new(0, 0, 0));
        cluster.fill(Block::new(BlockType::GRASS));

        let mut faces = Vec::new();
        collect_faces(&cluster, None, &mut faces);

        assert_eq!(faces.len(), 6 * 9);
        assert!(faces
            .iter()
            .all(|face| !cluster.contains(face.position + face.side.offset())));
    }
}
