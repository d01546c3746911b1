//! # World Module
//!
//! This module provides the `World` struct: a dense `world_size × world_size` grid of
//! chunks that is the sole authority for translating absolute block coordinates into
//! chunk, cluster and local coordinates.
//!
//! ## Architecture
//!
//! Every grid cell is populated at construction, so there are no holes to check for.
//! Chunks are stored row-major in a single vector indexed `x * world_size + z`.
//!
//! ## Boundary Queries
//!
//! The mesher looks one voxel past the edge of every cluster. Those lookups come here
//! with absolute coordinates, and anything outside the world resolves to the `None`
//! sentinel rather than an error.

use cgmath::Point3;
use log::debug;

use crate::engine_state::linear_heap::AllocatorHandle;
use crate::engine_state::rendering::meshing::{MeshReport, Mesher};
use crate::error::{ConfigError, Result, WorldError};

use super::block::{block_side::BlockSide, Block};
use super::chunk::Chunk;
use super::cluster::Cluster;
use super::coordinates::{ClusterAddress, WorldDimensions};

/// The whole voxel world.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_world::{Block, BlockType, World, WorldDimensions};
///
/// let mut world = World::new(WorldDimensions::new(4, 2, 2)).unwrap();
/// world.set_block(Point3::new(5, 1, 2), Block::new(BlockType::GRASS)).unwrap();
///
/// assert_eq!(world.get_block(Point3::new(5, 1, 2)), Some(Block::new(BlockType::GRASS)));
/// assert_eq!(world.get_block(Point3::new(-1, 0, 0)), None);
/// ```
#[derive(Debug)]
pub struct World {
    dimensions: WorldDimensions,
    /// Chunks in row-major order.
    chunks: Vec<Chunk>,
}

impl World {
    /// Creates a world of empty chunks.
    pub fn new(dimensions: WorldDimensions) -> std::result::Result<Self, ConfigError> {
        dimensions.validate()?;

        let size = dimensions.world_size;
        let chunks = (0..size)
            .flat_map(|x| (0..size).map(move |z| (x, z)))
            .map(|(x, z)| {
                Chunk::new(
                    x as i32,
                    z as i32,
                    dimensions.cluster_size,
                    dimensions.chunk_height,
                )
            })
            .collect();

        debug!(
            "Created world of {0}x{0} chunks, {1} clusters of {2}³ blocks each",
            size, dimensions.chunk_height, dimensions.cluster_size
        );

        Ok(World { dimensions, chunks })
    }

    /// The world layout.
    pub fn dimensions(&self) -> WorldDimensions {
        self.dimensions
    }

    /// Chunks in row-major order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Chunks in row-major order, mutably.
    pub fn chunks_mut(&mut self) -> &mut [Chunk] {
        &mut self.chunks
    }

    fn chunk_index(&self, x: usize, z: usize) -> Option<usize> {
        let size = self.dimensions.world_size;
        (x < size && z < size).then_some(x * size + z)
    }

    /// The chunk at grid position `(x, z)`.
    pub fn chunk(&self, x: usize, z: usize) -> Option<&Chunk> {
        let index = self.chunk_index(x, z)?;
        self.chunks.get(index)
    }

    /// The chunk at grid position `(x, z)`, mutably.
    pub fn chunk_mut(&mut self, x: usize, z: usize) -> Option<&mut Chunk> {
        let index = self.chunk_index(x, z)?;
        self.chunks.get_mut(index)
    }

    /// The cluster at an address.
    pub fn cluster(&self, address: ClusterAddress) -> Option<&Cluster> {
        self.chunk(address.chunk_x, address.chunk_z)?
            .cluster(address.cluster_y)
    }

    /// The cluster at an address, mutably.
    pub fn cluster_mut(&mut self, address: ClusterAddress) -> Option<&mut Cluster> {
        self.chunk_mut(address.chunk_x, address.chunk_z)?
            .cluster_mut(address.cluster_y)
    }

    /// Every cluster with its address, in generation order.
    pub fn clusters(&self) -> impl Iterator<Item = (ClusterAddress, &Cluster)> {
        self.dimensions
            .cluster_addresses()
            .filter_map(move |address| self.cluster(address).map(|cluster| (address, cluster)))
    }

    /// The block at an absolute position, or `None` outside the world.
    pub fn get_block(&self, position: Point3<i32>) -> Option<Block> {
        let address = self.dimensions.decompose(position)?;
        let local = address.local;

        self.cluster(address.cluster)?.get_block(Point3::new(
            local.x as i32,
            local.y as i32,
            local.z as i32,
        ))
    }

    /// Writes a block at an absolute position.
    ///
    /// Returns the clusters whose geometry no longer matches their data: the owning
    /// cluster, plus each neighboring cluster the block touches across a boundary.
    pub fn set_block(
        &mut self,
        position: Point3<i32>,
        block: Block,
    ) -> std::result::Result<Vec<ClusterAddress>, WorldError> {
        let address = self
            .dimensions
            .decompose(position)
            .ok_or(WorldError::BlockOutOfRange(position))?;

        self.cluster_mut(address.cluster)
            .ok_or(WorldError::ClusterOutOfRange(address.cluster))?
            .set_local(address.local, block);

        let mut stale = vec![address.cluster];
        for side in BlockSide::all() {
            let neighbor = self
                .dimensions
                .decompose(position + side.offset())
                .map(|neighbor| neighbor.cluster);

            if let Some(cluster) = neighbor {
                if !stale.contains(&cluster) {
                    stale.push(cluster);
                }
            }
        }

        Ok(stale)
    }

    /// Zero-fills every cluster and destroys all geometry.
    pub fn reset(&mut self) {
        for chunk in &mut self.chunks {
            chunk.reset();
        }
    }

    /// Rebuilds the geometry of one cluster, reading boundary neighbors from this world.
    ///
    /// The previous geometry is destroyed first.
    pub fn generate_cluster_geometry(
        &mut self,
        address: ClusterAddress,
        mesher: &mut Mesher,
        allocator: &AllocatorHandle,
    ) -> Result<MeshReport> {
        self.cluster_mut(address)
            .ok_or(WorldError::ClusterOutOfRange(address))?
            .destroy_geometry();

        let outcome = {
            let cluster = self
                .cluster(address)
                .ok_or(WorldError::ClusterOutOfRange(address))?;
            mesher.mesh_cluster(cluster, Some(self), allocator)?
        };

        Ok(self
            .cluster_mut(address)
            .ok_or(WorldError::ClusterOutOfRange(address))?
            .install_geometry(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn world() -> World {
        World::new(WorldDimensions::new(4, 2, 2)).unwrap()
    }

    #[test]
    fn every_cell_is_populated() {
        let world = world();
        assert_eq!(world.chunks().len(), 4);
        for x in 0..2 {
            for z in 0..2 {
                let chunk = world.chunk(x, z).unwrap();
                assert_eq!(chunk.position(), Point3::new(x as i32, 0, z as i32));
            }
        }
        assert!(world.chunk(2, 0).is_none());
        assert_eq!(world.clusters().count(), 8);
    }

    #[test]
    fn absolute_lookups_reach_the_right_cluster() {
        let mut world = world();
        let stone = Block::new(BlockType::STONE);
        world.set_block(Point3::new(6, 5, 1), stone).unwrap();

        let cluster = world.cluster(ClusterAddress::new(1, 0, 1)).unwrap();
        assert_eq!(cluster.get_block(Point3::new(2, 1, 1)), Some(stone));
        assert_eq!(world.get_block(Point3::new(6, 5, 1)), Some(stone));
    }

    #[test]
    fn out_of_world_is_sentinel_or_error() {
        let mut world = world();
        assert_eq!(world.get_block(Point3::new(8, 0, 0)), None);
        assert_eq!(world.get_block(Point3::new(0, 8, 0)), None);
        assert_eq!(
            world.set_block(Point3::new(0, 0, -1), Block::AIR),
            Err(WorldError::BlockOutOfRange(Point3::new(0, 0, -1)))
        );
    }

    #[test]
    fn set_block_reports_boundary_neighbors() {
        let mut world = world();
        let grass = Block::new(BlockType::GRASS);

        let interior = world.set_block(Point3::new(1, 1, 1), grass).unwrap();
        assert_eq!(interior, vec![ClusterAddress::new(0, 0, 0)]);

        let corner = world.set_block(Point3::new(3, 3, 3), grass).unwrap();
        assert_eq!(corner.len(), 4);
        assert!(corner.contains(&ClusterAddress::new(0, 0, 0)));
        assert!(corner.contains(&ClusterAddress::new(1, 0, 0)));
        assert!(corner.contains(&ClusterAddress::new(0, 0, 1)));
        assert!(corner.contains(&ClusterAddress::new(0, 1, 0)));
    }

    #[test]
    fn bad_cluster_address_is_an_error() {
        let mut world = world();
        let heap = crate::engine_state::linear_heap::LinearHeap::shared(1024);
        let address = ClusterAddress::new(0, 0, 7);

        let err = world
            .generate_cluster_geometry(address, &mut Mesher::new(), &heap)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::World(WorldError::ClusterOutOfRange(bad)) if bad == address
        ));
    }
}
