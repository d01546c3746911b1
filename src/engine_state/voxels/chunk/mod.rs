//! # Chunk Module
//!
//! A chunk is a vertical stack of `chunk_height` clusters sharing one horizontal
//! position. The chunk's position is `(x, 0, z)` in cluster units, and cluster `j` of
//! the stack always sits at `(x, j, z)`.

use cgmath::Point3;

use crate::error::WorldError;

use super::block::Block;
use super::cluster::Cluster;

/// A column of clusters.
#[derive(Debug)]
pub struct Chunk {
    /// The position of this chunk in cluster units, `y` always zero.
    position: Point3<i32>,

    /// Clusters ordered bottom to top.
    clusters: Vec<Cluster>,

    /// Edge length of every cluster in the stack.
    cluster_size: usize,
}

impl Chunk {
    /// Creates a column of `chunk_height` empty clusters at horizontal position `(x, z)`.
    pub fn new(x: i32, z: i32, cluster_size: usize, chunk_height: usize) -> Self {
        let clusters = (0..chunk_height)
            .map(|j| Cluster::new(cluster_size, Point3::new(x, j as i32, z)))
            .collect();

        Chunk {
            position: Point3::new(x, 0, z),
            clusters,
            cluster_size,
        }
    }

    /// The chunk position in cluster units.
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    /// Number of clusters in the stack.
    pub fn height(&self) -> usize {
        self.clusters.len()
    }

    /// Clusters bottom to top.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Clusters bottom to top, mutably.
    pub fn clusters_mut(&mut self) -> &mut [Cluster] {
        &mut self.clusters
    }

    /// The cluster at stack index `j`.
    pub fn cluster(&self, j: usize) -> Option<&Cluster> {
        self.clusters.get(j)
    }

    /// The cluster at stack index `j`, mutably.
    pub fn cluster_mut(&mut self, j: usize) -> Option<&mut Cluster> {
        self.clusters.get_mut(j)
    }

    /// Zero-fills every cluster and destroys their geometry.
    pub fn reset(&mut self) {
        for cluster in &mut self.clusters {
            cluster.reset();
        }
    }

    /// Splits a chunk-local block position into a stack index and a cluster-local
    /// position. `x` and `z` span one cluster, `y` spans the whole stack.
    fn split(&self, local: Point3<i32>) -> Option<(usize, Point3<i32>)> {
        let size = self.cluster_size as i32;
        let height = size * self.clusters.len() as i32;

        if !((0..size).contains(&local.x)
            && (0..height).contains(&local.y)
            && (0..size).contains(&local.z))
        {
            return None;
        }

        Some((
            (local.y / size) as usize,
            Point3::new(local.x, local.y % size, local.z),
        ))
    }

    /// The block at a chunk-local position, or `None` outside the chunk.
    pub fn get_block(&self, local: Point3<i32>) -> Option<Block> {
        let (j, cluster_local) = self.split(local)?;
        self.clusters[j].get_block(cluster_local)
    }

    /// Writes a block at a chunk-local position.
    pub fn set_block(&mut self, local: Point3<i32>, block: Block) -> Result<(), WorldError> {
        let (j, cluster_local) = self
            .split(local)
            .ok_or(WorldError::BlockOutOfRange(local))?;
        self.clusters[j].set_block(cluster_local, block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn clusters_are_stacked_at_the_chunk_position() {
        let chunk = Chunk::new(2, 5, 4, 3);
        assert_eq!(chunk.position(), Point3::new(2, 0, 5));
        assert_eq!(chunk.height(), 3);
        for (j, cluster) in chunk.clusters().iter().enumerate() {
            assert_eq!(cluster.position(), Point3::new(2, j as i32, 5));
        }
    }

    #[test]
    fn vertical_lookups_cross_clusters() {
        let mut chunk = Chunk::new(0, 0, 4, 3);
        let dirt = Block::new(BlockType::DIRT);

        chunk.set_block(Point3::new(1, 9, 2), dirt).unwrap();
        assert_eq!(chunk.get_block(Point3::new(1, 9, 2)), Some(dirt));
        assert_eq!(
            chunk.cluster(2).unwrap().get_block(Point3::new(1, 1, 2)),
            Some(dirt)
        );
    }

    #[test]
    fn out_of_range_is_sentinel_or_error() {
        let mut chunk = Chunk::new(0, 0, 4, 3);
        assert_eq!(chunk.get_block(Point3::new(4, 0, 0)), None);
        assert_eq!(chunk.get_block(Point3::new(0, 12, 0)), None);
        assert!(chunk.set_block(Point3::new(0, -1, 0), Block::AIR).is_err());
    }

    #[test]
    fn reset_clears_every_cluster() {
        let mut chunk = Chunk::new(0, 0, 2, 2);
        chunk.set_block(Point3::new(0, 3, 0), Block::new(BlockType::WOOD)).unwrap();
        chunk.reset();
        assert_eq!(chunk.get_block(Point3::new(0, 3, 0)), Some(Block::AIR));
    }
}
