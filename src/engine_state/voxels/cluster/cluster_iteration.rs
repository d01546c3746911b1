//! # Cluster Iteration Module
//!
//! Visits every voxel of a cluster exactly once, in storage order: X outermost, then Y,
//! with Z innermost. The mesher relies on this order being fixed so two meshings of
//! unchanged data produce identical buffers.

use cgmath::Point3;

use crate::engine_state::voxels::block::Block;

use super::Cluster;

/// An iterator over every block of a cluster, air included, paired with its local
/// position.
pub struct ClusterBlockIterator<'a> {
    /// Reference to the cluster being iterated over
    cluster_ref: &'a Cluster,
    /// Next index into the block vector
    offset: usize,
}

impl<'a> ClusterBlockIterator<'a> {
    /// Creates an iterator positioned at local `(0, 0, 0)`.
    pub fn new(cluster_ref: &'a Cluster) -> Self {
        ClusterBlockIterator {
            cluster_ref,
            offset: 0,
        }
    }
}

impl Iterator for ClusterBlockIterator<'_> {
    type Item = (Point3<i32>, Block);

    fn next(&mut self) -> Option<Self::Item> {
        let block = *self.cluster_ref.blocks.get(self.offset)?;
        let size = self.cluster_ref.size;

        let z = self.offset % size;
        let y = (self.offset / size) % size;
        let x = self.offset / (size * size);
        self.offset += 1;

        Some((Point3::new(x as i32, y as i32, z as i32), block))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cluster_ref.blocks.len() - self.offset;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ClusterBlockIterator<'_> {}
