//! # Coordinates Module
//!
//! World dimensions and the one place where absolute block coordinates are split into
//! chunk, cluster and local parts (and joined back together).
//!
//! With `CS` the cluster size, an absolute block position `p` lives in
//! chunk `(p.x / CS, p.z / CS)`, cluster `p.y / CS` of that chunk's stack, at local
//! position `(p.x % CS, p.y % CS, p.z % CS)`. Every store and the mesher go through
//! [`WorldDimensions::decompose`] and [`WorldDimensions::compose`] so boundary lookups
//! agree on where a block lives.

use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default edge length of a cluster, in blocks.
pub const DEFAULT_CLUSTER_SIZE: usize = 8;
/// Default number of clusters stacked in a chunk.
pub const DEFAULT_CHUNK_HEIGHT: usize = 8;
/// Default edge length of the world, in chunks.
pub const DEFAULT_WORLD_SIZE: usize = 8;

/// Sizes of the three storage levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldDimensions {
    /// Edge length of a cluster, in blocks (`CLUSTER_SIZE`).
    pub cluster_size: usize,
    /// Clusters per chunk (`CHUNK_HEIGHT`).
    pub chunk_height: usize,
    /// Chunks along each horizontal axis (`WORLD_SIZE`).
    pub world_size: usize,
}

impl Default for WorldDimensions {
    fn default() -> Self {
        Self {
            cluster_size: DEFAULT_CLUSTER_SIZE,
            chunk_height: DEFAULT_CHUNK_HEIGHT,
            world_size: DEFAULT_WORLD_SIZE,
        }
    }
}

/// Position of a cluster in the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterAddress {
    /// Chunk column along X.
    pub chunk_x: usize,
    /// Chunk column along Z.
    pub chunk_z: usize,
    /// Index of the cluster within its chunk, bottom to top.
    pub cluster_y: usize,
}

impl ClusterAddress {
    /// Creates an address from its parts.
    pub fn new(chunk_x: usize, chunk_z: usize, cluster_y: usize) -> Self {
        Self {
            chunk_x,
            chunk_z,
            cluster_y,
        }
    }

    /// The cluster position in cluster units, `(chunk_x, cluster_y, chunk_z)`.
    pub fn position(&self) -> Point3<i32> {
        Point3::new(self.chunk_x as i32, self.cluster_y as i32, self.chunk_z as i32)
    }

    /// Inverse of [`position`](Self::position); `None` for negative components.
    pub fn from_position(position: Point3<i32>) -> Option<Self> {
        Some(Self {
            chunk_x: usize::try_from(position.x).ok()?,
            chunk_z: usize::try_from(position.z).ok()?,
            cluster_y: usize::try_from(position.y).ok()?,
        })
    }
}

/// An absolute block position split into its cluster and the position inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockAddress {
    /// The owning cluster.
    pub cluster: ClusterAddress,
    /// Position inside the cluster, each component in `0..cluster_size`.
    pub local: Point3<usize>,
}

impl WorldDimensions {
    /// Creates dimensions from the cluster size, chunk height and world size.
    pub fn new(cluster_size: usize, chunk_height: usize, world_size: usize) -> Self {
        Self {
            cluster_size,
            chunk_height,
            world_size,
        }
    }

    /// Rejects zero sizes and worlds whose block extent does not fit an `i32`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("cluster_size", self.cluster_size),
            ("chunk_height", self.chunk_height),
            ("world_size", self.world_size),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be greater than zero")));
            }
        }

        let fits = |levels: usize| {
            levels
                .checked_mul(self.cluster_size)
                .and_then(|blocks| i32::try_from(blocks).ok())
                .is_some()
        };
        let volume = self
            .cluster_size
            .checked_pow(3)
            .and_then(|blocks| blocks.checked_mul(6));
        if !fits(self.world_size) || !fits(self.chunk_height) || volume.is_none() {
            return Err(ConfigError::Invalid(format!(
                "world of {0}x{1}x{0} clusters of size {2} is too large",
                self.world_size, self.chunk_height, self.cluster_size
            )));
        }

        Ok(())
    }

    /// Number of blocks in one cluster.
    pub fn cluster_volume(&self) -> usize {
        self.cluster_size * self.cluster_size * self.cluster_size
    }

    /// Horizontal extent of the world, in blocks.
    pub fn world_extent(&self) -> i32 {
        (self.world_size * self.cluster_size) as i32
    }

    /// Vertical extent of the world, in blocks.
    pub fn world_height(&self) -> i32 {
        (self.chunk_height * self.cluster_size) as i32
    }

    /// Total number of clusters in the world.
    pub fn cluster_count(&self) -> usize {
        self.world_size * self.world_size * self.chunk_height
    }

    /// Whether an absolute block position lies inside the world.
    pub fn contains(&self, position: Point3<i32>) -> bool {
        (0..self.world_extent()).contains(&position.x)
            && (0..self.world_height()).contains(&position.y)
            && (0..self.world_extent()).contains(&position.z)
    }

    /// Whether a cluster address lies inside the world grid.
    pub fn contains_cluster(&self, address: ClusterAddress) -> bool {
        address.chunk_x < self.world_size
            && address.chunk_z < self.world_size
            && address.cluster_y < self.chunk_height
    }

    /// Splits an absolute block position. `None` outside the world.
    pub fn decompose(&self, position: Point3<i32>) -> Option<BlockAddress> {
        if !self.contains(position) {
            return None;
        }

        let size = self.cluster_size;
        let (x, y, z) = (position.x as usize, position.y as usize, position.z as usize);

        Some(BlockAddress {
            cluster: ClusterAddress::new(x / size, z / size, y / size),
            local: Point3::new(x % size, y % size, z % size),
        })
    }

    /// Joins a block address back into an absolute position.
    pub fn compose(&self, address: &BlockAddress) -> Point3<i32> {
        self.cluster_origin(address.cluster)
            + Vector3::new(
                address.local.x as i32,
                address.local.y as i32,
                address.local.z as i32,
            )
    }

    /// Absolute position of a cluster's `(0, 0, 0)` block.
    pub fn cluster_origin(&self, address: ClusterAddress) -> Point3<i32> {
        let size = self.cluster_size as i32;
        let position = address.position();
        Point3::new(position.x * size, position.y * size, position.z * size)
    }

    /// Every cluster address, chunks in row-major order (X outer, Z inner) and each
    /// chunk's clusters bottom to top.
    pub fn cluster_addresses(&self) -> impl Iterator<Item = ClusterAddress> {
        let (world_size, chunk_height) = (self.world_size, self.chunk_height);

        (0..world_size).flat_map(move |chunk_x| {
            (0..world_size).flat_map(move |chunk_z| {
                (0..chunk_height)
                    .map(move |cluster_y| ClusterAddress::new(chunk_x, chunk_z, cluster_y))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> WorldDimensions {
        WorldDimensions::new(4, 3, 2)
    }

    #[test]
    fn decompose_then_compose_is_identity() {
        let dims = small();
        for x in 0..dims.world_extent() {
            for y in 0..dims.world_height() {
                for z in 0..dims.world_extent() {
                    let position = Point3::new(x, y, z);
                    let address = dims.decompose(position).unwrap();
                    assert!(dims.contains_cluster(address.cluster));
                    assert_eq!(dims.compose(&address), position);
                }
            }
        }
    }

    #[test]
    fn decompose_splits_along_cluster_boundaries() {
        let address = small().decompose(Point3::new(5, 9, 3)).unwrap();
        assert_eq!(address.cluster, ClusterAddress::new(1, 0, 2));
        assert_eq!(address.local, Point3::new(1, 1, 3));
    }

    #[test]
    fn out_of_world_positions_have_no_address() {
        let dims = small();
        assert_eq!(dims.decompose(Point3::new(-1, 0, 0)), None);
        assert_eq!(dims.decompose(Point3::new(0, 12, 0)), None);
        assert_eq!(dims.decompose(Point3::new(0, 0, 8)), None);
    }

    #[test]
    fn cluster_addresses_are_row_major_bottom_to_top() {
        let dims = small();
        let addresses: Vec<_> = dims.cluster_addresses().collect();

        assert_eq!(addresses.len(), dims.cluster_count());
        assert_eq!(addresses[0], ClusterAddress::new(0, 0, 0));
        assert_eq!(addresses[1], ClusterAddress::new(0, 0, 1));
        assert_eq!(addresses[3], ClusterAddress::new(0, 1, 0));
        assert_eq!(addresses[6], ClusterAddress::new(1, 0, 0));
    }

    #[test]
    fn cluster_position_round_trips() {
        let address = ClusterAddress::new(3, 1, 2);
        assert_eq!(address.position(), Point3::new(3, 2, 1));
        assert_eq!(ClusterAddress::from_position(address.position()), Some(address));
        assert_eq!(ClusterAddress::from_position(Point3::new(-1, 0, 0)), None);
    }

    #[test]
    fn zero_sizes_are_invalid() {
        assert!(WorldDimensions::new(0, 1, 1).validate().is_err());
        assert!(WorldDimensions::new(1, 1, usize::MAX).validate().is_err());
        assert!(WorldDimensions::default().validate().is_ok());
    }
}
