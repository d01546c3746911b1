//! # Voxel Storage
//!
//! This module contains the voxel data model: blocks, the clusters that store them,
//! the chunks that stack clusters, and the world that lays chunks out on a grid.
//!
//! ## Architecture
//!
//! * **Block**: a single type byte; AIR is the only non-solid type
//! * **Cluster**: a dense cube of blocks that owns a mesh buffer
//! * **Chunk**: a vertical stack of clusters sharing one horizontal position
//! * **World**: a dense square grid of chunks, the only place absolute coordinates
//!   are translated (through `coordinates`)
//! * **Generation**: the two-pass fill-then-mesh world generator
//!
//! ## Data Flow
//!
//! 1. The generator fills every cluster from an elevation source
//! 2. The mesher reads each cluster, plus the world for boundary neighbors
//! 3. Edits go through the world, which reports the clusters that need remeshing

pub mod block;
pub mod chunk;
pub mod cluster;
pub mod coordinates;
pub mod generation;
pub mod world;
