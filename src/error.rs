//! # Error Types
//!
//! All errors that can be reported by the voxel world.
//!
//! Out-of-range block queries are not errors: they resolve to the "no block" sentinel
//! (`None`) because the mesher deliberately looks one voxel past every cluster boundary.
//! Allocation failure while meshing is not an error either: the cluster stays
//! ungenerated and renders nothing. Everything else below is surfaced to the caller.

use cgmath::Point3;
use thiserror::Error;

use crate::engine_state::voxels::coordinates::ClusterAddress;

/// Convenience alias for results carrying the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the shared linear heap.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// The heap's byte budget cannot satisfy the request.
    #[error("linear heap exhausted: requested {requested} bytes, {available} available")]
    OutOfMemory {
        /// Bytes requested.
        requested: u64,
        /// Bytes still available in the heap.
        available: u64,
    },

    /// The request does not fit in the address space of this platform.
    #[error("allocation of {0} bytes is not addressable")]
    Unaddressable(u64),

    /// The system allocator refused to back the region.
    #[error("system allocator refused {0} bytes")]
    SystemExhausted(u64),
}

/// Contract violations on a [`MeshBuffer`](crate::MeshBuffer).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshBufferError {
    /// An append would overflow the region sized at allocation time. This is a sizing
    /// bug in the caller, not memory pressure.
    #[error("mesh buffer capacity exceeded: tried to append {requested} bytes, {remaining} remaining")]
    CapacityExceeded {
        /// Bytes the append tried to write.
        requested: u64,
        /// Bytes left before `max_size`.
        remaining: u64,
    },

    /// The buffer holds no allocated region.
    #[error("mesh buffer has no allocated region")]
    NotAllocated,

    /// An append carried no bytes.
    #[error("refusing to append an empty slice")]
    EmptyWrite,

    /// The draw commands were already compiled for this generation.
    #[error("draw commands already compiled for this generation")]
    AlreadyCompiled,

    /// The buffer holds no geometry to draw or compile.
    #[error("mesh buffer holds no geometry")]
    NothingToDraw,
}

/// Structural misuse of the world stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// A cluster address outside the world grid.
    #[error("cluster address {0:?} is outside the world")]
    ClusterOutOfRange(ClusterAddress),

    /// A block write outside the addressed store.
    #[error("block position {0:?} is outside the store")]
    BlockOutOfRange(Point3<i32>),
}

/// Matrix stack misuse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Push past the maximum stack depth.
    #[error("matrix stack overflow (depth {0})")]
    StackOverflow(usize),

    /// Pop of the base matrix.
    #[error("matrix stack underflow")]
    StackUnderflow,
}

/// Configuration loading and validation failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid JSON for [`EngineConfig`](crate::EngineConfig).
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Crate-level error.
#[derive(Error, Debug)]
pub enum Error {
    /// See [`AllocationError`].
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// See [`MeshBufferError`].
    #[error(transparent)]
    MeshBuffer(#[from] MeshBufferError),

    /// See [`WorldError`].
    #[error(transparent)]
    World(#[from] WorldError),

    /// See [`TransformError`].
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
}
