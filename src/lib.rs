#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A hierarchical voxel world (world → chunk → cluster → block) together with the
//! face-culling mesher that turns its occupied volume into renderable triangles.
//!
//! ## Key Modules
//!
//! * `core` - Shared resource containers used throughout the crate
//! * `config` - Serde-backed engine configuration
//! * `engine_state` - Voxel storage, world generation, meshing and drawing
//! * `error` - Error types for every fallible operation
//!
//! ## Architecture
//!
//! * Voxel data lives in clusters (`CLUSTER_SIZE³` blocks), stacked vertically into chunks,
//!   which are laid out on a square grid to form the world
//! * The world is the sole authority for translating absolute block coordinates into
//!   chunk/cluster/local coordinates, so boundary faces can see neighbouring data
//! * Every cluster owns a mesh buffer allocated from a shared linear heap; its draw
//!   commands are compiled once per generation and replayed on every draw
//! * Rendering is delegated to a [`RenderBackend`], which receives opaque vertex bytes
//!   and opaque command blobs
//!
//! ## Usage
//!
//! ```no_run
//! use voxel_world::{CommandListBackend, EngineConfig, EngineState};
//!
//! let mut engine = EngineState::new(EngineConfig::default(), CommandListBackend::new())?;
//! let report = engine.generate_world()?;
//! println!("{} faces", report.faces);
//! let stats = engine.render_frame()?;
//! println!("{} clusters drawn", stats.clusters_drawn);
//! # Ok::<(), voxel_world::Error>(())
//! ```

use log::{error, info};

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

pub use config::{EngineConfig, TerrainConfig, TerrainMethod};
pub use engine_state::{
    linear_heap::{AllocationId, AllocatorHandle, LinearAllocation, LinearHeap},
    rendering::{
        backend::{CommandBlob, CommandListBackend, RenderBackend, VertexSource},
        meshing::{
            face::BlockFace,
            mesh_buffer::{CacheKey, DrawPath, MeshBuffer},
            MeshOutcome, MeshReport, Mesher,
        },
        transform::{MatrixType, TransformStack},
        vertex::{Vertex, BYTES_PER_FACE, FACE_VERTEX_COUNT},
        FrameStats, RenderContext,
    },
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType, face_needed, Block, BlockTypeSize},
        chunk::Chunk,
        cluster::Cluster,
        coordinates::{BlockAddress, ClusterAddress, WorldDimensions},
        generation::{
            elevation::{Elevation, FlatElevation, NoiseElevation},
            GenerationReport, WorldGenerator,
        },
        world::World,
    },
    EngineState,
};
pub use error::{
    AllocationError, ConfigError, Error, MeshBufferError, Result, TransformError, WorldError,
};

/// Name of the environment variable holding the log filter.
pub const LOG_ENV_VARIABLE: &str = "RUST_LOG";

/// Runs the engine headless: loads the configuration named by the first command line
/// argument (defaults otherwise), generates the world and renders one frame twice,
/// once compiling every cluster's command cache and once replaying it.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env(LOG_ENV_VARIABLE)
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_path(&path),
        None => Ok(EngineConfig::default()),
    };

    let result = config
        .map_err(Error::from)
        .and_then(run_with_config);

    if let Err(err) = result {
        error!("Engine run failed: {err}");
    }
}

/// Runs a full generate-and-render cycle with the given configuration.
pub fn run_with_config(config: EngineConfig) -> Result<()> {
    let mut engine = EngineState::new(config, CommandListBackend::new())?;

    let report = engine.generate_world()?;
    info!(
        "Generated {} clusters ({} without geometry), {} faces, {} bytes",
        report.clusters_meshed, report.clusters_without_geometry, report.faces, report.bytes
    );

    for frame in 0..2 {
        let stats = engine.render_frame()?;
        info!(
            "Frame {}: {} clusters drawn, {} replayed, {} direct, {} vertices",
            frame, stats.clusters_drawn, stats.replayed, stats.direct, stats.vertices
        );
    }

    let heap = engine.render_context().allocator().get();
    info!(
        "Linear heap: {} / {} bytes in {} allocations (peak {})",
        heap.allocated_memory(),
        heap.capacity(),
        heap.live_allocations(),
        heap.peak_memory()
    );

    Ok(())
}
