//! # Engine State Module
//!
//! The core engine module that owns the world and everything needed to build and draw
//! it.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `linear_heap` - The byte budget that backs every mesh buffer
//! * `rendering` - Meshing, mesh buffers, matrix stacks and backends
//! * `voxels` - Voxel data, chunks, the world and its generator
//!
//! ## Architecture
//!
//! `EngineState` is the central coordinator: it builds the world from the
//! configuration, runs the generator over it, and draws it through the render
//! context. No subsystem reaches for shared state on its own; the allocator handle,
//! matrix stacks and backend are all owned by the render context and passed down.

use cgmath::{Deg, Matrix4, Point3, Vector3};
use log::info;

use crate::config::EngineConfig;
use crate::error::Result;

pub mod linear_heap;
pub mod rendering;
pub mod voxels;

use linear_heap::LinearHeap;
use rendering::{
    backend::RenderBackend,
    meshing::{MeshReport, Mesher},
    transform::MatrixType,
    FrameStats, RenderContext,
};
use voxels::{
    block::Block,
    generation::{GenerationReport, WorldGenerator},
    world::World,
};

/// Vertical field of view of the default camera.
const FIELD_OF_VIEW: Deg<f32> = Deg(45.0);
/// Aspect ratio of the default camera.
const ASPECT_RATIO: f32 = 400.0 / 240.0;
/// Near clip plane distance.
const NEAR_PLANE: f32 = 0.1;
/// Far clip plane distance.
const FAR_PLANE: f32 = 1000.0;

/// The main state container for the voxel world.
///
/// # Examples
///
/// ```
/// use voxel_world::{CommandListBackend, EngineConfig, EngineState};
///
/// let config = EngineConfig::from_json_str(
///     r#"{ "world": { "cluster_size": 4, "chunk_height": 2, "world_size": 2 } }"#,
/// )
/// .unwrap();
/// let mut engine = EngineState::new(config, CommandListBackend::new()).unwrap();
///
/// engine.generate_world().unwrap();
/// let first = engine.render_frame().unwrap();
/// let second = engine.render_frame().unwrap();
/// assert_eq!(first.clusters_drawn, second.replayed);
/// ```
pub struct EngineState<B: RenderBackend> {
    /// Configuration the engine was built from
    config: EngineConfig,
    /// The voxel world containing all chunk data
    world: World,
    /// Fills the world from the configured elevation source
    generator: WorldGenerator,
    /// Reused across every cluster meshed by this engine
    mesher: Mesher,
    /// Matrix stacks, allocator handle and backend
    render_context: RenderContext<B>,
}

impl<B: RenderBackend> EngineState<B> {
    /// Creates a new engine state with all subsystems initialized.
    ///
    /// The world starts empty; call [`generate_world`](Self::generate_world) to fill
    /// and mesh it.
    pub fn new(config: EngineConfig, backend: B) -> Result<Self> {
        config.validate()?;

        let world = World::new(config.world)?;
        let generator = WorldGenerator::from_boxed(config.build_elevation());
        let allocator = LinearHeap::shared(config.allocator_capacity);
        let mut render_context = RenderContext::new(allocator, backend);

        let transforms = render_context.transforms_mut();
        transforms.matrix_mode(MatrixType::PROJECTION);
        transforms.projection(FIELD_OF_VIEW, ASPECT_RATIO, NEAR_PLANE, FAR_PLANE);
        transforms.matrix_mode(MatrixType::MODELVIEW);
        transforms.load_matrix(Self::overview_camera(&world));

        info!(
            "Engine initialized: {0}x{0} chunks of {1} clusters, {2} byte heap",
            config.world.world_size, config.world.chunk_height, config.allocator_capacity
        );

        Ok(Self {
            config,
            world,
            generator,
            mesher: Mesher::new(),
            render_context,
        })
    }

    /// A camera above one corner of the world looking at its centre.
    fn overview_camera(world: &World) -> Matrix4<f32> {
        let dimensions = world.dimensions();
        let extent = dimensions.world_extent() as f32;
        let height = dimensions.world_height() as f32;

        Matrix4::look_at_rh(
            Point3::new(-extent * 0.25, height * 1.5, -extent * 0.25),
            Point3::new(extent * 0.5, height * 0.5, extent * 0.5),
            Vector3::unit_y(),
        )
    }

    /// Runs both generation passes over the whole world.
    pub fn generate_world(&mut self) -> Result<GenerationReport> {
        self.generator.generate(
            &mut self.world,
            &mut self.mesher,
            self.render_context.allocator(),
        )
    }

    /// Draws every cluster of the world.
    pub fn render_frame(&mut self) -> Result<FrameStats> {
        self.render_context.draw_world(&mut self.world)
    }

    /// Edits one block and rebuilds the geometry of every cluster it affects.
    pub fn set_block(&mut self, position: Point3<i32>, block: Block) -> Result<Vec<MeshReport>> {
        let stale = self.world.set_block(position, block)?;
        WorldGenerator::remesh(
            &mut self.world,
            &stale,
            &mut self.mesher,
            self.render_context.allocator(),
        )
    }

    /// The configuration the engine was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The voxel world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The voxel world, mutably. Edits made here are not remeshed automatically.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Matrix stacks, allocator handle and backend.
    pub fn render_context(&self) -> &RenderContext<B> {
        &self.render_context
    }

    /// Matrix stacks, allocator handle and backend, mutably.
    pub fn render_context_mut(&mut self) -> &mut RenderContext<B> {
        &mut self.render_context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainMethod;
    use crate::engine_state::rendering::backend::CommandListBackend;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn flat_engine() -> EngineState<CommandListBackend> {
        let mut config = EngineConfig::default();
        config.world = voxels::coordinates::WorldDimensions::new(4, 2, 2);
        config.terrain.method = TerrainMethod::Flat;
        config.terrain.flat_height = 2;
        EngineState::new(config, CommandListBackend::new()).unwrap()
    }

    #[test]
    fn projection_and_camera_are_installed() {
        let engine = flat_engine();
        let transforms = engine.render_context().transforms();
        assert_eq!(transforms.mode(), MatrixType::MODELVIEW);
        assert!(transforms.is_dirty(MatrixType::PROJECTION));
    }

    #[test]
    fn set_block_remeshes_the_affected_clusters() {
        let mut engine = flat_engine();
        engine.generate_world().unwrap();

        let reports = engine
            .set_block(Point3::new(1, 2, 1), Block::new(BlockType::WOOD))
            .unwrap();
        assert_eq!(reports.len(), 1);
        // Top, floor, and the two sides on the world edge, then the new block's five
        // faces minus the grass top it covers.
        assert_eq!(reports[0].face_count, 16 + 16 + 8 + 8 + 5 - 1);
    }

    #[test]
    fn frames_replay_after_the_first() {
        let mut engine = flat_engine();
        engine.generate_world().unwrap();

        let first = engine.render_frame().unwrap();
        let second = engine.render_frame().unwrap();
        assert_eq!(first.clusters_drawn, 4);
        assert_eq!(first.clusters_skipped, 4);
        assert_eq!(second.replayed, 4);
        assert_eq!(engine.render_context().backend().stats().captures, 4);
    }
}
