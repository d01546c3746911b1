use cgmath::Point3;
use voxel_world::*;

fn heap() -> AllocatorHandle {
    LinearHeap::shared(16 * 1024 * 1024)
}

fn face_count(world: &World, address: ClusterAddress) -> u64 {
    let cluster = world.cluster(address).unwrap();
    cluster.mesh_buffer().current_size() / BYTES_PER_FACE
}

#[test]
fn boundary_faces_see_the_neighbouring_chunk() {
    let mut world = World::new(WorldDimensions::new(4, 1, 2)).unwrap();
    let heap = heap();
    let mut mesher = Mesher::new();

    // Chunk (0, 0) is one solid cube, the others stay empty.
    let generator = WorldGenerator::new(|x: f32, z: f32| if x < 4.0 && z < 4.0 { 4 } else { 0 });
    generator.generate(&mut world, &mut mesher, &heap).unwrap();

    let solid = ClusterAddress::new(0, 0, 0);
    let open = ClusterAddress::new(1, 0, 0);
    assert_eq!(face_count(&world, solid), 6 * 16);
    assert_eq!(face_count(&world, open), 0);

    // The +X face of the cube at x = 3 is present and faces the empty chunk.
    let vertices: Vec<Vertex> = world
        .cluster(solid)
        .unwrap()
        .mesh_buffer()
        .bytes()
        .chunks_exact(std::mem::size_of::<Vertex>())
        .map(bytemuck::pod_read_unaligned)
        .collect();
    let right_facing = vertices
        .iter()
        .filter(|vertex| vertex.normal == [1.0, 0.0, 0.0])
        .count();
    assert_eq!(right_facing, 16 * FACE_VERTEX_COUNT);
    assert!(vertices
        .iter()
        .filter(|vertex| vertex.normal == [1.0, 0.0, 0.0])
        .all(|vertex| vertex.position[0] == 4.0));
}

#[test]
fn meshing_before_neighbours_are_filled_over_renders() {
    let mut world = World::new(WorldDimensions::new(4, 1, 2)).unwrap();
    let heap = heap();
    let mut mesher = Mesher::new();
    let generator = WorldGenerator::new(FlatElevation(4));
    let first = ClusterAddress::new(0, 0, 0);

    // Interleaved: only the first chunk holds data when it is meshed.
    generator.fill_data(&mut world);
    for (x, z) in [(1, 0), (0, 1), (1, 1)] {
        world.chunk_mut(x, z).unwrap().reset();
    }
    world
        .generate_cluster_geometry(first, &mut mesher, &heap)
        .unwrap();
    assert_eq!(face_count(&world, first), 6 * 16);

    // Two passes: the faces against the filled neighbours disappear.
    let report = generator.generate(&mut world, &mut mesher, &heap).unwrap();
    assert_eq!(face_count(&world, first), 4 * 16);
    assert_eq!(report.faces, 4 * 4 * 16);
    assert_eq!(report.clusters_meshed, 4);
}

#[test]
fn coordinates_round_trip_across_the_world() {
    let dimensions = WorldDimensions::new(4, 2, 3);
    let extent = dimensions.world_extent();
    let height = dimensions.world_height();

    for x in 0..extent {
        for y in 0..height {
            for z in 0..extent {
                let position = Point3::new(x, y, z);
                let address = dimensions.decompose(position).unwrap();
                assert_eq!(dimensions.compose(&address), position);
                assert!(dimensions.contains_cluster(address.cluster));
            }
        }
    }

    for outside in [
        Point3::new(-1, 0, 0),
        Point3::new(0, -1, 0),
        Point3::new(0, 0, extent),
        Point3::new(0, height, 0),
    ] {
        assert!(dimensions.decompose(outside).is_none());
    }
}

#[test]
fn generation_is_deterministic_for_a_seed() {
    let config = EngineConfig::from_json_str(
        r#"{ "world": { "cluster_size": 4, "chunk_height": 2, "world_size": 2 },
             "terrain": { "method": "noise", "seed": 7 } }"#,
    )
    .unwrap();

    let build = || {
        let mut world = World::new(config.world).unwrap();
        let heap = heap();
        WorldGenerator::from_boxed(config.build_elevation())
            .generate(&mut world, &mut Mesher::new(), &heap)
            .unwrap();
        world
            .clusters()
            .map(|(_, cluster)| cluster.mesh_buffer().bytes().to_vec())
            .collect::<Vec<_>>()
    };

    assert_eq!(build(), build());
}

#[test]
fn exhausted_heap_leaves_clusters_without_geometry() {
    let mut world = World::new(WorldDimensions::new(4, 1, 2)).unwrap();
    // Room for exactly one cluster of a flat single layer: 16 top, 16 floor, 8 sides.
    let heap = LinearHeap::shared(40 * BYTES_PER_FACE);

    let report = WorldGenerator::new(FlatElevation(1))
        .generate(&mut world, &mut Mesher::new(), &heap)
        .unwrap();

    assert_eq!(report.clusters_meshed, 4);
    assert_eq!(report.clusters_without_geometry, 3);
    assert_eq!(
        world
            .clusters()
            .filter(|(_, cluster)| cluster.is_generated())
            .count(),
        1
    );
}
