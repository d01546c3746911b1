use cgmath::Point3;
use voxel_world::*;

fn heap() -> AllocatorHandle {
    LinearHeap::shared(16 * 1024 * 1024)
}

#[test]
fn lone_block_in_a_small_cluster() {
    let heap = heap();
    let mut cluster = Cluster::new(4, Point3::new(0, 0, 0));
    cluster
        .set_block(Point3::new(2, 1, 3), Block::new(BlockType::GRASS))
        .unwrap();

    let report = cluster
        .generate_geometry(&mut Mesher::new(), None, &heap)
        .unwrap();

    assert_eq!(report.face_count, 6);
    assert_eq!(report.bytes, 6 * BYTES_PER_FACE);
    assert_eq!(report.bytes, 1296);
    assert!(report.generated);
    assert_eq!(cluster.mesh_buffer().vertex_count(), 36);
}

#[test]
fn fully_enclosed_cluster_has_no_faces() {
    let mut world = World::new(WorldDimensions::new(4, 3, 3)).unwrap();
    let heap = heap();
    let mut mesher = Mesher::new();

    let report = WorldGenerator::new(FlatElevation(12))
        .generate(&mut world, &mut mesher, &heap)
        .unwrap();

    let center = world.cluster(ClusterAddress::new(1, 1, 1)).unwrap();
    assert!(center.is_generated());
    assert!(center.mesh_buffer().is_empty());
    assert!(!center.mesh_buffer().is_allocated());

    // Only the hull of the 12³ solid world is visible.
    assert_eq!(report.faces, 6 * 12 * 12);
    assert_eq!(report.empty_clusters, 1);
}

#[test]
fn all_air_cluster_is_generated_and_empty() {
    let heap = heap();
    let mut cluster = Cluster::new(16, Point3::new(0, 0, 0));

    let report = cluster
        .generate_geometry(&mut Mesher::new(), None, &heap)
        .unwrap();

    assert_eq!(report.face_count, 0);
    assert_eq!(report.bytes, 0);
    assert!(cluster.is_generated());
    assert_eq!(heap.get().total_allocations(), 0);
}

#[test]
fn checkerboard_exposes_every_face() {
    let heap = heap();
    let mut cluster = Cluster::new(16, Point3::new(0, 0, 0));
    let stone = Block::new(BlockType::STONE);
    for x in 0..16 {
        for y in 0..16 {
            for z in 0..16 {
                if (x + y + z) % 2 == 0 {
                    cluster.set_block(Point3::new(x, y, z), stone).unwrap();
                }
            }
        }
    }

    let report = cluster
        .generate_geometry(&mut Mesher::new(), None, &heap)
        .unwrap();

    assert_eq!(report.face_count, 12_288);
    assert_eq!(report.bytes, 12_288 * BYTES_PER_FACE);
    assert_eq!(heap.get().allocated_memory(), report.bytes);
}

#[test]
fn regeneration_reproduces_the_same_bytes() {
    let heap = heap();
    let mut mesher = Mesher::new();
    let mut cluster = Cluster::new(8, Point3::new(1, 0, 1));
    for i in 0..8 {
        cluster
            .set_block(Point3::new(i, i / 2, 7 - i), Block::new(BlockType::WOOD))
            .unwrap();
    }

    cluster.generate_geometry(&mut mesher, None, &heap).unwrap();
    let first = cluster.mesh_buffer().bytes().to_vec();

    cluster.destroy_geometry();
    assert!(!cluster.is_generated());
    assert_eq!(heap.get().live_allocations(), 0);

    cluster.generate_geometry(&mut mesher, None, &heap).unwrap();
    assert_eq!(cluster.mesh_buffer().bytes(), &first[..]);
    assert_eq!(heap.get().live_allocations(), 1);
}

#[test]
fn vertices_carry_the_block_type_and_stay_cluster_local() {
    let heap = heap();
    let mut cluster = Cluster::new(4, Point3::new(3, 2, 5));
    cluster
        .set_block(Point3::new(3, 3, 3), Block::new(BlockType::DIRT))
        .unwrap();
    cluster
        .generate_geometry(&mut Mesher::new(), None, &heap)
        .unwrap();

    let vertices: Vec<Vertex> = cluster
        .mesh_buffer()
        .bytes()
        .chunks_exact(std::mem::size_of::<Vertex>())
        .map(bytemuck::pod_read_unaligned)
        .collect();
    assert_eq!(vertices.len(), 36);
    for vertex in &vertices {
        assert_eq!(vertex.block_type, BlockType::DIRT as u32);
        assert!(vertex.position.iter().all(|&c| (3.0..=4.0).contains(&c)));
    }
}
