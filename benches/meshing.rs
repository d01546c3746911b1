//! Benchmarks for cluster meshing and whole-world generation.
//!
//! Run with: cargo bench --bench meshing

use cgmath::Point3;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use voxel_world::*;

fn checkerboard(size: usize) -> Cluster {
    let mut cluster = Cluster::new(size, Point3::new(0, 0, 0));
    let stone = Block::new(BlockType::STONE);
    let size = size as i32;
    for x in 0..size {
        for y in 0..size {
            for z in 0..size {
                if (x + y + z) % 2 == 0 {
                    let _ = cluster.set_block(Point3::new(x, y, z), stone);
                }
            }
        }
    }
    cluster
}

fn benchmark_worst_case_cluster(c: &mut Criterion) {
    let heap = LinearHeap::shared(64 * 1024 * 1024);
    let cluster = checkerboard(16);
    let mut mesher = Mesher::new();

    let mut group = c.benchmark_group("cluster_meshing");
    group.throughput(Throughput::Elements(16 * 16 * 16));
    group.bench_function("checkerboard_16", |b| {
        b.iter(|| black_box(mesher.mesh_cluster(black_box(&cluster), None, &heap)))
    });
    group.finish();
}

fn benchmark_world_generation(c: &mut Criterion) {
    let heap = LinearHeap::shared(256 * 1024 * 1024);
    let dimensions = WorldDimensions::new(8, 4, 8);
    let generator = WorldGenerator::new(NoiseElevation::new(42, dimensions));
    let mut world = match World::new(dimensions) {
        Ok(world) => world,
        Err(err) => panic!("invalid benchmark world: {err}"),
    };
    let mut mesher = Mesher::new();

    let mut group = c.benchmark_group("world_generation");
    group.sample_size(10);
    group.throughput(Throughput::Elements(dimensions.cluster_count() as u64));
    group.bench_function("noise_8x8_chunks", |b| {
        b.iter(|| black_box(generator.generate(&mut world, &mut mesher, &heap)))
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_worst_case_cluster,
    benchmark_world_generation
);
criterion_main!(benches);
