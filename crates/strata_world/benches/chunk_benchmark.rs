//! Benchmark for chunk generation and collision queries.
//!
//! Run with: cargo bench --package strata_world --bench chunk_benchmark

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use strata_world::{
    AltWorldGenerator, Chunk, ChunkCoord, CollisionQuery, KinematicBody, MotionConfig,
    TerrainGenerator, World, WorldSeed,
};

fn benchmark_single_chunk(c: &mut Criterion) {
    let generator = TerrainGenerator::new();
    let mut rng = WorldSeed::new(42).stream();

    c.bench_function("single_chunk_generation", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            let mut chunk = Chunk::new(ChunkCoord::new(coord, coord / 2), 32);
            generator.generate(&mut chunk, &mut rng);
            black_box(chunk)
        });
    });
}

fn benchmark_alt_world_chunk(c: &mut Criterion) {
    let generator = AltWorldGenerator::new();

    c.bench_function("alt_world_chunk_generation", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            let mut chunk = Chunk::new(ChunkCoord::new(coord % 64, coord % 5), 32);
            black_box(generator.generate(&mut chunk));
            black_box(chunk)
        });
    });
}

fn benchmark_render_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_window");

    // Radius 3 = 7x7 chunks
    group.throughput(Throughput::Elements(49));
    group.bench_function("initial_window_r3", |b| {
        b.iter(|| {
            let mut world = World::with_seed(42);
            black_box(world.update_rendered_chunks(0.0, 0.0, 3))
        });
    });

    group.bench_function("walk_one_chunk_per_update", |b| {
        let mut world = World::with_seed(42);
        let mut x = 0.0f32;
        b.iter(|| {
            x += 384.0;
            black_box(world.update_rendered_chunks(x, 0.0, 3))
        });
    });

    group.finish();
}

fn benchmark_collision(c: &mut Criterion) {
    let mut world = World::with_seed(42);
    world.update_rendered_chunks(0.0, 0.0, 3);

    c.bench_function("check_block_collision", |b| {
        let mut x = -1000.0f32;
        b.iter(|| {
            x = if x > 1000.0 { -1000.0 } else { x + 7.0 };
            black_box(world.check_block_collision(black_box(x), 40.0, 64.0, 64.0))
        });
    });

    c.bench_function("body_step", |b| {
        let mut body = KinematicBody::new(0.0, -200.0, 64.0, 64.0, MotionConfig::default());
        b.iter(|| {
            body.walk(1.0, 1.0 / 60.0);
            if body.x > 1000.0 {
                body.place_at(0.0, -200.0);
            }
            black_box(body.step(&world, 1.0 / 60.0))
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = benchmark_single_chunk,
              benchmark_alt_world_chunk,
              benchmark_render_window,
              benchmark_collision
}

criterion_main!(benches);
