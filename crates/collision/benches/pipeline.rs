use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use collision::contact::aabb_vs_aabb;
use collision::{Aabb, BroadPhase, CollisionWorld, SpatialHash, SweepAndPrune};

fn scattered_bounds(count: usize, seed: u64) -> Vec<Aabb> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let center = DVec3::new(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            );
            Aabb::from_center_half_extents(center, DVec3::splat(rng.gen_range(0.5..3.0)))
        })
        .collect()
}

fn bench_broad_phase(c: &mut Criterion) {
    let bounds = scattered_bounds(1000, 42);
    let items: Vec<usize> = (0..bounds.len()).collect();

    c.bench_function("spatial_hash_1000", |b| {
        let hash = SpatialHash::new(8.0);
        b.iter(|| black_box(hash.find_potential_pairs(&items, &|i: &usize| bounds[*i])));
    });
    c.bench_function("sweep_and_prune_1000", |b| {
        let sap = SweepAndPrune::new();
        b.iter(|| black_box(sap.find_potential_pairs(&items, &|i: &usize| bounds[*i])));
    });
}

fn bench_world_update(c: &mut Criterion) {
    let bounds = scattered_bounds(200, 7);
    let items: Vec<usize> = (0..bounds.len()).collect();
    let narrow_bounds = bounds.clone();
    let mut world = CollisionWorld::new(
        Box::new(SweepAndPrune::new()),
        move |i: &usize| bounds[*i],
        |_: &usize| None,
        move |a: &usize, b: &usize| aabb_vs_aabb(&narrow_bounds[*a], &narrow_bounds[*b]),
    );

    c.bench_function("world_update_200_static", |b| {
        b.iter(|| black_box(world.update(&items)));
    });
}

criterion_group!(benches, bench_broad_phase, bench_world_update);
criterion_main!(benches);
