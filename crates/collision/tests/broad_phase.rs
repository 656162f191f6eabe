use std::collections::HashSet;

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use collision::{Aabb, BroadPhase, CollisionPair, SpatialHash, SweepAndPrune};

fn random_aabb(rng: &mut StdRng) -> Aabb {
    let center = DVec3::new(
        rng.gen_range(-500.0..500.0),
        rng.gen_range(-500.0..500.0),
        rng.gen_range(-500.0..500.0),
    );
    let size = DVec3::new(
        rng.gen_range(0.01..40.0),
        rng.gen_range(0.01..40.0),
        rng.gen_range(0.01..40.0),
    );
    Aabb::from_center_half_extents(center, size * 0.5)
}

fn brute_force_overlaps(bounds: &[Aabb]) -> HashSet<CollisionPair<usize>> {
    let mut out = HashSet::new();
    for i in 0..bounds.len() {
        for j in (i + 1)..bounds.len() {
            if bounds[i].intersects(&bounds[j]) {
                out.insert(CollisionPair::new(i, j));
            }
        }
    }
    out
}

#[test]
fn thousand_random_boxes_contain_all_brute_force_overlaps() {
    let mut rng = StdRng::seed_from_u64(101);
    let bounds: Vec<Aabb> = (0..1000).map(|_| random_aabb(&mut rng)).collect();
    let items: Vec<usize> = (0..bounds.len()).collect();
    let bounds_of = |i: &usize| bounds[*i];

    let brute = brute_force_overlaps(&bounds);
    assert!(!brute.is_empty(), "seed should produce some overlaps");

    let sap: HashSet<CollisionPair<usize>> = SweepAndPrune::new()
        .find_potential_pairs(&items, &bounds_of)
        .into_iter()
        .collect();
    let hash: HashSet<CollisionPair<usize>> = SpatialHash::new(16.0)
        .find_potential_pairs(&items, &bounds_of)
        .into_iter()
        .collect();

    assert!(brute.iter().all(|pair| sap.contains(pair)));
    assert!(brute.iter().all(|pair| hash.contains(pair)));
}

#[test]
fn candidate_order_is_deterministic_for_identical_input() {
    let mut rng = StdRng::seed_from_u64(7);
    let bounds: Vec<Aabb> = (0..200).map(|_| random_aabb(&mut rng)).collect();
    let items: Vec<usize> = (0..bounds.len()).collect();
    let bounds_of = |i: &usize| bounds[*i];

    let first = SpatialHash::new(16.0).find_potential_pairs(&items, &bounds_of);
    let second = SpatialHash::new(16.0).find_potential_pairs(&items, &bounds_of);
    assert_eq!(first, second);

    let first = SweepAndPrune::new().find_potential_pairs(&items, &bounds_of);
    let second = SweepAndPrune::new().find_potential_pairs(&items, &bounds_of);
    assert_eq!(first, second);
}

#[test]
fn tiny_cell_size_still_yields_a_superset() {
    let mut rng = StdRng::seed_from_u64(13);
    let bounds: Vec<Aabb> = (0..100)
        .map(|_| {
            let center = DVec3::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            );
            Aabb::from_center_half_extents(center, DVec3::splat(rng.gen_range(0.05..1.0)))
        })
        .collect();
    let items: Vec<usize> = (0..bounds.len()).collect();
    let bounds_of = |i: &usize| bounds[*i];

    let brute = brute_force_overlaps(&bounds);
    let hash: HashSet<CollisionPair<usize>> = SpatialHash::new(0.75)
        .find_potential_pairs(&items, &bounds_of)
        .into_iter()
        .collect();
    assert!(brute.iter().all(|pair| hash.contains(pair)));
}
