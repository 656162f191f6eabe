//! Broad-phase candidate generation.
//!
//! Both strategies return a superset of the true AABB overlap set: false
//! positives are fine and get culled by the narrow phase, false negatives
//! are not. Output order is a deterministic function of the input order so
//! downstream event sequences are reproducible.

use std::collections::{HashMap, HashSet};

use crate::pair::CollisionPair;
use crate::types::Aabb;

/// Produces unordered candidate pairs from an item collection and a bounds
/// provider. `bounds_of` must be pure for the duration of the call.
pub trait BroadPhase<T: Clone> {
    fn find_potential_pairs(
        &self,
        items: &[T],
        bounds_of: &dyn Fn(&T) -> Aabb,
    ) -> Vec<CollisionPair<T>>;
}

/// Uniform spatial hash over integer grid cells.
///
/// Each AABB is discretized into the cell range `[floor(min/c), floor(max/c)]`
/// per axis; every pair of items co-occupying a cell becomes a candidate,
/// deduplicated across cells.
#[derive(Debug, Clone, Copy)]
pub struct SpatialHash {
    cell_size: f64,
}

impl SpatialHash {
    /// # Panics
    ///
    /// Panics when `cell_size` is not finite and positive.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        assert!(
            cell_size.is_finite() && cell_size > 0.0,
            "cell size must be finite and > 0"
        );
        Self { cell_size }
    }

    fn cell_range(&self, bounds: &Aabb) -> ([i64; 3], [i64; 3]) {
        let lo = (bounds.min / self.cell_size).floor();
        let hi = (bounds.max / self.cell_size).floor();
        (
            [lo.x as i64, lo.y as i64, lo.z as i64],
            [hi.x as i64, hi.y as i64, hi.z as i64],
        )
    }
}

impl<T: Clone> BroadPhase<T> for SpatialHash {
    fn find_potential_pairs(
        &self,
        items: &[T],
        bounds_of: &dyn Fn(&T) -> Aabb,
    ) -> Vec<CollisionPair<T>> {
        let mut cells: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let mut pairs = Vec::new();

        for (index, item) in items.iter().enumerate() {
            let (lo, hi) = self.cell_range(&bounds_of(item));
            for x in lo[0]..=hi[0] {
                for y in lo[1]..=hi[1] {
                    for z in lo[2]..=hi[2] {
                        let occupants = cells.entry((x, y, z)).or_default();
                        for &other in occupants.iter() {
                            // Earlier insertion index first keeps the dedup
                            // key canonical and the output order stable.
                            if seen.insert((other, index)) {
                                pairs.push(CollisionPair::new(
                                    items[other].clone(),
                                    item.clone(),
                                ));
                            }
                        }
                        occupants.push(index);
                    }
                }
            }
        }
        pairs
    }
}

/// Sweep and prune along the X axis.
///
/// Items are stably sorted by `min.x`; an active list is pruned by `max.x`
/// and surviving entries are tested for Y/Z interval overlap. Complexity is
/// output-sensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepAndPrune;

impl SweepAndPrune {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<T: Clone> BroadPhase<T> for SweepAndPrune {
    fn find_potential_pairs(
        &self,
        items: &[T],
        bounds_of: &dyn Fn(&T) -> Aabb,
    ) -> Vec<CollisionPair<T>> {
        let bounds: Vec<Aabb> = items.iter().map(bounds_of).collect();
        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| bounds[a].min.x.total_cmp(&bounds[b].min.x));

        let mut active: Vec<usize> = Vec::new();
        let mut pairs = Vec::new();
        for &index in &order {
            let current = &bounds[index];
            active.retain(|&other| bounds[other].max.x >= current.min.x);
            for &other in &active {
                let candidate = &bounds[other];
                if candidate.min.y <= current.max.y
                    && candidate.max.y >= current.min.y
                    && candidate.min.z <= current.max.z
                    && candidate.max.z >= current.min.z
                {
                    pairs.push(CollisionPair::new(items[other].clone(), items[index].clone()));
                }
            }
            active.push(index);
        }
        pairs
    }
}
