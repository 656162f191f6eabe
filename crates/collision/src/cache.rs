//! Manifold cache with frame stamps and warm-start impulses.

use std::collections::HashMap;
use std::hash::Hash;

use crate::contact::ContactManifold;
use crate::pair::CollisionPair;

/// Accumulated solver impulse carried between frames for one pair.
///
/// The normal component is clamped non-negative each solver iteration; the
/// tangent component is bounded by the friction cone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WarmStartImpulse {
    pub normal: f64,
    pub tangent: f64,
}

impl WarmStartImpulse {
    pub const ZERO: WarmStartImpulse = WarmStartImpulse { normal: 0.0, tangent: 0.0 };
}

#[derive(Debug, Clone)]
struct CacheEntry {
    manifold: ContactManifold,
    stamp: u64,
    warm_start: WarmStartImpulse,
}

/// Per-pair persistence between frames, keyed by unordered pair.
///
/// Entries are created on first contact, refreshed on every `put`, and
/// expire once they go more than `max_age` frames without one.
#[derive(Debug)]
pub struct ManifoldCache<T> {
    entries: HashMap<CollisionPair<T>, CacheEntry>,
    frame: u64,
}

impl<T: Clone + Eq + Hash> ManifoldCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: HashMap::new(), frame: 0 }
    }

    /// Monotonically increasing frame counter.
    #[must_use]
    pub fn current_frame(&self) -> u64 {
        self.frame
    }

    pub fn next_frame(&mut self) {
        self.frame += 1;
    }

    /// Records the latest manifold for the pair and stamps it with the
    /// current frame. The warm-start impulse of an existing entry is kept.
    pub fn put(&mut self, pair: CollisionPair<T>, manifold: ContactManifold) {
        let stamp = self.frame;
        self.entries
            .entry(pair)
            .and_modify(|entry| {
                entry.manifold = manifold.clone();
                entry.stamp = stamp;
            })
            .or_insert_with(|| CacheEntry {
                manifold,
                stamp,
                warm_start: WarmStartImpulse::ZERO,
            });
    }

    #[must_use]
    pub fn get(&self, pair: &CollisionPair<T>) -> Option<&ContactManifold> {
        self.entries.get(pair).map(|entry| &entry.manifold)
    }

    #[must_use]
    pub fn warm_start(&self, pair: &CollisionPair<T>) -> Option<WarmStartImpulse> {
        self.entries.get(pair).map(|entry| entry.warm_start)
    }

    /// Stores the accumulated impulse for the pair. A pair without a cache
    /// entry is ignored; `put` always runs before the solver within a
    /// frame, so live pairs always have one.
    pub fn set_warm_start(&mut self, pair: &CollisionPair<T>, impulse: WarmStartImpulse) {
        if let Some(entry) = self.entries.get_mut(pair) {
            entry.warm_start = impulse;
        }
    }

    /// Drops entries not refreshed within `max_age` frames.
    pub fn prune_stale(&mut self, max_age: u64) {
        let frame = self.frame;
        self.entries.retain(|_, entry| frame - entry.stamp <= max_age);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone + Eq + Hash> Default for ManifoldCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
