//! Time-of-impact helpers for swept queries.
//!
//! These share the slab-clipping primitives of the ray tests. Full
//! conservative-advancement CCD is out of scope; the convex sweep below is
//! a sampled bracketing followed by bisection over the intersection test.

use glam::DVec3;

use super::gjk::{self, SupportFn};
use crate::types::Aabb;

/// First time of impact in `[0, 1]` for the segment `start -> end` against
/// the box, or `None` when the sweep misses.
///
/// # Panics
///
/// Panics when an endpoint is non-finite.
#[must_use]
pub fn segment_aabb_time_of_impact(start: DVec3, end: DVec3, aabb: &Aabb) -> Option<f64> {
    assert!(start.is_finite() && end.is_finite(), "segment endpoints must be finite");
    let dir = end - start;
    let mut t_min: f64 = 0.0;
    let mut t_max: f64 = 1.0;

    for axis in 0..3 {
        let origin = start[axis];
        let d = dir[axis];
        if d == 0.0 {
            if origin < aabb.min[axis] || origin > aabb.max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (aabb.min[axis] - origin) * inv;
        let mut t1 = (aabb.max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_max < t_min {
            return None;
        }
    }
    Some(t_min)
}

/// First time of impact in `[0, 1]` for a box swept by `delta` against a
/// static box, via the expanded-target/center-segment reduction.
///
/// # Panics
///
/// Panics when `delta` is non-finite.
#[must_use]
pub fn swept_aabb_time_of_impact(moving: &Aabb, delta: DVec3, target: &Aabb) -> Option<f64> {
    assert!(delta.is_finite(), "sweep delta must be finite");
    let half = moving.size() * 0.5;
    let expanded = Aabb::new(target.min - half, target.max + half);
    let start = moving.center();
    segment_aabb_time_of_impact(start, start + delta, &expanded)
}

/// Approximate first time of impact in `[0, 1]` for two moving convex
/// shapes, with default sampling (32 coarse steps, 24 bisections).
#[must_use]
pub fn swept_convex_time_of_impact(
    shape_a: &dyn SupportFn,
    delta_a: DVec3,
    shape_b: &dyn SupportFn,
    delta_b: DVec3,
) -> Option<f64> {
    swept_convex_time_of_impact_with(shape_a, delta_a, shape_b, delta_b, 32, 24)
}

/// Approximate first time of impact for two moving convex shapes.
///
/// Coarse sampling brackets the first colliding step, bisection refines
/// the bracket. Collisions thinner than a coarse step can be missed; this
/// is a sampling method, not conservative advancement.
///
/// # Panics
///
/// Panics when `samples < 2`, `refinements < 1`, or a delta is non-finite.
#[must_use]
pub fn swept_convex_time_of_impact_with(
    shape_a: &dyn SupportFn,
    delta_a: DVec3,
    shape_b: &dyn SupportFn,
    delta_b: DVec3,
    samples: usize,
    refinements: usize,
) -> Option<f64> {
    assert!(samples >= 2, "samples must be >= 2");
    assert!(refinements >= 1, "refinements must be >= 1");
    assert!(delta_a.is_finite() && delta_b.is_finite(), "deltas must be finite");

    if gjk::intersects(shape_a, shape_b) {
        return Some(0.0);
    }

    let intersects_at = |t: f64| {
        let moved_a = |dir: DVec3| shape_a.support(dir) + delta_a * t;
        let moved_b = |dir: DVec3| shape_b.support(dir) + delta_b * t;
        gjk::intersects(&moved_a, &moved_b)
    };

    let mut previous = 0.0;
    for i in 1..=samples {
        let t = i as f64 / samples as f64;
        if intersects_at(t) {
            let mut low = previous;
            let mut high = t;
            for _ in 0..refinements {
                let mid = (low + high) * 0.5;
                if intersects_at(mid) {
                    high = mid;
                } else {
                    low = mid;
                }
            }
            return Some(high);
        }
        previous = t;
    }
    None
}
