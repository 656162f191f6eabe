//! Narrow-phase intersection tests.
//!
//! Primitive pairs get direct closed-form tests; anything convex beyond the
//! primitives goes through the support-mapping core in [`gjk`] / [`epa`].
//! A two-dimensional separating-axis variant lives in [`sat`] and
//! time-of-impact helpers in [`ccd`].

pub mod ccd;
pub mod epa;
pub mod gjk;
pub mod sat;

use glam::DVec3;

use crate::types::{Aabb, Capsule, Ray, Sphere};

pub(crate) const EPS: f64 = 1e-9;

/// Penetration evidence extracted once two convex shapes are known to
/// overlap: a unit normal oriented from the first shape toward the second
/// and a non-negative depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    pub normal: DVec3,
    pub depth: f64,
}

#[must_use]
pub fn sphere_intersects_sphere(a: &Sphere, b: &Sphere) -> bool {
    let radius = a.radius + b.radius;
    a.center.distance_squared(b.center) <= radius * radius
}

#[must_use]
pub fn sphere_intersects_aabb(sphere: &Sphere, aabb: &Aabb) -> bool {
    aabb.distance_sq_to_point(sphere.center) <= sphere.radius * sphere.radius
}

#[must_use]
pub fn capsule_intersects_capsule(a: &Capsule, b: &Capsule) -> bool {
    let (on_a, on_b) =
        closest_points_between_segments(a.point_a, a.point_b, b.point_a, b.point_b);
    let radius = a.radius + b.radius;
    on_a.distance_squared(on_b) <= radius * radius
}

#[must_use]
pub fn capsule_intersects_sphere(capsule: &Capsule, sphere: &Sphere) -> bool {
    let closest = closest_point_on_segment(capsule.point_a, capsule.point_b, sphere.center);
    let radius = capsule.radius + sphere.radius;
    closest.distance_squared(sphere.center) <= radius * radius
}

/// Capsule/AABB has no convenient closed form; defer to the support engine.
#[must_use]
pub fn capsule_intersects_aabb(capsule: &Capsule, aabb: &Aabb) -> bool {
    gjk::intersects(&gjk::capsule_support(*capsule), &gjk::aabb_support(*aabb))
}

/// Nearest non-negative distance along the ray to the box, or `None` when
/// the ray misses. A ray starting inside the box reports `0.0`.
#[must_use]
pub fn ray_aabb_distance(ray: &Ray, aabb: &Aabb) -> Option<f64> {
    let mut t_min: f64 = 0.0;
    let mut t_max = f64::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.dir[axis];
        let min = aabb.min[axis];
        let max = aabb.max[axis];

        if dir == 0.0 {
            if origin < min || origin > max {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let mut t0 = (min - origin) * inv;
        let mut t1 = (max - origin) * inv;
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

/// Closest point on segment `ab` to `point`; a zero-length segment returns
/// its endpoint.
#[must_use]
pub fn closest_point_on_segment(a: DVec3, b: DVec3, point: DVec3) -> DVec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= EPS {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Closest points between segments `p1q1` and `p2q2`, parameters clamped to
/// `[0, 1]`. Handles every degeneracy: one or both segments of zero length,
/// parallel segments (the overlapping-interval midpoint falls out of the
/// clamped solve), and numerically near-parallel input via the
/// endpoint-projection fallback.
#[must_use]
pub fn closest_points_between_segments(
    p1: DVec3,
    q1: DVec3,
    p2: DVec3,
    q2: DVec3,
) -> (DVec3, DVec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    let (s, t);
    if a <= EPS && e <= EPS {
        return (p1, p2);
    }
    if a <= EPS {
        s = 0.0;
        t = (f / e.max(EPS)).clamp(0.0, 1.0);
    } else {
        let c = d1.dot(r);
        if e <= EPS {
            t = 0.0;
            s = (-c / a).clamp(0.0, 1.0);
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let s0 = if denom.abs() <= EPS {
                // Parallel: aim for the midpoint of the projected overlap
                // interval so resting contacts sit centered.
                let t_p2 = (p2 - p1).dot(d1) / a;
                let t_q2 = (q2 - p1).dot(d1) / a;
                let lo = t_p2.min(t_q2).max(0.0);
                let hi = t_p2.max(t_q2).min(1.0);
                ((lo + hi) * 0.5).clamp(0.0, 1.0)
            } else {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            };
            let t0 = (b * s0 + f) / e;
            if t0 < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t0 > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            } else {
                t = t0;
                s = s0;
            }
        }
    }
    (p1 + d1 * s, p2 + d2 * t)
}
