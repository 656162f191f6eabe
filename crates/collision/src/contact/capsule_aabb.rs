//! Capsule/AABB contact generation and the reversed-order wrapper.

use glam::DVec3;

use super::ContactManifold;
use crate::narrowphase::EPS;
use crate::types::{Aabb, Capsule};

const TERNARY_REFINEMENTS: usize = 48;

/// Contact between a capsule and a box.
///
/// The capsule-segment parameter minimizing distance to the box is found
/// by ternary search (the point-to-box distance is convex along the
/// segment), then clamped against both endpoints. A segment point inside
/// the box degenerates the normal; it is resolved by projecting onto the
/// nearest box face.
#[must_use]
pub fn capsule_vs_aabb(capsule: &Capsule, aabb: &Aabb) -> Option<ContactManifold> {
    let (segment_point, box_point) =
        closest_points_segment_aabb(capsule.point_a, capsule.point_b, aabb);
    let dist_sq = segment_point.distance_squared(box_point);
    if dist_sq > capsule.radius * capsule.radius {
        return None;
    }

    let (normal, box_surface) = if dist_sq > EPS * EPS {
        ((box_point - segment_point).normalize(), box_point)
    } else {
        nearest_face_projection(segment_point, aabb)
    };

    let distance = dist_sq.max(0.0).sqrt();
    let depth = capsule.radius - distance;
    let capsule_surface = segment_point + normal * capsule.radius;
    Some(ContactManifold::new(
        normal,
        depth,
        vec![(capsule_surface + box_surface) * 0.5],
    ))
}

/// Reversed argument order: same contact points, negated normal.
#[must_use]
pub fn aabb_vs_capsule(aabb: &Aabb, capsule: &Capsule) -> Option<ContactManifold> {
    capsule_vs_aabb(capsule, aabb).map(|m| m.flipped())
}

fn closest_points_segment_aabb(a: DVec3, b: DVec3, aabb: &Aabb) -> (DVec3, DVec3) {
    if a.distance_squared(b) <= EPS * EPS {
        return (a, aabb.closest_point(a));
    }

    let point_at = |t: f64| a + (b - a) * t;
    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..TERNARY_REFINEMENTS {
        let third = (hi - lo) / 3.0;
        let t1 = lo + third;
        let t2 = hi - third;
        if aabb.distance_sq_to_point(point_at(t1)) <= aabb.distance_sq_to_point(point_at(t2)) {
            hi = t2;
        } else {
            lo = t1;
        }
    }
    let mut best_t = (lo + hi) * 0.5;
    let mut best_dist = aabb.distance_sq_to_point(point_at(best_t));

    // Ternary search can stall next to a flat valley; the endpoints keep
    // the result exact there.
    let start_dist = aabb.distance_sq_to_point(a);
    if start_dist < best_dist {
        best_dist = start_dist;
        best_t = 0.0;
    }
    if aabb.distance_sq_to_point(b) < best_dist {
        best_t = 1.0;
    }

    let segment_point = point_at(best_t);
    (segment_point, aabb.closest_point(segment_point))
}

/// Projects an interior point onto the face with the smallest axis
/// distance, returning the outward face normal and the on-face point.
fn nearest_face_projection(point: DVec3, aabb: &Aabb) -> (DVec3, DVec3) {
    let mut best = (point.x - aabb.min.x).abs();
    let mut normal = DVec3::NEG_X;
    let mut face_point = DVec3::new(aabb.min.x, point.y, point.z);

    let candidates = [
        ((aabb.max.x - point.x).abs(), DVec3::X, DVec3::new(aabb.max.x, point.y, point.z)),
        ((point.y - aabb.min.y).abs(), DVec3::NEG_Y, DVec3::new(point.x, aabb.min.y, point.z)),
        ((aabb.max.y - point.y).abs(), DVec3::Y, DVec3::new(point.x, aabb.max.y, point.z)),
        ((point.z - aabb.min.z).abs(), DVec3::NEG_Z, DVec3::new(point.x, point.y, aabb.min.z)),
        ((aabb.max.z - point.z).abs(), DVec3::Z, DVec3::new(point.x, point.y, aabb.max.z)),
    ];
    for (dist, n, p) in candidates {
        if dist < best {
            best = dist;
            normal = n;
            face_point = p;
        }
    }
    (normal, aabb.closest_point(face_point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn side_contact_reports_face_normal_and_depth() {
        let capsule = Capsule::new(
            DVec3::new(-0.4, 0.5, 0.5),
            DVec3::new(-0.4, 1.5, 0.5),
            0.5,
        );
        let box_ = Aabb::new(DVec3::ZERO, DVec3::new(1.0, 2.0, 1.0));
        let manifold = capsule_vs_aabb(&capsule, &box_).unwrap();
        assert_relative_eq!(manifold.normal.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(manifold.depth, 0.1, epsilon = 1e-9);
        assert_eq!(manifold.contacts.len(), 1);
    }

    #[test]
    fn segment_inside_box_projects_to_nearest_face() {
        let capsule = Capsule::new(
            DVec3::new(0.5, 0.2, 0.5),
            DVec3::new(0.5, 0.4, 0.5),
            0.1,
        );
        let box_ = Aabb::new(DVec3::ZERO, DVec3::splat(1.0));
        let manifold = capsule_vs_aabb(&capsule, &box_).unwrap();
        // Nearest face from (0.5, 0.2, 0.5) is y = 0.
        assert_relative_eq!(manifold.normal.y, -1.0, epsilon = 1e-9);
        assert!(manifold.normal.is_finite());
        assert!(manifold.depth >= 0.0);
    }

    #[test]
    fn point_capsule_against_point_box_is_finite() {
        let capsule = Capsule::new(
            DVec3::new(-0.3, 0.0, 0.0),
            DVec3::new(-0.3, 0.0, 0.0),
            0.5,
        );
        let box_ = Aabb::new(DVec3::ZERO, DVec3::ZERO);
        let manifold = capsule_vs_aabb(&capsule, &box_).unwrap();
        assert_relative_eq!(manifold.normal.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(manifold.depth, 0.2, epsilon = 1e-9);
    }

    #[test]
    fn extreme_coordinates_stay_finite() {
        let base = 1e9;
        let capsule = Capsule::new(
            DVec3::new(base, base, base),
            DVec3::new(base + 1000.0, base, base),
            10.0,
        );
        let box_ = Aabb::new(
            DVec3::new(base + 1005.0, base - 5.0, base - 5.0),
            DVec3::new(base + 1030.0, base + 5.0, base + 5.0),
        );
        let manifold = capsule_vs_aabb(&capsule, &box_).unwrap();
        assert!(manifold.normal.is_finite());
        assert_relative_eq!(manifold.normal.length(), 1.0, epsilon = 1e-6);
        assert!(manifold.depth >= 0.0);
        assert!(manifold.contacts[0].is_finite());
    }

    #[test]
    fn reversed_order_negates_normal() {
        let capsule = Capsule::new(
            DVec3::new(-0.4, 0.5, 0.5),
            DVec3::new(-0.4, 1.5, 0.5),
            0.5,
        );
        let box_ = Aabb::new(DVec3::ZERO, DVec3::new(1.0, 2.0, 1.0));
        let forward = capsule_vs_aabb(&capsule, &box_).unwrap();
        let reverse = aabb_vs_capsule(&box_, &capsule).unwrap();
        assert_relative_eq!(forward.normal.x, -reverse.normal.x, epsilon = 1e-9);
        assert_eq!(forward.contacts, reverse.contacts);
    }

    #[test]
    fn separated_capsule_produces_no_manifold() {
        let capsule = Capsule::new(DVec3::splat(5.0), DVec3::splat(6.0), 0.5);
        let box_ = Aabb::new(DVec3::ZERO, DVec3::splat(1.0));
        assert!(capsule_vs_aabb(&capsule, &box_).is_none());
    }
}
