//! AABB/AABB contact generation.

use glam::DVec3;

use super::ContactManifold;
use crate::types::Aabb;

/// Minimum-overlap-axis contact between two boxes.
///
/// The separation axis is the one with the smallest positive overlap, its
/// sign chosen by the center-to-center delta (zero resolves to +1). The
/// contact point sits at the intersection-region center on the two other
/// axes and at the face midpoint on the chosen axis.
#[must_use]
pub fn aabb_vs_aabb(a: &Aabb, b: &Aabb) -> Option<ContactManifold> {
    if !a.intersects(b) {
        return None;
    }

    let overlap = DVec3::new(
        a.max.x.min(b.max.x) - a.min.x.max(b.min.x),
        a.max.y.min(b.max.y) - a.min.y.max(b.min.y),
        a.max.z.min(b.max.z) - a.min.z.max(b.min.z),
    );

    let mut axis = 0;
    let mut depth = overlap.x;
    if overlap.y < depth {
        depth = overlap.y;
        axis = 1;
    }
    if overlap.z < depth {
        depth = overlap.z;
        axis = 2;
    }

    let center_delta = b.center() - a.center();
    let sign = if center_delta[axis] >= 0.0 { 1.0 } else { -1.0 };

    let mut normal = DVec3::ZERO;
    normal[axis] = sign;

    let mut contact = DVec3::new(
        overlap_center(a.min.x, a.max.x, b.min.x, b.max.x),
        overlap_center(a.min.y, a.max.y, b.min.y, b.max.y),
        overlap_center(a.min.z, a.max.z, b.min.z, b.max.z),
    );
    contact[axis] = if sign > 0.0 {
        (a.max[axis] + b.min[axis]) * 0.5
    } else {
        (a.min[axis] + b.max[axis]) * 0.5
    };

    Some(ContactManifold::new(normal, depth, vec![contact]))
}

fn overlap_center(min_a: f64, max_a: f64, min_b: f64, max_b: f64) -> f64 {
    (min_a.max(min_b) + max_a.min(max_b)) * 0.5
}
