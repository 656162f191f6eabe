//! Capsule/capsule contact generation.

use super::{sphere_like_contact, ContactManifold};
use crate::narrowphase::closest_points_between_segments;
use crate::types::Capsule;

/// Reduces the pair to the closest points between the two core segments,
/// then treats those as sphere centers carrying the capsule radii.
#[must_use]
pub fn capsule_vs_capsule(a: &Capsule, b: &Capsule) -> Option<ContactManifold> {
    let (on_a, on_b) =
        closest_points_between_segments(a.point_a, a.point_b, b.point_a, b.point_b);
    sphere_like_contact(on_a, a.radius, on_b, b.radius)
}
