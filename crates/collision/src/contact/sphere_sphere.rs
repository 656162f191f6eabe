//! Sphere/sphere contact generation.

use super::{sphere_like_contact, ContactManifold};
use crate::types::Sphere;

/// Contact along the center-difference direction; the contact point is the
/// midpoint of the two surface points.
#[must_use]
pub fn sphere_vs_sphere(a: &Sphere, b: &Sphere) -> Option<ContactManifold> {
    sphere_like_contact(a.center, a.radius, b.center, b.radius)
}
