//! Primitive contact generation.
//!
//! Each generator turns overlap evidence for one ordered primitive pair
//! into a manifold with exactly one contact point. Normals are oriented
//! from the first argument toward the second; reversed-order wrappers
//! negate the normal and keep the contact points.

mod aabb_aabb;
mod capsule_aabb;
mod capsule_capsule;
mod capsule_sphere;
mod sphere_sphere;

pub use aabb_aabb::aabb_vs_aabb;
pub use capsule_aabb::{aabb_vs_capsule, capsule_vs_aabb};
pub use capsule_capsule::capsule_vs_capsule;
pub use capsule_sphere::{capsule_vs_sphere, sphere_vs_capsule};
pub use sphere_sphere::sphere_vs_sphere;

use glam::DVec3;

use crate::narrowphase::EPS;

/// Oriented overlap description: a unit normal from the first shape toward
/// the second, a non-negative penetration depth, and a small set of
/// contact points.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactManifold {
    pub normal: DVec3,
    pub depth: f64,
    pub contacts: Vec<DVec3>,
}

impl ContactManifold {
    /// # Panics
    ///
    /// Panics when the normal is not unit length, the depth is negative,
    /// or any component is non-finite.
    #[must_use]
    pub fn new(normal: DVec3, depth: f64, contacts: Vec<DVec3>) -> Self {
        assert!(normal.is_finite() && (normal.length() - 1.0).abs() <= 1e-6,
            "manifold normal must be unit length");
        assert!(depth.is_finite() && depth >= 0.0, "penetration depth must be >= 0");
        assert!(contacts.iter().all(|c| c.is_finite()), "contact points must be finite");
        Self { normal, depth, contacts }
    }

    /// Same overlap seen from the other shape: negated normal, identical
    /// depth and contact points.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            depth: self.depth,
            contacts: self.contacts.clone(),
        }
    }
}

/// Contact between two sphere-like volumes given their centers and radii.
/// Coincident centers fall back to the +X axis at zero distance.
pub(crate) fn sphere_like_contact(
    center_a: DVec3,
    radius_a: f64,
    center_b: DVec3,
    radius_b: f64,
) -> Option<ContactManifold> {
    let delta = center_b - center_a;
    let dist_sq = delta.length_squared();
    let radius_sum = radius_a + radius_b;
    if dist_sq > radius_sum * radius_sum {
        return None;
    }

    let mut dist = dist_sq.max(0.0).sqrt();
    let normal = if dist <= EPS {
        dist = 0.0;
        DVec3::X
    } else {
        delta / dist
    };

    let depth = radius_sum - dist;
    let surface_a = center_a + normal * radius_a;
    let surface_b = center_b - normal * radius_b;
    Some(ContactManifold::new(
        normal,
        depth,
        vec![(surface_a + surface_b) * 0.5],
    ))
}
