//! Capsule/sphere contact generation and the reversed-order wrapper.

use super::{sphere_like_contact, ContactManifold};
use crate::narrowphase::closest_point_on_segment;
use crate::types::{Capsule, Sphere};

/// Contact via the closest point on the capsule segment to the sphere
/// center.
#[must_use]
pub fn capsule_vs_sphere(capsule: &Capsule, sphere: &Sphere) -> Option<ContactManifold> {
    let on_segment =
        closest_point_on_segment(capsule.point_a, capsule.point_b, sphere.center);
    sphere_like_contact(on_segment, capsule.radius, sphere.center, sphere.radius)
}

/// Reversed argument order: same contact points, negated normal.
#[must_use]
pub fn sphere_vs_capsule(sphere: &Sphere, capsule: &Capsule) -> Option<ContactManifold> {
    capsule_vs_sphere(capsule, sphere).map(|m| m.flipped())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DVec3;

    #[test]
    fn contact_uses_segment_closest_point() {
        let capsule = Capsule::new(DVec3::ZERO, DVec3::new(0.0, 2.0, 0.0), 0.5);
        let sphere = Sphere::new(DVec3::new(0.8, 1.0, 0.0), 0.5);
        let manifold = capsule_vs_sphere(&capsule, &sphere).unwrap();
        assert_relative_eq!(manifold.normal.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(manifold.depth, 0.2, epsilon = 1e-9);
    }

    #[test]
    fn point_capsule_behaves_like_sphere() {
        let capsule = Capsule::new(DVec3::ZERO, DVec3::ZERO, 0.5);
        let sphere = Sphere::new(DVec3::new(0.25, 0.0, 0.0), 0.5);
        let manifold = capsule_vs_sphere(&capsule, &sphere).unwrap();
        assert!(manifold.normal.is_finite());
        assert_relative_eq!(manifold.depth, 0.75, epsilon = 1e-9);
    }

    #[test]
    fn reversed_order_negates_normal_and_keeps_contacts() {
        let capsule = Capsule::new(DVec3::ZERO, DVec3::new(0.0, 2.0, 0.0), 0.5);
        let sphere = Sphere::new(DVec3::new(0.8, 1.0, 0.0), 0.5);
        let forward = capsule_vs_sphere(&capsule, &sphere).unwrap();
        let reverse = sphere_vs_capsule(&sphere, &capsule).unwrap();
        assert_relative_eq!(forward.normal.x, -reverse.normal.x, epsilon = 1e-9);
        assert_relative_eq!(forward.depth, reverse.depth, epsilon = 1e-9);
        assert_eq!(forward.contacts, reverse.contacts);
    }

    #[test]
    fn separated_pair_produces_no_manifold() {
        let capsule = Capsule::new(DVec3::ZERO, DVec3::new(0.0, 2.0, 0.0), 0.25);
        let sphere = Sphere::new(DVec3::new(2.0, 1.0, 0.0), 0.25);
        assert!(capsule_vs_sphere(&capsule, &sphere).is_none());
    }
}
