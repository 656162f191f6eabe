//! Core bounding primitives shared by every collision stage.
//!
//! All primitives are immutable value types validated on construction:
//! constructors panic on non-finite input or negative extents, so every
//! downstream stage can assume well-formed geometry.

use glam::DVec3;

/// Axis-aligned bounding box given by its minimum and maximum corners.
///
/// A degenerate box (`min == max` on any axis) is a legal point volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// # Panics
    ///
    /// Panics when a corner is non-finite or `min > max` on any axis.
    #[must_use]
    pub fn new(min: DVec3, max: DVec3) -> Self {
        assert!(min.is_finite() && max.is_finite(), "aabb corners must be finite");
        assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "aabb min must not exceed max on any axis"
        );
        Self { min, max }
    }

    #[must_use]
    pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Inclusive overlap test; touching faces count as intersecting.
    #[must_use]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Closest point on or inside the box to `point`.
    #[must_use]
    pub fn closest_point(&self, point: DVec3) -> DVec3 {
        point.clamp(self.min, self.max)
    }

    #[must_use]
    pub fn distance_sq_to_point(&self, point: DVec3) -> f64 {
        point.distance_squared(self.closest_point(point))
    }

    /// Smallest box containing both operands.
    #[must_use]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Sphere given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: DVec3,
    pub radius: f64,
}

impl Sphere {
    /// # Panics
    ///
    /// Panics when the center is non-finite or the radius is negative or
    /// non-finite. A zero radius is a legal point volume.
    #[must_use]
    pub fn new(center: DVec3, radius: f64) -> Self {
        assert!(center.is_finite(), "sphere center must be finite");
        assert!(radius.is_finite() && radius >= 0.0, "sphere radius must be >= 0");
        Self { center, radius }
    }

    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.center - DVec3::splat(self.radius),
            self.center + DVec3::splat(self.radius),
        )
    }
}

/// Capsule given by its segment endpoints and radius.
///
/// Coincident endpoints degenerate to a sphere and are legal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub point_a: DVec3,
    pub point_b: DVec3,
    pub radius: f64,
}

impl Capsule {
    /// # Panics
    ///
    /// Panics when an endpoint is non-finite or the radius is negative or
    /// non-finite.
    #[must_use]
    pub fn new(point_a: DVec3, point_b: DVec3, radius: f64) -> Self {
        assert!(
            point_a.is_finite() && point_b.is_finite(),
            "capsule endpoints must be finite"
        );
        assert!(radius.is_finite() && radius >= 0.0, "capsule radius must be >= 0");
        Self { point_a, point_b, radius }
    }

    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let r = DVec3::splat(self.radius);
        Aabb::new(
            self.point_a.min(self.point_b) - r,
            self.point_a.max(self.point_b) + r,
        )
    }
}

/// Ray given by an origin and a non-zero (not necessarily unit) direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub dir: DVec3,
}

impl Ray {
    /// # Panics
    ///
    /// Panics when origin or direction is non-finite, or the direction has
    /// zero length.
    #[must_use]
    pub fn new(origin: DVec3, dir: DVec3) -> Self {
        assert!(origin.is_finite() && dir.is_finite(), "ray must be finite");
        assert!(dir.length_squared() > 0.0, "ray direction must be non-zero");
        Self { origin, dir }
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> DVec3 {
        self.origin + self.dir * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_touching_faces_intersect() {
        let a = Aabb::new(DVec3::ZERO, DVec3::splat(1.0));
        let b = Aabb::new(DVec3::new(1.0, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0));
        let c = Aabb::new(DVec3::new(1.0001, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn degenerate_point_volume_is_legal() {
        let p = Aabb::new(DVec3::splat(1.0), DVec3::splat(1.0));
        assert!(p.intersects(&p));
        assert_eq!(p.center(), DVec3::splat(1.0));
    }

    #[test]
    #[should_panic(expected = "aabb min must not exceed max")]
    fn inverted_aabb_is_rejected() {
        let _ = Aabb::new(DVec3::splat(1.0), DVec3::ZERO);
    }

    #[test]
    #[should_panic(expected = "radius must be >= 0")]
    fn negative_sphere_radius_is_rejected() {
        let _ = Sphere::new(DVec3::ZERO, -1.0);
    }

    #[test]
    #[should_panic(expected = "direction must be non-zero")]
    fn zero_direction_ray_is_rejected() {
        let _ = Ray::new(DVec3::ZERO, DVec3::ZERO);
    }
}
