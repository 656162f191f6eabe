//! Typed shape catalogue with a uniform world-bounds / coarse-raycast
//! contract.
//!
//! These are the host-facing collidable descriptions: a tagged enumeration
//! rather than a trait object, so backends can match on the variant. The
//! simple variants answer bounds-level queries from the transform's
//! translation; only the meshlet-backed [`Mesh`](CollisionShape::Mesh)
//! variant (and a compound containing one) resolves ray queries.

use glam::{DAffine3, DVec3};

use crate::mesh::MeshCollisionShape;
use crate::types::{Aabb, Ray};

/// Conservative extent used for the unbounded plane variant.
const PLANE_HALF_EXTENT: f64 = 1.0e9;

/// Result of a coarse ray query against a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Distance along the ray direction to the hit.
    pub t: f64,
    /// Hit position in world space.
    pub point: DVec3,
    /// Approximate surface normal, oriented against the ray.
    pub normal: DVec3,
    /// Index of the meshlet that produced the hit, for mesh-backed shapes.
    pub meshlet_index: Option<usize>,
}

/// A collidable shape description.
#[derive(Debug, Clone)]
pub enum CollisionShape {
    Sphere { radius: f64 },
    Box { half_extents: DVec3 },
    /// Capsule along the local Y axis: segment of `height` plus end caps.
    Capsule { radius: f64, height: f64 },
    /// Cylinder along the local Y axis with flat caps.
    Cylinder { radius: f64, height: f64 },
    /// Infinite plane `dot(normal, x) = d`.
    Plane { normal: DVec3, d: f64 },
    ConvexHull { vertices: Vec<DVec3> },
    TriangleMesh { vertices: Vec<DVec3>, indices: Vec<u32> },
    /// Row-major height samples over a `world_width` x `world_depth`
    /// patch anchored at the transform translation.
    Heightfield {
        heights: Vec<f64>,
        width_samples: usize,
        depth_samples: usize,
        world_width: f64,
        world_depth: f64,
        max_height: f64,
    },
    Compound { children: Vec<(CollisionShape, DAffine3)> },
    Mesh(MeshCollisionShape),
}

impl CollisionShape {
    /// # Panics
    ///
    /// Panics when `radius` is not finite and positive.
    #[must_use]
    pub fn sphere(radius: f64) -> Self {
        assert!(radius.is_finite() && radius > 0.0, "sphere radius must be positive");
        Self::Sphere { radius }
    }

    /// # Panics
    ///
    /// Panics when any half extent is not finite and positive.
    #[must_use]
    pub fn box_shape(half_extents: DVec3) -> Self {
        assert!(
            half_extents.is_finite()
                && half_extents.x > 0.0
                && half_extents.y > 0.0
                && half_extents.z > 0.0,
            "box half extents must be positive finite values"
        );
        Self::Box { half_extents }
    }

    /// # Panics
    ///
    /// Panics when radius or height is not finite and positive.
    #[must_use]
    pub fn capsule(radius: f64, height: f64) -> Self {
        assert!(radius.is_finite() && radius > 0.0, "capsule radius must be positive");
        assert!(height.is_finite() && height > 0.0, "capsule height must be positive");
        Self::Capsule { radius, height }
    }

    /// # Panics
    ///
    /// Panics when radius or height is not finite and positive.
    #[must_use]
    pub fn cylinder(radius: f64, height: f64) -> Self {
        assert!(radius.is_finite() && radius > 0.0, "cylinder radius must be positive");
        assert!(height.is_finite() && height > 0.0, "cylinder height must be positive");
        Self::Cylinder { radius, height }
    }

    /// # Panics
    ///
    /// Panics when the normal is zero or any component non-finite.
    #[must_use]
    pub fn plane(normal: DVec3, d: f64) -> Self {
        assert!(normal.is_finite() && d.is_finite(), "plane must be finite");
        assert!(normal.length_squared() > 0.0, "plane normal must be non-zero");
        Self::Plane { normal, d }
    }

    /// Ground plane through the origin facing +Y.
    #[must_use]
    pub fn plane_y() -> Self {
        Self::Plane { normal: DVec3::Y, d: 0.0 }
    }

    /// # Panics
    ///
    /// Panics on an empty or non-finite vertex set.
    #[must_use]
    pub fn convex_hull(vertices: Vec<DVec3>) -> Self {
        assert!(!vertices.is_empty(), "convex hull requires vertices");
        assert!(vertices.iter().all(|v| v.is_finite()), "hull vertices must be finite");
        Self::ConvexHull { vertices }
    }

    /// # Panics
    ///
    /// Panics on an empty vertex set, an index count that is not a
    /// multiple of three, or an out-of-range index.
    #[must_use]
    pub fn triangle_mesh(vertices: Vec<DVec3>, indices: Vec<u32>) -> Self {
        assert!(!vertices.is_empty(), "triangle mesh requires vertices");
        assert!(indices.len() % 3 == 0, "triangle indices must come in triples");
        assert!(
            indices.iter().all(|&i| (i as usize) < vertices.len()),
            "triangle index out of range"
        );
        Self::TriangleMesh { vertices, indices }
    }

    /// # Panics
    ///
    /// Panics on an empty height array or a sample-count mismatch.
    #[must_use]
    pub fn heightfield(
        heights: Vec<f64>,
        width_samples: usize,
        depth_samples: usize,
        world_width: f64,
        world_depth: f64,
        max_height: f64,
    ) -> Self {
        assert!(!heights.is_empty(), "heightfield heights must be non-empty");
        assert!(
            heights.len() == width_samples * depth_samples,
            "heightfield sample counts must match the height array"
        );
        Self::Heightfield {
            heights,
            width_samples,
            depth_samples,
            world_width,
            world_depth,
            max_height,
        }
    }

    #[must_use]
    pub fn compound(children: Vec<(CollisionShape, DAffine3)>) -> Self {
        Self::Compound { children }
    }

    #[must_use]
    pub fn mesh(shape: MeshCollisionShape) -> Self {
        Self::Mesh(shape)
    }

    /// World-space bounds under `transform`. Simple variants use only the
    /// translation; compound and mesh variants apply the full affine.
    ///
    /// # Panics
    ///
    /// Panics for a mesh variant whose bounds were never provided.
    #[must_use]
    pub fn world_bounds(&self, transform: &DAffine3) -> Aabb {
        let center = transform.translation;
        match self {
            Self::Sphere { radius } => {
                Aabb::from_center_half_extents(center, DVec3::splat(*radius))
            }
            Self::Box { half_extents } => Aabb::from_center_half_extents(center, *half_extents),
            Self::Capsule { radius, height } => Aabb::from_center_half_extents(
                center,
                DVec3::new(*radius, height * 0.5 + radius, *radius),
            ),
            Self::Cylinder { radius, height } => Aabb::from_center_half_extents(
                center,
                DVec3::new(*radius, height * 0.5, *radius),
            ),
            Self::Plane { .. } => {
                Aabb::from_center_half_extents(center, DVec3::splat(PLANE_HALF_EXTENT))
            }
            Self::ConvexHull { vertices } | Self::TriangleMesh { vertices, .. } => {
                let mut min = vertices[0];
                let mut max = vertices[0];
                for v in &vertices[1..] {
                    min = min.min(*v);
                    max = max.max(*v);
                }
                Aabb::new(center + min, center + max)
            }
            Self::Heightfield { world_width, world_depth, max_height, .. } => Aabb::new(
                center,
                center + DVec3::new(*world_width, *max_height, *world_depth),
            ),
            Self::Compound { children } => {
                let mut bounds: Option<Aabb> = None;
                for (child, local) in children {
                    let child_bounds = child.world_bounds(&(*transform * *local));
                    bounds = Some(match bounds {
                        Some(acc) => acc.union(&child_bounds),
                        None => child_bounds,
                    });
                }
                bounds.unwrap_or_else(|| Aabb::new(center, center))
            }
            Self::Mesh(mesh) => mesh.world_bounds(transform),
        }
    }

    /// Coarse ray query. Only mesh-backed shapes (directly or inside a
    /// compound) resolve hits; the simple variants report `None`.
    #[must_use]
    pub fn raycast(&self, ray: &Ray, transform: &DAffine3) -> Option<RaycastHit> {
        match self {
            Self::Mesh(mesh) => mesh.raycast(ray, transform),
            Self::Compound { children } => children
                .iter()
                .filter_map(|(child, local)| child.raycast(ray, &(*transform * *local)))
                .min_by(|a, b| a.t.total_cmp(&b.t)),
            _ => None,
        }
    }
}

/// Transforms a box through an affine map, returning the bounds of its
/// eight transformed corners.
#[must_use]
pub fn transform_aabb(aabb: &Aabb, transform: &DAffine3) -> Aabb {
    let corners = [
        DVec3::new(aabb.min.x, aabb.min.y, aabb.min.z),
        DVec3::new(aabb.max.x, aabb.min.y, aabb.min.z),
        DVec3::new(aabb.min.x, aabb.max.y, aabb.min.z),
        DVec3::new(aabb.max.x, aabb.max.y, aabb.min.z),
        DVec3::new(aabb.min.x, aabb.min.y, aabb.max.z),
        DVec3::new(aabb.max.x, aabb.min.y, aabb.max.z),
        DVec3::new(aabb.min.x, aabb.max.y, aabb.max.z),
        DVec3::new(aabb.max.x, aabb.max.y, aabb.max.z),
    ];
    let mut min = transform.transform_point3(corners[0]);
    let mut max = min;
    for corner in &corners[1..] {
        let p = transform.transform_point3(*corner);
        min = min.min(p);
        max = max.max(p);
    }
    Aabb::new(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn box_bounds_follow_translation() {
        let shape = CollisionShape::box_shape(DVec3::new(1.0, 2.0, 3.0));
        let bounds = shape.world_bounds(&DAffine3::from_translation(DVec3::new(10.0, 0.0, 0.0)));
        assert_relative_eq!(bounds.min.x, 9.0);
        assert_relative_eq!(bounds.max.y, 2.0);
        assert_relative_eq!(bounds.max.z, 3.0);
    }

    #[test]
    fn capsule_bounds_include_end_caps() {
        let shape = CollisionShape::capsule(0.5, 2.0);
        let bounds = shape.world_bounds(&DAffine3::IDENTITY);
        assert_relative_eq!(bounds.max.y, 1.5);
        assert_relative_eq!(bounds.max.x, 0.5);
    }

    #[test]
    fn heightfield_bounds_are_corner_anchored() {
        let shape = CollisionShape::heightfield(vec![0.0; 4], 2, 2, 8.0, 6.0, 3.0);
        let bounds = shape.world_bounds(&DAffine3::from_translation(DVec3::new(1.0, 2.0, 3.0)));
        assert_relative_eq!(bounds.min.x, 1.0);
        assert_relative_eq!(bounds.max.x, 9.0);
        assert_relative_eq!(bounds.max.y, 5.0);
        assert_relative_eq!(bounds.max.z, 9.0);
    }

    #[test]
    fn compound_bounds_union_children() {
        let shape = CollisionShape::compound(vec![
            (CollisionShape::sphere(1.0), DAffine3::IDENTITY),
            (
                CollisionShape::sphere(1.0),
                DAffine3::from_translation(DVec3::new(4.0, 0.0, 0.0)),
            ),
        ]);
        let bounds = shape.world_bounds(&DAffine3::IDENTITY);
        assert_relative_eq!(bounds.min.x, -1.0);
        assert_relative_eq!(bounds.max.x, 5.0);
    }

    #[test]
    fn simple_shapes_do_not_answer_rays() {
        let shape = CollisionShape::sphere(1.0);
        let ray = Ray::new(DVec3::new(-5.0, 0.0, 0.0), DVec3::X);
        assert!(shape.raycast(&ray, &DAffine3::IDENTITY).is_none());
    }

    #[test]
    fn transform_aabb_covers_rotated_corners() {
        let aabb = Aabb::new(DVec3::ZERO, DVec3::splat(1.0));
        let rotated = transform_aabb(
            &aabb,
            &DAffine3::from_rotation_y(std::f64::consts::FRAC_PI_4),
        );
        assert!(rotated.max.x > 0.7);
        assert!(rotated.min.x < -0.7);
    }

    #[test]
    #[should_panic(expected = "half extents must be positive")]
    fn degenerate_box_shape_is_rejected() {
        let _ = CollisionShape::box_shape(DVec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "sample counts must match")]
    fn heightfield_sample_mismatch_is_rejected() {
        let _ = CollisionShape::heightfield(vec![0.0; 3], 2, 2, 1.0, 1.0, 1.0);
    }
}
