//! Mesh integration hooks.
//!
//! The mesh container itself is an external collaborator; this module
//! carries only the collision-relevant slice of it: per-meshlet bounds and
//! cone metadata for coarse ray queries, plus an explicit per-item table
//! for bounds and filters (an owned replacement for weakly-keyed
//! process-wide maps, which do not port to ownership-disciplined hosts).

use std::collections::HashMap;
use std::hash::Hash;

use glam::{DAffine3, DVec3};

use crate::filtering::CollisionFilter;
use crate::narrowphase::ray_aabb_distance;
use crate::shapes::{transform_aabb, RaycastHit};
use crate::types::{Aabb, Ray};

const FACE_EPS: f64 = 1e-6;

/// The collision-relevant metadata of one meshlet: its local bounds and,
/// when the builder emitted one, a backface cone (axis + cosine cutoff).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Meshlet {
    pub bounds: Aabb,
    pub cone_axis: Option<DVec3>,
    pub cone_cutoff: f64,
}

impl Meshlet {
    /// # Panics
    ///
    /// Panics when the cone axis is present but zero or non-finite, or the
    /// cutoff is non-finite.
    #[must_use]
    pub fn new(bounds: Aabb, cone_axis: Option<DVec3>, cone_cutoff: f64) -> Self {
        if let Some(axis) = cone_axis {
            assert!(
                axis.is_finite() && axis.length_squared() > 0.0,
                "cone axis must be finite and non-zero"
            );
        }
        assert!(cone_cutoff.is_finite(), "cone cutoff must be finite");
        Self { bounds, cone_axis, cone_cutoff }
    }
}

/// Explicit handle table attaching an AABB and a filter to mesh objects.
/// Items without a filter resolve to [`CollisionFilter::DEFAULT`].
#[derive(Debug)]
pub struct MeshColliderTable<T> {
    bounds: HashMap<T, Aabb>,
    filters: HashMap<T, CollisionFilter>,
}

impl<T: Clone + Eq + Hash> MeshColliderTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { bounds: HashMap::new(), filters: HashMap::new() }
    }

    pub fn set_bounds(&mut self, item: T, bounds: Aabb) {
        self.bounds.insert(item, bounds);
    }

    #[must_use]
    pub fn bounds(&self, item: &T) -> Option<Aabb> {
        self.bounds.get(item).copied()
    }

    pub fn set_filter(&mut self, item: T, filter: CollisionFilter) {
        self.filters.insert(item, filter);
    }

    #[must_use]
    pub fn filter(&self, item: &T) -> CollisionFilter {
        self.filters.get(item).copied().unwrap_or_default()
    }

    pub fn remove(&mut self, item: &T) {
        self.bounds.remove(item);
        self.filters.remove(item);
    }
}

impl<T: Clone + Eq + Hash> Default for MeshColliderTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Meshlet-backed collision shape: world-AABB queries plus a coarse,
/// meshlet-aware raycast (AABB slab test + cone rejection, no triangle
/// pass).
#[derive(Debug, Clone)]
pub struct MeshCollisionShape {
    meshlets: Vec<Meshlet>,
    fallback_bounds: Option<Aabb>,
    local_transform: DAffine3,
}

impl MeshCollisionShape {
    #[must_use]
    pub fn new(meshlets: Vec<Meshlet>, local_transform: DAffine3) -> Self {
        Self { meshlets, fallback_bounds: None, local_transform }
    }

    /// Bounds used when the mesh carries no meshlets (e.g. attached from a
    /// [`MeshColliderTable`] entry).
    #[must_use]
    pub fn with_fallback_bounds(mut self, bounds: Aabb) -> Self {
        self.fallback_bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn meshlets(&self) -> &[Meshlet] {
        &self.meshlets
    }

    fn local_bounds(&self) -> Aabb {
        if let Some(first) = self.meshlets.first() {
            let mut bounds = first.bounds;
            for meshlet in &self.meshlets[1..] {
                bounds = bounds.union(&meshlet.bounds);
            }
            return bounds;
        }
        self.fallback_bounds
            .expect("mesh bounds are not set: no meshlets and no fallback bounds")
    }

    /// World-space bounds through the composed world and local transform.
    ///
    /// # Panics
    ///
    /// Panics when the mesh has neither meshlets nor fallback bounds.
    #[must_use]
    pub fn world_bounds(&self, world_transform: &DAffine3) -> Aabb {
        let combined = *world_transform * self.local_transform;
        transform_aabb(&self.local_bounds(), &combined)
    }

    /// Coarse nearest-hit ray query.
    ///
    /// Walks meshlet world bounds, rejecting meshlets whose cone faces
    /// away from the ray (`ray_dir . axis < cone_cutoff`). The reported
    /// normal is the hit meshlet's transformed cone axis, or the struck
    /// AABB face normal when no cone is defined, oriented against the ray.
    #[must_use]
    pub fn raycast(&self, ray: &Ray, world_transform: &DAffine3) -> Option<RaycastHit> {
        let combined = *world_transform * self.local_transform;
        let world_bounds = transform_aabb(&self.local_bounds(), &combined);
        ray_aabb_distance(ray, &world_bounds)?;

        let ray_dir = ray.dir.normalize();
        if self.meshlets.is_empty() {
            let t = ray_aabb_distance(ray, &world_bounds)?;
            let point = ray.point_at(t);
            let normal = orient_against_ray(aabb_face_normal(point, &world_bounds), ray_dir);
            return Some(RaycastHit { t, point, normal, meshlet_index: None });
        }

        let mut best: Option<(f64, usize, Option<DVec3>, Aabb)> = None;
        for (index, meshlet) in self.meshlets.iter().enumerate() {
            let meshlet_world = transform_aabb(&meshlet.bounds, &combined);
            let Some(t) = ray_aabb_distance(ray, &meshlet_world) else {
                continue;
            };

            let mut candidate_normal = None;
            if let Some(axis) = meshlet.cone_axis {
                let transformed = combined.transform_vector3(axis);
                if transformed.length_squared() > 0.0 {
                    let axis = transformed.normalize();
                    if ray_dir.dot(axis) < meshlet.cone_cutoff {
                        continue;
                    }
                    candidate_normal = Some(axis);
                }
            }

            if best.as_ref().map_or(true, |(best_t, ..)| t < *best_t) {
                best = Some((t, index, candidate_normal, meshlet_world));
            }
        }

        let (t, index, cone_normal, meshlet_world) = best?;
        let point = ray.point_at(t);
        let normal = cone_normal.unwrap_or_else(|| aabb_face_normal(point, &meshlet_world));
        Some(RaycastHit {
            t,
            point,
            normal: orient_against_ray(normal, ray_dir),
            meshlet_index: Some(index),
        })
    }
}

/// Face normal of the box face the point lies on, +Y when the point is not
/// on any face.
fn aabb_face_normal(point: DVec3, aabb: &Aabb) -> DVec3 {
    if (point.x - aabb.min.x).abs() < FACE_EPS {
        DVec3::NEG_X
    } else if (point.x - aabb.max.x).abs() < FACE_EPS {
        DVec3::X
    } else if (point.y - aabb.min.y).abs() < FACE_EPS {
        DVec3::NEG_Y
    } else if (point.y - aabb.max.y).abs() < FACE_EPS {
        DVec3::Y
    } else if (point.z - aabb.min.z).abs() < FACE_EPS {
        DVec3::NEG_Z
    } else if (point.z - aabb.max.z).abs() < FACE_EPS {
        DVec3::Z
    } else {
        DVec3::Y
    }
}

fn orient_against_ray(normal: DVec3, ray_dir: DVec3) -> DVec3 {
    if normal.dot(ray_dir) > 0.0 {
        -normal
    } else {
        normal
    }
}
