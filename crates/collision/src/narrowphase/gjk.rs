//! Simplex-based convex intersection test over support mappings.
//!
//! Works entirely in the Minkowski difference of the two shapes: the shapes
//! overlap iff the difference contains the origin. A simplex of up to four
//! difference vertices is refined toward the origin; when it becomes a
//! tetrahedron enclosing the origin the shapes intersect.

use glam::DVec3;

use crate::types::{Aabb, Capsule, Sphere};

/// Default iteration bound; guarantees termination on degenerate input.
pub const DEFAULT_MAX_ITERATIONS: usize = 32;

const EPS: f64 = 1e-10;

/// Support mapping of a convex shape: the farthest point of the shape along
/// a non-zero (not necessarily unit) direction. Must be pure and
/// deterministic for the duration of a query.
pub trait SupportFn {
    fn support(&self, direction: DVec3) -> DVec3;
}

impl<F: Fn(DVec3) -> DVec3> SupportFn for F {
    fn support(&self, direction: DVec3) -> DVec3 {
        self(direction)
    }
}

/// Support mapping for an axis-aligned box.
#[must_use]
pub fn aabb_support(aabb: Aabb) -> impl Fn(DVec3) -> DVec3 {
    move |dir: DVec3| {
        DVec3::new(
            if dir.x >= 0.0 { aabb.max.x } else { aabb.min.x },
            if dir.y >= 0.0 { aabb.max.y } else { aabb.min.y },
            if dir.z >= 0.0 { aabb.max.z } else { aabb.min.z },
        )
    }
}

/// Support mapping for a sphere.
#[must_use]
pub fn sphere_support(sphere: Sphere) -> impl Fn(DVec3) -> DVec3 {
    move |dir: DVec3| {
        let len = dir.length();
        if len <= EPS {
            sphere.center + DVec3::X * sphere.radius
        } else {
            sphere.center + dir * (sphere.radius / len)
        }
    }
}

/// Support mapping for a capsule: the farther segment endpoint plus the
/// radius along the query direction.
#[must_use]
pub fn capsule_support(capsule: Capsule) -> impl Fn(DVec3) -> DVec3 {
    move |dir: DVec3| {
        let end = if capsule.point_a.dot(dir) >= capsule.point_b.dot(dir) {
            capsule.point_a
        } else {
            capsule.point_b
        };
        let len = dir.length();
        if len <= EPS {
            end
        } else {
            end + dir * (capsule.radius / len)
        }
    }
}

pub(crate) fn minkowski_support(
    a: &dyn SupportFn,
    b: &dyn SupportFn,
    direction: DVec3,
) -> DVec3 {
    a.support(direction) - b.support(-direction)
}

/// Minkowski-difference simplex: newest vertex first, at most four entries.
#[derive(Debug, Clone, Default)]
pub(crate) struct Simplex {
    points: [DVec3; 4],
    len: usize,
}

impl Simplex {
    fn push(&mut self, point: DVec3) {
        for i in (1..=self.len.min(3)).rev() {
            self.points[i] = self.points[i - 1];
        }
        self.points[0] = point;
        self.len = (self.len + 1).min(4);
    }

    pub(crate) fn points(&self) -> &[DVec3] {
        &self.points[..self.len]
    }

    fn set(&mut self, points: &[DVec3]) {
        self.len = points.len().min(4);
        self.points[..self.len].copy_from_slice(&points[..self.len]);
    }

    /// Reduces the simplex to the feature closest to the origin and points
    /// `direction` at the origin from that feature. Returns true when the
    /// simplex is a tetrahedron containing the origin.
    fn refine(&mut self, direction: &mut DVec3) -> bool {
        match self.len {
            2 => self.refine_segment(direction),
            3 => self.refine_triangle(direction),
            4 => self.refine_tetrahedron(direction),
            _ => false,
        }
    }

    fn refine_segment(&mut self, direction: &mut DVec3) -> bool {
        let a = self.points[0];
        let b = self.points[1];
        let ab = b - a;
        let ao = -a;
        if ab.dot(ao) > 0.0 {
            *direction = triple_product(ab, ao, ab);
        } else {
            self.set(&[a]);
            *direction = ao;
        }
        false
    }

    fn refine_triangle(&mut self, direction: &mut DVec3) -> bool {
        let a = self.points[0];
        let b = self.points[1];
        let c = self.points[2];
        let ab = b - a;
        let ac = c - a;
        let ao = -a;
        let abc = ab.cross(ac);

        if abc.cross(ac).dot(ao) > 0.0 {
            if ac.dot(ao) > 0.0 {
                self.set(&[a, c]);
                *direction = triple_product(ac, ao, ac);
            } else {
                return self.fall_back_to_segment(direction, ab, ao);
            }
        } else if ab.cross(abc).dot(ao) > 0.0 {
            return self.fall_back_to_segment(direction, ab, ao);
        } else if abc.dot(ao) > 0.0 {
            *direction = abc;
        } else {
            // Origin below the triangle: flip the winding so the face
            // normal points back toward it.
            self.set(&[a, c, b]);
            *direction = -abc;
        }
        false
    }

    fn fall_back_to_segment(&mut self, direction: &mut DVec3, ab: DVec3, ao: DVec3) -> bool {
        let a = self.points[0];
        let b = self.points[1];
        if ab.dot(ao) > 0.0 {
            self.set(&[a, b]);
            *direction = triple_product(ab, ao, ab);
        } else {
            self.set(&[a]);
            *direction = ao;
        }
        false
    }

    fn refine_tetrahedron(&mut self, direction: &mut DVec3) -> bool {
        let a = self.points[0];
        let b = self.points[1];
        let c = self.points[2];
        let d = self.points[3];
        let ab = b - a;
        let ac = c - a;
        let ad = d - a;
        let ao = -a;

        if ab.cross(ac).dot(ao) > 0.0 {
            self.set(&[a, b, c]);
            return self.refine_triangle(direction);
        }
        if ac.cross(ad).dot(ao) > 0.0 {
            self.set(&[a, c, d]);
            return self.refine_triangle(direction);
        }
        if ad.cross(ab).dot(ao) > 0.0 {
            self.set(&[a, d, b]);
            return self.refine_triangle(direction);
        }
        true
    }
}

/// `(a x b) x c = b(a.c) - a(b.c)`: perpendicular to `a` pointing toward `c`.
#[inline]
fn triple_product(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    b * a.dot(c) - a * b.dot(c)
}

/// Intersection test with the default iteration bound.
#[must_use]
pub fn intersects(a: &dyn SupportFn, b: &dyn SupportFn) -> bool {
    intersects_with_limit(a, b, DEFAULT_MAX_ITERATIONS)
}

/// Intersection test with a caller-supplied iteration bound.
#[must_use]
pub fn intersects_with_limit(a: &dyn SupportFn, b: &dyn SupportFn, max_iterations: usize) -> bool {
    run(a, b, max_iterations).0
}

/// Full query returning the terminal simplex for penetration extraction.
pub(crate) fn run(
    a: &dyn SupportFn,
    b: &dyn SupportFn,
    max_iterations: usize,
) -> (bool, Simplex) {
    let mut simplex = Simplex::default();
    let first = minkowski_support(a, b, DVec3::X);
    simplex.push(first);
    let mut direction = -first;

    for _ in 0..max_iterations {
        if direction.length_squared() <= EPS * EPS {
            // Origin lies on the current feature; count it as touching.
            return (true, simplex);
        }
        let point = minkowski_support(a, b, direction);
        if point.dot(direction) < 0.0 {
            return (false, simplex);
        }
        simplex.push(point);
        if simplex.refine(&mut direction) {
            return (true, simplex);
        }
    }
    (false, simplex)
}
