//! Separating-axis tests for 2D convex polygons.
//!
//! A planar variant of the narrow phase for hosts that run gameplay logic
//! on a 2D slice; not part of the 3D frame loop.

use glam::DVec2;

const EPSILON: f64 = 1e-9;

/// Immutable convex polygon with at least three ordered, finite vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon2D {
    vertices: Vec<DVec2>,
}

impl ConvexPolygon2D {
    /// # Panics
    ///
    /// Panics when fewer than three vertices are given, a vertex is
    /// non-finite, consecutive vertices coincide, or the winding is not
    /// consistently convex.
    #[must_use]
    pub fn new(vertices: Vec<DVec2>) -> Self {
        assert!(vertices.len() >= 3, "convex polygon requires at least 3 points");
        assert!(
            vertices.iter().all(|v| v.is_finite()),
            "all vertices must be finite"
        );
        for i in 0..vertices.len() {
            let a = vertices[i];
            let b = vertices[(i + 1) % vertices.len()];
            assert!(
                a.distance_squared(b) > EPSILON * EPSILON,
                "polygon contains duplicate consecutive points"
            );
        }
        assert_convex(&vertices);
        Self { vertices }
    }

    /// Builds a polygon from flat `x, y` coordinate pairs.
    ///
    /// # Panics
    ///
    /// Panics on an odd coordinate count, fewer than three pairs, or any
    /// violation listed for [`ConvexPolygon2D::new`].
    #[must_use]
    pub fn from_coords(coords: &[f64]) -> Self {
        assert!(
            coords.len() >= 6 && coords.len() % 2 == 0,
            "coordinates must contain at least 3 xy pairs"
        );
        Self::new(
            coords
                .chunks_exact(2)
                .map(|pair| DVec2::new(pair[0], pair[1]))
                .collect(),
        )
    }

    #[must_use]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    #[must_use]
    pub fn centroid(&self) -> DVec2 {
        self.vertices.iter().copied().sum::<DVec2>() / self.vertices.len() as f64
    }
}

fn assert_convex(vertices: &[DVec2]) {
    let mut sign = 0i8;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        let c = vertices[(i + 2) % vertices.len()];
        let cross = (b - a).perp_dot(c - b);
        if cross.abs() <= EPSILON {
            continue;
        }
        let current = if cross > 0.0 { 1 } else { -1 };
        if sign == 0 {
            sign = current;
        } else {
            assert!(sign == current, "polygon must be convex and ordered");
        }
    }
    assert!(sign != 0, "polygon points are collinear");
}

/// Minimum-overlap separation evidence for a 2D polygon pair: a unit axis
/// oriented from the first polygon toward the second and the overlap depth
/// along it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manifold2D {
    pub axis: DVec2,
    pub overlap: f64,
}

/// Projection of a polygon onto an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Shared extent with `other`; negative when the intervals are disjoint.
    #[must_use]
    pub fn overlap_depth(&self, other: &Interval) -> f64 {
        self.max.min(other.max) - self.min.max(other.min)
    }
}

#[must_use]
pub fn intersects(a: &ConvexPolygon2D, b: &ConvexPolygon2D) -> bool {
    intersects_with_manifold(a, b).is_some()
}

/// Tests every edge normal of both polygons; the first separating axis
/// ends the query, otherwise the axis of minimum overlap (oriented by the
/// centroid delta) is returned.
#[must_use]
pub fn intersects_with_manifold(a: &ConvexPolygon2D, b: &ConvexPolygon2D) -> Option<Manifold2D> {
    let center_delta = b.centroid() - a.centroid();
    let mut best: Option<Manifold2D> = None;

    for source in [a, b] {
        let vertices = source.vertices();
        for i in 0..vertices.len() {
            let edge = vertices[(i + 1) % vertices.len()] - vertices[i];
            let axis = DVec2::new(-edge.y, edge.x);
            let len_sq = axis.length_squared();
            if len_sq <= EPSILON {
                continue;
            }
            let axis = axis / len_sq.sqrt();

            let overlap = project(a, axis).overlap_depth(&project(b, axis));
            if overlap < 0.0 {
                return None;
            }
            if best.map_or(true, |m| overlap < m.overlap) {
                let oriented = if center_delta.dot(axis) < 0.0 { -axis } else { axis };
                best = Some(Manifold2D { axis: oriented, overlap });
            }
        }
    }
    best
}

/// Projects the polygon onto a (normalized internally) non-zero axis.
///
/// # Panics
///
/// Panics when the axis is non-finite or has zero length.
#[must_use]
pub fn project(polygon: &ConvexPolygon2D, axis: DVec2) -> Interval {
    assert!(axis.is_finite(), "axis components must be finite");
    let len_sq = axis.length_squared();
    assert!(len_sq > EPSILON, "axis must be non-zero");
    let axis = axis / len_sq.sqrt();

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for vertex in polygon.vertices() {
        let projection = vertex.dot(axis);
        min = min.min(projection);
        max = max.max(projection);
    }
    Interval { min, max }
}
