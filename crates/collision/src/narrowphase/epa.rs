//! Expanding-polytope penetration extraction.
//!
//! Once the simplex test proves overlap, the terminal simplex seeds a
//! closed polytope inside the Minkowski difference. The face nearest the
//! origin is pushed outward by new support vertices until the boundary
//! stops improving; that face's outward normal and distance are the
//! contact normal and penetration depth.

use glam::DVec3;

use super::gjk::{self, minkowski_support, SupportFn};
use super::Penetration;

/// Default iteration bound for the expansion loop.
pub const DEFAULT_MAX_ITERATIONS: usize = 64;

/// Expansion terminates once a new vertex improves the nearest face by
/// less than this.
pub const TOLERANCE: f64 = 1e-6;

const MAX_FACES: usize = 128;
const EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy)]
struct Face {
    vertices: [usize; 3],
    normal: DVec3,
    distance: f64,
}

/// Penetration query with default iteration bounds: simplex test first,
/// expansion on overlap. `None` means the shapes are separated.
#[must_use]
pub fn penetration(a: &dyn SupportFn, b: &dyn SupportFn) -> Option<Penetration> {
    penetration_with_limits(a, b, gjk::DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_ITERATIONS)
}

/// Penetration query with caller-supplied iteration bounds.
///
/// The returned normal is unit length and oriented from the first shape
/// toward the second; depth is >= 0 and finite. Degenerate geometry that
/// defeats the expansion falls back to a zero-depth +X manifold rather
/// than reporting separation.
#[must_use]
pub fn penetration_with_limits(
    a: &dyn SupportFn,
    b: &dyn SupportFn,
    gjk_max_iterations: usize,
    epa_max_iterations: usize,
) -> Option<Penetration> {
    let (intersecting, simplex) = gjk::run(a, b, gjk_max_iterations);
    if !intersecting {
        return None;
    }
    Some(expand(a, b, simplex.points(), epa_max_iterations).unwrap_or(FALLBACK))
}

const FALLBACK: Penetration = Penetration {
    normal: DVec3::X,
    depth: 0.0,
};

fn expand(
    a: &dyn SupportFn,
    b: &dyn SupportFn,
    seed: &[DVec3],
    max_iterations: usize,
) -> Option<Penetration> {
    let mut vertices = seed.to_vec();
    complete_tetrahedron(a, b, &mut vertices);
    if vertices.len() < 4 {
        return None;
    }

    let mut faces = Vec::with_capacity(MAX_FACES);
    for indices in [[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]] {
        if let Some(face) = make_face(&vertices, indices) {
            faces.push(face);
        }
    }
    orient_outward(&vertices, &mut faces);
    if faces.is_empty() {
        return None;
    }

    for _ in 0..max_iterations {
        let nearest = nearest_face(&faces)?;
        let face = faces[nearest];
        let point = minkowski_support(a, b, face.normal);
        if !point.is_finite() {
            return None;
        }

        if point.dot(face.normal) - face.distance < TOLERANCE {
            return Some(result_from(face));
        }

        let new_index = vertices.len();
        vertices.push(point);

        // Remove every face the new vertex can see; their unshared edges
        // form the silhouette that gets stitched to the new vertex.
        let mut silhouette: Vec<(usize, usize)> = Vec::new();
        let mut i = 0;
        while i < faces.len() {
            let candidate = faces[i];
            if candidate.normal.dot(point - vertices[candidate.vertices[0]]) > 0.0 {
                let [v0, v1, v2] = candidate.vertices;
                toggle_edge(&mut silhouette, v0, v1);
                toggle_edge(&mut silhouette, v1, v2);
                toggle_edge(&mut silhouette, v2, v0);
                faces.swap_remove(i);
            } else {
                i += 1;
            }
        }

        for (v0, v1) in silhouette {
            if let Some(face) = make_face(&vertices, [new_index, v0, v1]) {
                faces.push(face);
            }
        }
        orient_outward(&vertices, &mut faces);
        if faces.is_empty() || faces.len() > MAX_FACES {
            break;
        }
    }

    nearest_face(&faces).map(|index| result_from(faces[index]))
}

fn result_from(face: Face) -> Penetration {
    Penetration {
        normal: face.normal,
        depth: face.distance.max(0.0),
    }
}

/// Grows a sub-tetrahedral seed with canonical-axis supports, skipping
/// near-duplicate vertices.
fn complete_tetrahedron(a: &dyn SupportFn, b: &dyn SupportFn, vertices: &mut Vec<DVec3>) {
    const DIRECTIONS: [DVec3; 6] = [
        DVec3::X,
        DVec3::Y,
        DVec3::Z,
        DVec3::NEG_X,
        DVec3::NEG_Y,
        DVec3::NEG_Z,
    ];
    for dir in DIRECTIONS {
        if vertices.len() >= 4 {
            return;
        }
        let point = minkowski_support(a, b, dir);
        if vertices.iter().all(|v| v.distance_squared(point) > EPS) {
            vertices.push(point);
        }
    }
}

fn make_face(vertices: &[DVec3], indices: [usize; 3]) -> Option<Face> {
    let a = vertices[indices[0]];
    let b = vertices[indices[1]];
    let c = vertices[indices[2]];
    let normal = (b - a).cross(c - a);
    let len = normal.length();
    if len <= EPS || !normal.is_finite() {
        return None;
    }
    let normal = normal / len;
    Some(Face {
        vertices: indices,
        normal,
        distance: a.dot(normal),
    })
}

/// Flips any face whose normal points back toward the polytope interior.
fn orient_outward(vertices: &[DVec3], faces: &mut [Face]) {
    let centroid =
        vertices.iter().copied().sum::<DVec3>() / vertices.len() as f64;
    for face in faces.iter_mut() {
        let outward = vertices[face.vertices[0]] - centroid;
        if face.normal.dot(outward) < 0.0 {
            face.normal = -face.normal;
            face.distance = -face.distance;
            face.vertices.swap(1, 2);
        }
    }
}

fn nearest_face(faces: &[Face]) -> Option<usize> {
    faces
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.distance.abs().total_cmp(&b.distance.abs()))
        .map(|(index, _)| index)
}

/// Interior edges appear twice with opposite winding; toggling keeps only
/// the silhouette.
fn toggle_edge(edges: &mut Vec<(usize, usize)>, v0: usize, v1: usize) {
    if let Some(found) = edges
        .iter()
        .position(|&(a, b)| (a == v1 && b == v0) || (a == v0 && b == v1))
    {
        edges.swap_remove(found);
    } else {
        edges.push((v0, v1));
    }
}
