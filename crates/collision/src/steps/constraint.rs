//! Positional constraints solved before the collision pass.

use glam::DVec3;

use crate::body::RigidBodyAdapter;

/// A positional constraint applied once per constraint iteration.
pub trait Constraint<T> {
    fn solve(&self, adapter: &mut dyn RigidBodyAdapter<T>, dt: f64);
}

/// Keeps two bodies near a target distance, splitting the correction by
/// inverse-mass ratio.
#[derive(Debug, Clone)]
pub struct DistanceConstraint<T> {
    body_a: T,
    body_b: T,
    target_distance: f64,
    stiffness: f64,
}

impl<T> DistanceConstraint<T> {
    /// # Panics
    ///
    /// Panics when `target_distance < 0` or `stiffness` is outside `[0, 1]`.
    #[must_use]
    pub fn new(body_a: T, body_b: T, target_distance: f64, stiffness: f64) -> Self {
        assert!(
            target_distance.is_finite() && target_distance >= 0.0,
            "target distance must be >= 0"
        );
        assert!(
            stiffness.is_finite() && (0.0..=1.0).contains(&stiffness),
            "stiffness must be in [0,1]"
        );
        Self { body_a, body_b, target_distance, stiffness }
    }
}

impl<T> Constraint<T> for DistanceConstraint<T> {
    fn solve(&self, adapter: &mut dyn RigidBodyAdapter<T>, _dt: f64) {
        let pa = adapter.position(&self.body_a);
        let pb = adapter.position(&self.body_b);
        let delta = pb - pa;
        let dist = delta.length();
        if dist <= 1e-9 {
            return;
        }

        let inv_mass_a = adapter.inverse_mass(&self.body_a).max(0.0);
        let inv_mass_b = adapter.inverse_mass(&self.body_b).max(0.0);
        let inv_mass_sum = inv_mass_a + inv_mass_b;
        if inv_mass_sum <= 0.0 {
            return;
        }

        let error = dist - self.target_distance;
        if error.abs() <= 1e-9 {
            return;
        }
        let correction = delta / dist * (error * self.stiffness);
        adapter.set_position(&self.body_a, pa + correction * (inv_mass_a / inv_mass_sum));
        adapter.set_position(&self.body_b, pb - correction * (inv_mass_b / inv_mass_sum));
    }
}

/// Pulls a body toward a fixed world-space anchor.
#[derive(Debug, Clone)]
pub struct PointConstraint<T> {
    body: T,
    anchor: DVec3,
    stiffness: f64,
}

impl<T> PointConstraint<T> {
    /// # Panics
    ///
    /// Panics when the anchor is non-finite or `stiffness` is outside
    /// `[0, 1]`.
    #[must_use]
    pub fn new(body: T, anchor: DVec3, stiffness: f64) -> Self {
        assert!(anchor.is_finite(), "anchor must be finite");
        assert!(
            stiffness.is_finite() && (0.0..=1.0).contains(&stiffness),
            "stiffness must be in [0,1]"
        );
        Self { body, anchor, stiffness }
    }
}

impl<T> Constraint<T> for PointConstraint<T> {
    fn solve(&self, adapter: &mut dyn RigidBodyAdapter<T>, _dt: f64) {
        if adapter.inverse_mass(&self.body).max(0.0) <= 0.0 {
            return;
        }
        let p = adapter.position(&self.body);
        adapter.set_position(&self.body, p + (self.anchor - p) * self.stiffness);
    }
}
