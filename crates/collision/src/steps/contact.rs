//! Iterative position/velocity contact solver.
//!
//! Positional correction pushes overlapping bodies apart proportionally to
//! their inverse masses; velocity resolution applies accumulated normal
//! and tangent impulses with warm-start reuse. Bodies are treated as
//! translating point masses; a zero inverse mass marks a kinematic body
//! the solver never touches.

use glam::DVec3;

use crate::body::RigidBodyAdapter;
use crate::cache::WarmStartImpulse;
use crate::contact::ContactManifold;
use crate::events::{CollisionEvent, CollisionEventKind};
use crate::pair::CollisionPair;

/// Built-in contact responder.
#[derive(Debug, Clone, Copy)]
pub struct ContactSolver {
    position_correction_percent: f64,
    position_correction_slop: f64,
}

impl Default for ContactSolver {
    fn default() -> Self {
        Self {
            position_correction_percent: 0.8,
            position_correction_slop: 0.001,
        }
    }
}

impl ContactSolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics when `value` is not finite or outside `[0, 1]`.
    pub fn set_position_correction_percent(&mut self, value: f64) {
        assert!(
            value.is_finite() && (0.0..=1.0).contains(&value),
            "position correction percent must be in [0,1]"
        );
        self.position_correction_percent = value;
    }

    /// # Panics
    ///
    /// Panics when `value` is not finite or negative.
    pub fn set_position_correction_slop(&mut self, value: f64) {
        assert!(
            value.is_finite() && value >= 0.0,
            "position correction slop must be >= 0"
        );
        self.position_correction_slop = value;
    }

    /// One-shot resolution: a positional pass followed by a velocity pass
    /// with no warm start. Trigger and `Exit` events are ignored.
    pub fn resolve<T>(&self, adapter: &mut dyn RigidBodyAdapter<T>, event: &CollisionEvent<T>) {
        self.solve_position(adapter, event);
        self.solve_velocity(adapter, event, WarmStartImpulse::ZERO);
    }

    /// Positional correction for one event; trigger and `Exit` events are
    /// ignored.
    pub fn solve_position<T>(
        &self,
        adapter: &mut dyn RigidBodyAdapter<T>,
        event: &CollisionEvent<T>,
    ) {
        if !event.response_enabled || event.kind == CollisionEventKind::Exit {
            return;
        }
        self.solve_position_pair(adapter, &event.pair, &event.manifold);
    }

    /// Velocity resolution for one event, returning the accumulated
    /// impulse to persist. Trigger and `Exit` events return the zero
    /// impulse unchanged.
    pub fn solve_velocity<T>(
        &self,
        adapter: &mut dyn RigidBodyAdapter<T>,
        event: &CollisionEvent<T>,
        warm_start: WarmStartImpulse,
    ) -> WarmStartImpulse {
        if !event.response_enabled || event.kind == CollisionEventKind::Exit {
            return WarmStartImpulse::ZERO;
        }
        self.solve_velocity_pair(adapter, &event.pair, &event.manifold, warm_start)
    }

    pub fn solve_position_pair<T>(
        &self,
        adapter: &mut dyn RigidBodyAdapter<T>,
        pair: &CollisionPair<T>,
        manifold: &ContactManifold,
    ) {
        let inv_mass_a = adapter.inverse_mass(pair.first()).max(0.0);
        let inv_mass_b = adapter.inverse_mass(pair.second()).max(0.0);
        let inv_mass_sum = inv_mass_a + inv_mass_b;
        if inv_mass_sum <= 0.0 {
            return;
        }

        let correction_magnitude = (manifold.depth - self.position_correction_slop).max(0.0)
            * self.position_correction_percent
            / inv_mass_sum;
        if correction_magnitude <= 0.0 {
            return;
        }
        let correction = manifold.normal * correction_magnitude;

        let position_a = adapter.position(pair.first());
        let position_b = adapter.position(pair.second());
        adapter.set_position(pair.first(), position_a - correction * inv_mass_a);
        adapter.set_position(pair.second(), position_b + correction * inv_mass_b);
    }

    pub fn solve_velocity_pair<T>(
        &self,
        adapter: &mut dyn RigidBodyAdapter<T>,
        pair: &CollisionPair<T>,
        manifold: &ContactManifold,
        warm_start: WarmStartImpulse,
    ) -> WarmStartImpulse {
        let inv_mass_a = adapter.inverse_mass(pair.first()).max(0.0);
        let inv_mass_b = adapter.inverse_mass(pair.second()).max(0.0);
        let inv_mass_sum = inv_mass_a + inv_mass_b;
        if inv_mass_sum <= 0.0 {
            return WarmStartImpulse::ZERO;
        }

        let normal = manifold.normal;
        let mut velocity_a = adapter.velocity(pair.first());
        let mut velocity_b = adapter.velocity(pair.second());

        if warm_start.normal.abs() > 0.0 || warm_start.tangent.abs() > 0.0 {
            let tangent = tangent_direction(velocity_b - velocity_a, normal);
            let impulse = normal * warm_start.normal + tangent * warm_start.tangent;
            velocity_a -= impulse * inv_mass_a;
            velocity_b += impulse * inv_mass_b;
        }

        let relative_velocity = velocity_b - velocity_a;
        let velocity_along_normal = relative_velocity.dot(normal);
        let mut accumulated_normal = warm_start.normal;
        let mut accumulated_tangent = warm_start.tangent;
        if velocity_along_normal > 0.0 {
            // Separating; keep the warm-start impulse applied and persist
            // the accumulators untouched.
            adapter.set_velocity(pair.first(), velocity_a);
            adapter.set_velocity(pair.second(), velocity_b);
            return WarmStartImpulse { normal: accumulated_normal, tangent: accumulated_tangent };
        }

        let restitution = adapter
            .restitution(pair.first())
            .clamp(0.0, 1.0)
            .min(adapter.restitution(pair.second()).clamp(0.0, 1.0));

        let impulse_scalar = -(1.0 + restitution) * velocity_along_normal / inv_mass_sum;
        let previous_normal = accumulated_normal;
        accumulated_normal = (accumulated_normal + impulse_scalar).max(0.0);
        let normal_delta = accumulated_normal - previous_normal;
        let impulse = normal * normal_delta;
        velocity_a -= impulse * inv_mass_a;
        velocity_b += impulse * inv_mass_b;

        let relative_after_normal = velocity_b - velocity_a;
        let tangent = tangent_direction(relative_after_normal, normal);
        let tangent_scalar = -relative_after_normal.dot(tangent) / inv_mass_sum;
        let friction = (adapter.friction(pair.first()).max(0.0)
            * adapter.friction(pair.second()).max(0.0))
        .sqrt();
        let max_friction = accumulated_normal * friction;
        let desired_tangent = accumulated_tangent + tangent_scalar;
        let clamped_tangent = desired_tangent.clamp(-max_friction, max_friction);
        let tangent_delta = clamped_tangent - accumulated_tangent;
        accumulated_tangent = clamped_tangent;
        if tangent_delta.abs() > 1e-12 {
            let friction_impulse = tangent * tangent_delta;
            velocity_a -= friction_impulse * inv_mass_a;
            velocity_b += friction_impulse * inv_mass_b;
        }

        adapter.set_velocity(pair.first(), velocity_a);
        adapter.set_velocity(pair.second(), velocity_b);
        WarmStartImpulse { normal: accumulated_normal, tangent: accumulated_tangent }
    }
}

/// Unit tangent of the relative velocity against the normal. When the
/// relative velocity is nearly parallel to the normal, any perpendicular
/// direction serves.
fn tangent_direction(relative_velocity: DVec3, normal: DVec3) -> DVec3 {
    let tangent = relative_velocity - normal * relative_velocity.dot(normal);
    let len = tangent.length();
    if len > 1e-9 {
        return tangent / len;
    }
    any_perpendicular(normal)
}

fn any_perpendicular(normal: DVec3) -> DVec3 {
    let axis = if normal.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
    let tangent = normal.cross(axis);
    let len = tangent.length();
    if len <= 1e-9 {
        return DVec3::Z;
    }
    tangent / len
}
