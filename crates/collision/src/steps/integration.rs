//! Velocity and position integration for the world step.
//!
//! Bodies are translating point masses; a zero inverse mass marks a
//! kinematic body that is never accelerated or advanced.

use glam::DVec3;

use crate::body::RigidBodyAdapter;

/// Adds `gravity * dt` to every dynamic body's velocity.
pub fn integrate_velocities<T>(
    adapter: &mut dyn RigidBodyAdapter<T>,
    items: &[T],
    gravity: DVec3,
    dt: f64,
) {
    for body in items {
        if adapter.inverse_mass(body).max(0.0) <= 0.0 {
            continue;
        }
        let velocity = adapter.velocity(body);
        adapter.set_velocity(body, velocity + gravity * dt);
    }
}

/// Advances every dynamic body's position by `velocity * dt`.
pub fn integrate_positions<T>(adapter: &mut dyn RigidBodyAdapter<T>, items: &[T], dt: f64) {
    for body in items {
        if adapter.inverse_mass(body).max(0.0) <= 0.0 {
            continue;
        }
        let position = adapter.position(body);
        let velocity = adapter.velocity(body);
        adapter.set_position(body, position + velocity * dt);
    }
}
