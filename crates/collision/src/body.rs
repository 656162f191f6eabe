//! Host-supplied view onto rigid-body state.

use glam::DVec3;

/// Adapter for reading and writing body state owned by the host.
///
/// `position`/`set_position` and `velocity`/`set_velocity` must reference
/// the same world-space frame, and every returned scalar must be finite.
/// An inverse mass of `0` marks a kinematic body: the solver and the
/// integrators never change its position or velocity. Restitution is
/// clamped to `[0, 1]` and friction to `>= 0` inside the solver, so the
/// host may return raw material values.
///
/// For animation-driven bodies, apply the authored pose first, then run
/// the collision step, then read back the resolved state.
pub trait RigidBodyAdapter<T> {
    fn position(&self, body: &T) -> DVec3;

    fn set_position(&mut self, body: &T, position: DVec3);

    fn velocity(&self, body: &T) -> DVec3;

    fn set_velocity(&mut self, body: &T, velocity: DVec3);

    fn inverse_mass(&self, body: &T) -> f64;

    fn restitution(&self, body: &T) -> f64;

    fn friction(&self, body: &T) -> f64;
}
