//! Per-stage solver steps driven by the world each frame.

pub mod constraint;
pub mod contact;
pub mod integration;

pub use constraint::{Constraint, DistanceConstraint, PointConstraint};
pub use contact::ContactSolver;
