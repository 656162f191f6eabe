use thiserror::Error;

/// Errors surfaced by fallible world operations.
///
/// Constructor contract violations (non-finite scalars, negative radii,
/// out-of-range tuning values) panic at the call site instead; only
/// operations whose failure a caller may reasonably handle return `Result`.
#[derive(Debug, Error)]
pub enum CollisionError {
    /// `step` was called with a non-finite or non-positive time step.
    #[error("time step must be finite and > 0, got {0}")]
    InvalidTimestep(f64),

    /// `step` requires a bound rigid-body adapter.
    #[error("a body adapter must be bound before calling step()")]
    MissingBodyAdapter,
}
