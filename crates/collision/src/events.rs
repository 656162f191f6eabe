//! Frame-to-frame collision event lifecycle.

use crate::contact::ContactManifold;
use crate::pair::CollisionPair;

/// Lifecycle stage of a colliding pair relative to the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionEventKind {
    /// The pair collides this frame but did not last frame.
    Enter,
    /// The pair collides this frame and also did last frame.
    Stay,
    /// The pair collided last frame but no longer does.
    Exit,
}

/// One event emitted by the world's frame diff.
///
/// An `Exit` event carries the last manifold seen while the pair was still
/// colliding, along with that frame's response flag.
#[derive(Debug, Clone)]
pub struct CollisionEvent<T> {
    pub pair: CollisionPair<T>,
    pub kind: CollisionEventKind,
    pub response_enabled: bool,
    pub manifold: ContactManifold,
}
