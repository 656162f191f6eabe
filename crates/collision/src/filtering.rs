//! Layer/mask filtering and solid-versus-trigger classification.

use crate::pair::CollisionPair;

/// Whether a collider produces a physical response or only events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionKind {
    Solid,
    Trigger,
}

/// Layer/mask filter attached to an item.
///
/// A pair `(a, b)` passes the filter iff `(a.layer & b.mask) != 0` and
/// `(b.layer & a.mask) != 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionFilter {
    pub layer: u32,
    pub mask: u32,
    pub kind: CollisionKind,
}

impl CollisionFilter {
    /// Matches everything and responds as a solid.
    pub const DEFAULT: CollisionFilter = CollisionFilter {
        layer: u32::MAX,
        mask: u32::MAX,
        kind: CollisionKind::Solid,
    };

    #[must_use]
    pub const fn new(layer: u32, mask: u32, kind: CollisionKind) -> Self {
        Self { layer, mask, kind }
    }

    #[must_use]
    pub fn accepts(&self, other: &CollisionFilter) -> bool {
        (self.layer & other.mask) != 0 && (other.layer & self.mask) != 0
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A candidate pair that survived filtering, annotated with whether the
/// solver may respond to it (false for trigger pairs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredPair<T> {
    pub pair: CollisionPair<T>,
    pub response_enabled: bool,
}

/// Classifies broad-phase candidates through each item's filter.
///
/// `filter_of` returning `None` resolves to [`CollisionFilter::DEFAULT`].
/// Output preserves input order, so the result is deterministic for a
/// deterministic candidate list.
pub fn filter_pairs<T>(
    candidates: Vec<CollisionPair<T>>,
    filter_of: &dyn Fn(&T) -> Option<CollisionFilter>,
) -> Vec<FilteredPair<T>> {
    let mut out = Vec::with_capacity(candidates.len());
    for pair in candidates {
        let filter_a = filter_of(pair.first()).unwrap_or_default();
        let filter_b = filter_of(pair.second()).unwrap_or_default();
        if !filter_a.accepts(&filter_b) {
            continue;
        }
        let response_enabled =
            filter_a.kind == CollisionKind::Solid && filter_b.kind == CollisionKind::Solid;
        out.push(FilteredPair { pair, response_enabled });
    }
    out
}
