//! Unordered pair identity used to key frame maps and the manifold cache.

use std::hash::{Hash, Hasher};

/// A pair of items whose equality and hash ignore argument order:
/// `{a, b} == {b, a}`. The construction order is preserved for iteration
/// and event reporting, but never participates in identity.
#[derive(Debug, Clone)]
pub struct CollisionPair<T> {
    first: T,
    second: T,
}

impl<T> CollisionPair<T> {
    pub fn new(first: T, second: T) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &T {
        &self.first
    }

    pub fn second(&self) -> &T {
        &self.second
    }
}

impl<T: PartialEq> PartialEq for CollisionPair<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.first == other.first && self.second == other.second)
            || (self.first == other.second && self.second == other.first)
    }
}

impl<T: Eq> Eq for CollisionPair<T> {}

impl<T: Hash> Hash for CollisionPair<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // XOR of the member hashes commutes, so swapped pairs collide on
        // the same bucket and the symmetric Eq above resolves them.
        let mut a = std::collections::hash_map::DefaultHasher::new();
        self.first.hash(&mut a);
        let mut b = std::collections::hash_map::DefaultHasher::new();
        self.second.hash(&mut b);
        state.write_u64(a.finish() ^ b.finish());
    }
}
