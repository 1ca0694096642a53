//! The broadphase pair table: a symmetric `(body, body) -> manifold`
//! mapping.

use std::collections::HashMap;

use specs::Entity;

/// Maps an overlapping body pair, in either order, to the manifold entity
/// that owns their contact points.
///
/// Both orderings of a pair are stored so that lookup doesn't need to sort
/// its arguments first; `insert`/`remove` always touch both entries
/// together, which is what keeps `(a,b) in T <=> (b,a) in T` true by
/// construction rather than by convention.
#[derive(Debug, Default)]
pub struct PairTable {
    pairs: HashMap<(Entity, Entity), Entity>,
}

impl PairTable {
    pub fn new() -> Self {
        PairTable::default()
    }

    pub fn get(&self, a: Entity, b: Entity) -> Option<Entity> {
        self.pairs.get(&(a, b)).copied()
    }

    pub fn contains(&self, a: Entity, b: Entity) -> bool {
        self.pairs.contains_key(&(a, b))
    }

    /// Registers `manifold` under both `(a,b)` and `(b,a)`.
    pub fn insert(&mut self, a: Entity, b: Entity, manifold: Entity) {
        self.pairs.insert((a, b), manifold);
        self.pairs.insert((b, a), manifold);
    }

    /// Removes both orderings of the pair. Returns the manifold that was
    /// registered, if any.
    pub fn remove(&mut self, a: Entity, b: Entity) -> Option<Entity> {
        self.pairs.remove(&(b, a));
        self.pairs.remove(&(a, b))
    }

    pub fn len_pairs(&self) -> usize {
        self.pairs.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
