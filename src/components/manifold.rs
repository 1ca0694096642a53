//! The persistent manifold, its contact points, and their constraint rows.

use cgmath::Vector3;
use specs::{Component, Entity, HashMapStorage, VecStorage};

use crate::constants::MAX_CONTACTS;
use crate::real::Real;

/// Fixed-capacity set of persistent contact points for one body pair.
///
/// `points[0..num_points)` are live contact-point entities; the remainder
/// are `None` sentinels. `bodies` is the ordered pair this manifold was
/// created for (always `bodies.0 < bodies.1` — see `PairTable`).
#[derive(Debug, Clone, Copy)]
pub struct Manifold {
    pub bodies: (Entity, Entity),
    pub points: [Option<Entity>; MAX_CONTACTS],
    pub num_points: usize,
}

impl Manifold {
    pub fn new(bodies: (Entity, Entity)) -> Self {
        Manifold {
            bodies,
            points: [None; MAX_CONTACTS],
            num_points: 0,
        }
    }

    /// Live contact-point handles, i.e. `points[0..num_points)`.
    pub fn live_points(&self) -> &[Option<Entity>] {
        &self.points[..self.num_points]
    }

    /// Removes the point at `index` by swapping in the last live point,
    /// keeping `[0, num_points)` dense. Returns the removed entity.
    pub fn swap_remove(&mut self, index: usize) -> Entity {
        debug_assert!(index < self.num_points);
        let removed = self.points[index].take().expect("live slot held no entity");
        let last = self.num_points - 1;
        if index != last {
            self.points[index] = self.points[last].take();
        }
        self.num_points = last;
        removed
    }
}

impl Component for Manifold {
    type Storage = HashMapStorage<Self>;
}

/// A single persistent contact anchor within a manifold.
///
/// `pivot_a`/`pivot_b` are local-space anchors on `body_a`/`body_b`;
/// `normal_b` is a unit vector in `body_b`'s local frame. `distance` is the
/// signed separation along the world-space normal, refreshed at the start
/// of every step before pruning runs.
#[derive(Debug, Clone, Copy)]
pub struct ContactPoint {
    pub manifold: Entity,
    pub body_a: Entity,
    pub body_b: Entity,
    pub pivot_a: Vector3<Real>,
    pub pivot_b: Vector3<Real>,
    pub normal_b: Vector3<Real>,
    pub distance: Real,
    pub lifetime: u32,
    pub friction: Real,
    pub restitution: Real,
}

impl Component for ContactPoint {
    type Storage = VecStorage<Self>;
}

/// The solver's warm-start state for one contact point, plus the
/// series-combined stiffness/damping used to build its constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintRow {
    pub normal_impulse: Real,
    pub stiffness: Real,
    pub damping: Real,
}

impl ConstraintRow {
    /// Resets the warm-start impulse to zero, leaving the material-derived
    /// constants untouched. Called whenever a slot is *replaced* (as
    /// opposed to merged) with a new contact.
    pub fn reset_impulse(&mut self) {
        self.normal_impulse = 0.0;
    }
}

impl Component for ConstraintRow {
    type Storage = VecStorage<Self>;
}
