//! The shape-vs-shape collision boundary.
//!
//! Everything in this module is treated as an external collaborator: the
//! narrowphase pipeline only ever calls
//! [`ShapeCollider::collide`] and never inspects shape geometry itself. A
//! reference implementation, [`AnalyticCollider`], is provided so the crate
//! is testable end to end without a full GJK/EPA stack; production users
//! are expected to swap in their own (e.g. backed by `ncollide`/`parry`).

mod analytic;
mod resource;

pub use analytic::AnalyticCollider;
pub use resource::ColliderResource;

use cgmath::Vector3;

use crate::components::{Orientation, Position, Shape};
use crate::real::Real;

/// One candidate contact in body-local frames, as produced by a
/// [`ShapeCollider`]. `normal_b` is unit-length in body B's local frame;
/// `distance` is the signed separation along the world-space normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactCandidate {
    pub pivot_a: Vector3<Real>,
    pub pivot_b: Vector3<Real>,
    pub normal_b: Vector3<Real>,
    pub distance: Real,
}

/// Up to `MAX_CONTACTS` candidates returned by a single `collide` call.
/// Callers must not rely on more than `crate::constants::MAX_CONTACTS`
/// entries being present.
pub type ResultSet = Vec<ContactCandidate>;

/// The narrowphase's only dependency on shape geometry.
pub trait ShapeCollider: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn collide(
        &self,
        shape_a: &Shape,
        pose_a: (&Position, &Orientation),
        shape_b: &Shape,
        pose_b: (&Position, &Orientation),
        threshold: Real,
    ) -> ResultSet;
}
