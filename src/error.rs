//! Failure taxonomy for the direct-call entry points.
//!
//! Inside a `specs::System::run` these same preconditions are enforced with
//! `.expect()`, since `System::run` has no `Result`-returning contract and a
//! missing component there is a programmer error, not something a caller can
//! recover from. `ManifoldError` exists for the handful of functions that are
//! called directly (outside a `Dispatcher`), e.g. from tests or from an
//! embedding application driving narrowphase for a single pair.

use specs::Entity;
use thiserror::Error;

/// Failures reported by direct (non-system) entry points.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifoldError {
    /// A body participating in a manifold is missing a required component.
    #[error("body {0:?} participates in a manifold but is missing component {1}")]
    MissingComponent(Entity, &'static str),

    /// A manifold's `num_points` exceeds `MAX_CONTACTS`.
    #[error("manifold {0:?} has num_points {1} exceeding MAX_CONTACTS")]
    CapacityInvariantViolated(Entity, usize),
}
