//! Runtime-tunable thresholds, inserted into the `specs::World` as a resource.

use crate::constants::{CACHING_THRESHOLD, CONTACT_BREAKING_THRESHOLD, LARGE_SCALAR};
use crate::real::Real;

/// Tunables for the broadphase and narrowphase, read by every system in this
/// crate. Insert a (possibly customised) instance with
/// `world.insert(PhysicsConfig::default())` before building the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// Max separation to keep a contact; also the broadphase creation margin.
    pub contact_breaking_threshold: Real,
    /// Max pivot drift at which an incoming contact is considered "the same".
    pub caching_threshold: Real,
    /// Stiffness/damping sentinel meaning "rigid".
    pub large_scalar: Real,
    /// Force the narrowphase orchestrator to always run serially, even with
    /// more than one manifold. Useful for deterministic tests.
    pub force_serial: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            contact_breaking_threshold: CONTACT_BREAKING_THRESHOLD,
            caching_threshold: CACHING_THRESHOLD,
            large_scalar: LARGE_SCALAR,
            force_serial: false,
        }
    }
}

impl PhysicsConfig {
    /// `BREAK_OFFSET`: the tight margin used for contact persistence and
    /// pair creation.
    pub fn break_offset(&self) -> Real {
        self.contact_breaking_threshold
    }

    /// `SEPARATION_OFFSET`: the loose margin used for pair destruction.
    /// Twice the breaking threshold, implementing the hysteresis band.
    pub fn separation_offset(&self) -> Real {
        self.contact_breaking_threshold * 2.0
    }
}
