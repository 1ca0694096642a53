//! Tunable constants governing manifold lifecycle and capacity.
//!
//! `MAX_CONTACTS` fixes the manifold's array capacity at compile time, so it
//! lives here rather than in [`crate::config::PhysicsConfig`]; everything
//! else the config resource can override at runtime.

use crate::real::Real;

/// Per-manifold contact-point capacity.
pub const MAX_CONTACTS: usize = 4;

/// Default max separation to keep a contact, in length units.
pub const CONTACT_BREAKING_THRESHOLD: Real = 0.02;

/// Default max pivot drift to consider an incoming contact "the same" as a
/// persisted one.
pub const CACHING_THRESHOLD: Real = CONTACT_BREAKING_THRESHOLD;

/// Sentinel stiffness/damping value meaning "rigid" (infinitely stiff).
pub const LARGE_SCALAR: Real = 1.0e18;
