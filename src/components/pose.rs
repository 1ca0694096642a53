//! Position and orientation components.
//!
//! Kept as two single-field components rather than one `Pose` struct so that
//! systems which only read orientation (e.g. normal rotation) don't take a
//! read lock on position, and vice versa — the same decomposition the
//! broader `specs` ecosystem uses for transform data.

use cgmath::{Point3, Quaternion};
use specs::{Component, VecStorage};

use crate::real::Real;

/// World-space position of a body's local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Point3<Real>);

impl Component for Position {
    type Storage = VecStorage<Self>;
}

/// World-space orientation of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation(pub Quaternion<Real>);

impl Component for Orientation {
    type Storage = VecStorage<Self>;
}

/// Marker component: bodies carrying this are excluded from the AABB
/// refresher and treated as immovable for this step. Absence means awake.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sleeping;

impl Component for Sleeping {
    type Storage = specs::NullStorage<Self>;
}
