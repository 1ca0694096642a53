//! ECS component definitions owned by this crate.
//!
//! Everything here is a plain `specs::Component`; the `specs::World` that
//! stores them is an external collaborator — this crate never
//! constructs or owns a `World` itself, only the systems and components
//! that plug into one.

pub mod manifold;
pub mod material;
pub mod pose;
pub mod shape;

pub use manifold::{ConstraintRow, ContactPoint, Manifold};
pub use material::Material;
pub use pose::{Orientation, Position, Sleeping};
pub use shape::{Aabb, Shape};
