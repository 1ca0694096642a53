//! A persistent contact-manifold core for rigid-body physics, built on
//! [`specs`].
//!
//! This crate owns three systems — [`broadphase::AabbRefreshSystem`],
//! [`broadphase::BroadPhaseSystem`], and
//! [`narrowphase::orchestrator::NarrowPhaseSystem`] — meant to run in that
//! order, once per physics step, against a `specs::World` the embedding
//! application builds and owns. This crate never constructs a `World`
//! itself, and never advances bodies, resolves constraints, or schedules
//! sleeping; it only keeps the contact manifolds in agreement with the
//! current poses.
//!
//! A minimal setup:
//!
//! ```ignore
//! let mut world = specs::World::new();
//! world.register::<contact_manifold::Position>();
//! world.register::<contact_manifold::Orientation>();
//! world.register::<contact_manifold::Shape>();
//! world.register::<contact_manifold::Aabb>();
//! world.register::<contact_manifold::Material>();
//! world.register::<contact_manifold::Sleeping>();
//! world.register::<contact_manifold::Manifold>();
//! world.register::<contact_manifold::ContactPoint>();
//! world.register::<contact_manifold::ConstraintRow>();
//! world.insert(contact_manifold::PhysicsConfig::default());
//! world.insert(contact_manifold::DirtyChannel::default());
//! world.insert(contact_manifold::PairTable::default());
//! world.insert(contact_manifold::PairEventChannel::default());
//! world.insert(contact_manifold::ColliderResource::default());
//!
//! let mut dispatcher = specs::DispatcherBuilder::new()
//!     .with(contact_manifold::AabbRefreshSystem, "aabb_refresh", &[])
//!     .with(contact_manifold::BroadPhaseSystem, "broadphase", &["aabb_refresh"])
//!     .with(contact_manifold::NarrowPhaseSystem, "narrowphase", &["broadphase"])
//!     .build();
//! dispatcher.dispatch(&world);
//! world.maintain();
//! ```

pub mod broadphase;
pub mod collide;
pub mod components;
pub mod config;
pub mod constants;
pub mod dirty;
pub mod error;
pub mod narrowphase;
pub mod pair_table;
pub mod parallel;
pub mod real;

pub use broadphase::{AabbRefreshSystem, BroadPhaseSystem, PairEvent, PairEventChannel, PairEventKind};
pub use collide::{AnalyticCollider, ColliderResource, ContactCandidate, ResultSet, ShapeCollider};
pub use components::{Aabb, ConstraintRow, ContactPoint, Manifold, Material, Orientation, Position, Shape, Sleeping};
pub use config::PhysicsConfig;
pub use constants::{CACHING_THRESHOLD, CONTACT_BREAKING_THRESHOLD, LARGE_SCALAR, MAX_CONTACTS};
pub use dirty::{ChangeKind, ComponentKind, DirtyChannel, DirtyEvent};
pub use error::ManifoldError;
pub use narrowphase::orchestrator::NarrowPhaseSystem;
pub use narrowphase::{run_manifold_pipeline_checked, ManifoldWorkspace, Slot, SlotChange};
pub use pair_table::PairTable;
pub use real::Real;
