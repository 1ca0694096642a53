//! Per-step lifecycle reporting for manifolds and contact points.
//!
//! Downstream island/solver stages read this channel with their own
//! `shrev::ReaderId` once per step, the same pattern the wider `specs` +
//! `shrev` ecosystem uses for `ContactEvent` propagation.

use specs::Entity;
use shrev::EventChannel;

/// The component kind a [`DirtyEvent`] is about. `Other` lets an embedding
/// application register additional component types it wants diffed through
/// this same channel without this crate knowing about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Manifold,
    ContactPoint,
    Other(std::any::TypeId),
}

/// What happened to the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Updated,
    Destroyed,
}

/// One lifecycle notification for `entity`'s `component`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirtyEvent {
    pub entity: Entity,
    pub component: ComponentKind,
    pub kind: ChangeKind,
}

impl DirtyEvent {
    pub fn created(entity: Entity, component: ComponentKind) -> Self {
        DirtyEvent { entity, component, kind: ChangeKind::Created }
    }

    pub fn updated(entity: Entity, component: ComponentKind) -> Self {
        DirtyEvent { entity, component, kind: ChangeKind::Updated }
    }

    pub fn destroyed(entity: Entity, component: ComponentKind) -> Self {
        DirtyEvent { entity, component, kind: ChangeKind::Destroyed }
    }
}

/// The world resource carrying the dirty log. Insert with
/// `world.insert(DirtyChannel::default())`.
pub type DirtyChannel = EventChannel<DirtyEvent>;
