//! AABB refresh and the broadphase pair table.

use specs::{Entities, Entity, Join, Read, ReadStorage, System, Write, WriteStorage};
use shrev::EventChannel;
use tracing::{debug, debug_span};

use crate::components::shape::{inflate, intersects};
use crate::components::{Aabb, Manifold, Orientation, Position, Shape, Sleeping};
use crate::config::PhysicsConfig;
use crate::dirty::{ComponentKind, DirtyChannel, DirtyEvent};
use crate::pair_table::PairTable;

/// Recomputes the world-space AABB of every awake, shaped body.
///
/// Sleeping bodies (carrying [`Sleeping`]) are skipped; their AABB is left
/// as it was on their last active step.
#[derive(Debug, Default)]
pub struct AabbRefreshSystem;

impl<'a> System<'a> for AabbRefreshSystem {
    type SystemData = (
        Entities<'a>,
        ReadStorage<'a, Position>,
        ReadStorage<'a, Orientation>,
        ReadStorage<'a, Shape>,
        WriteStorage<'a, Aabb>,
        ReadStorage<'a, Sleeping>,
    );

    fn run(&mut self, (entities, positions, orientations, shapes, mut aabbs, sleeping): Self::SystemData) {
        let _span = debug_span!("aabb_refresh").entered();
        let mut refreshed = 0usize;
        for (entity, position, orientation, shape, _) in
            (&entities, &positions, &orientations, &shapes, !&sleeping).join()
        {
            let aabb = shape.aabb(position, orientation);
            aabbs.insert(entity, Aabb(aabb)).expect("entity must be alive");
            refreshed += 1;
        }
        debug!(refreshed, "aabb refresh complete");
    }
}

/// A transition of the broadphase pair table.
#[derive(Debug, Clone, Copy)]
pub struct PairEvent {
    pub bodies: (Entity, Entity),
    pub manifold: Entity,
    pub kind: PairEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairEventKind {
    Created,
    Destroyed,
}

/// Channel downstream consumers (e.g. an island/sleeping partitioner) read
/// to learn which pairs started or stopped overlapping this step.
pub type PairEventChannel = EventChannel<PairEvent>;

/// Brings the pair table into agreement with the current AABBs, using the
/// asymmetric hysteresis margins between creation and breaking.
#[derive(Debug, Default)]
pub struct BroadPhaseSystem;

impl<'a> System<'a> for BroadPhaseSystem {
    type SystemData = (
        Entities<'a>,
        ReadStorage<'a, Aabb>,
        WriteStorage<'a, Manifold>,
        Write<'a, PairTable>,
        Write<'a, DirtyChannel>,
        Write<'a, PairEventChannel>,
        Read<'a, PhysicsConfig>,
    );

    fn run(
        &mut self,
        (entities, aabbs, mut manifolds, mut pair_table, mut dirty, mut pair_events, config): Self::SystemData,
    ) {
        let _span = debug_span!("broadphase").entered();
        let separation_offset = config.separation_offset();
        let break_offset = config.break_offset();

        // --- destroy pass ---
        let mut to_destroy = Vec::new();
        for (manifold_entity, manifold) in (&entities, &manifolds).join() {
            let (b0, b1) = manifold.bodies;
            let still_overlapping = match (aabbs.get(b0), aabbs.get(b1)) {
                (Some(a0), Some(a1)) => intersects(
                    &inflate(&a0.0, -separation_offset),
                    &inflate(&a1.0, -separation_offset),
                ),
                // A missing AABB means a body in the pair vanished; treat as separation.
                _ => false,
            };
            if !still_overlapping {
                to_destroy.push((manifold_entity, manifold.bodies, manifold.points));
            }
        }
        let destroyed_count = to_destroy.len();
        for (manifold_entity, (b0, b1), points) in to_destroy {
            pair_table.remove(b0, b1);
            for point in points.into_iter().flatten() {
                entities.delete(point).expect("contact point entity must be alive");
                dirty.single_write(DirtyEvent::destroyed(point, ComponentKind::ContactPoint));
            }
            entities.delete(manifold_entity).expect("manifold entity must be alive");
            dirty.single_write(DirtyEvent::destroyed(manifold_entity, ComponentKind::Manifold));
            pair_events.single_write(PairEvent {
                bodies: (b0, b1),
                manifold: manifold_entity,
                kind: PairEventKind::Destroyed,
            });
        }

        // --- create pass ---
        let mut bodies: Vec<(Entity, Aabb)> = (&entities, &aabbs).join().map(|(e, a)| (e, *a)).collect();
        bodies.sort_by_key(|(e, _)| e.id());

        let mut created_count = 0usize;
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (e0, a0) = bodies[i];
                let (e1, a1) = bodies[j];
                if pair_table.contains(e0, e1) {
                    continue;
                }
                if intersects(&inflate(&a0.0, -break_offset), &inflate(&a1.0, -break_offset)) {
                    let manifold_entity = entities.create();
                    manifolds
                        .insert(manifold_entity, Manifold::new((e0, e1)))
                        .expect("freshly created entity must be insertable");
                    pair_table.insert(e0, e1, manifold_entity);
                    dirty.single_write(DirtyEvent::created(manifold_entity, ComponentKind::Manifold));
                    pair_events.single_write(PairEvent {
                        bodies: (e0, e1),
                        manifold: manifold_entity,
                        kind: PairEventKind::Created,
                    });
                    created_count += 1;
                }
            }
        }

        debug!(destroyed_count, created_count, "broadphase pair table updated");
    }
}
