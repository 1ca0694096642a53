//! Wires [`super::run_manifold_pipeline`] into a `specs::System`: gather a
//! workspace per manifold, run the pipeline (optionally across threads),
//! and commit the results back to the `World`.

use specs::{Entities, Entity, Join, Read, ReadStorage, System, Write, WriteStorage};
use tracing::{debug, debug_span};

use crate::collide::ColliderResource;
use crate::components::{Aabb, ConstraintRow, ContactPoint, Manifold, Material, Orientation, Position, Shape};
use crate::config::PhysicsConfig;
use crate::constants::MAX_CONTACTS;
use crate::dirty::{ChangeKind, ComponentKind, DirtyChannel, DirtyEvent};
use crate::parallel::parallel_for;

use super::{run_manifold_pipeline, ManifoldWorkspace, Slot, SlotChange};

/// Runs the narrowphase pipeline for every live manifold.
///
/// Manifolds are processed in `Entity::id()` order, in a buffered
/// gather/run/commit split: gather and commit are always serial (they touch
/// shared `specs` storages), and only the middle run phase is allowed to
/// fan out across manifolds, since each [`ManifoldWorkspace`] is an
/// independently-owned, disjoint slice element — see the data-race
/// discipline in the design notes.
#[derive(Debug, Default)]
pub struct NarrowPhaseSystem;

impl<'a> System<'a> for NarrowPhaseSystem {
    type SystemData = (
        Entities<'a>,
        ReadStorage<'a, Position>,
        ReadStorage<'a, Orientation>,
        ReadStorage<'a, Shape>,
        ReadStorage<'a, Material>,
        ReadStorage<'a, Aabb>,
        WriteStorage<'a, Manifold>,
        WriteStorage<'a, ContactPoint>,
        WriteStorage<'a, ConstraintRow>,
        Write<'a, DirtyChannel>,
        Read<'a, PhysicsConfig>,
        Read<'a, ColliderResource>,
    );

    fn run(
        &mut self,
        (
            entities,
            positions,
            orientations,
            shapes,
            materials,
            aabbs,
            mut manifolds,
            mut contact_points,
            mut constraint_rows,
            mut dirty,
            config,
            collider,
        ): Self::SystemData,
    ) {
        let _span = debug_span!("narrowphase").entered();

        // --- gather (serial) ---
        let mut manifold_entities: Vec<Entity> = (&entities, &manifolds).join().map(|(e, _)| e).collect();
        manifold_entities.sort_by_key(|e| e.id());

        let mut workspaces: Vec<ManifoldWorkspace> = manifold_entities
            .iter()
            .map(|&manifold_entity| {
                let manifold = manifolds.get(manifold_entity).expect("just listed as live");
                let (b0, b1) = manifold.bodies;
                let slots = manifold
                    .live_points()
                    .iter()
                    .map(|point| {
                        let entity = point.expect("live slot held no entity");
                        let data = *contact_points.get(entity).expect("contact point entity missing its component");
                        let constraint = constraint_rows.get(entity).copied();
                        Slot { entity: Some(entity), data, constraint, change: SlotChange::Untouched }
                    })
                    .collect();

                ManifoldWorkspace {
                    manifold: manifold_entity,
                    bodies: (b0, b1),
                    pose_a: (
                        *positions.get(b0).expect("manifold body missing Position"),
                        *orientations.get(b0).expect("manifold body missing Orientation"),
                    ),
                    pose_b: (
                        *positions.get(b1).expect("manifold body missing Position"),
                        *orientations.get(b1).expect("manifold body missing Orientation"),
                    ),
                    shape_a: *shapes.get(b0).expect("manifold body missing Shape"),
                    shape_b: *shapes.get(b1).expect("manifold body missing Shape"),
                    aabb_a: aabbs.get(b0).map(|a| a.0),
                    aabb_b: aabbs.get(b1).map(|a| a.0),
                    material_a: materials.get(b0).copied(),
                    material_b: materials.get(b1).copied(),
                    slots,
                    pruned: Vec::new(),
                }
            })
            .collect();

        // --- run (parallel when allowed) ---
        let run_serially = config.force_serial || workspaces.len() <= 1;
        if run_serially {
            for ws in &mut workspaces {
                run_manifold_pipeline(ws, collider.0.as_ref(), &config);
            }
        } else {
            // SAFETY: `parallel_for` visits every index in `0..len` exactly
            // once, partitioned into disjoint chunks; each chunk only ever
            // dereferences the indices assigned to it, so no two threads
            // ever alias the same `ManifoldWorkspace`.
            struct SendSyncPtr(*mut ManifoldWorkspace);
            unsafe impl Send for SendSyncPtr {}
            unsafe impl Sync for SendSyncPtr {}

            let ptr = SendSyncPtr(workspaces.as_mut_ptr());
            let collider_ref = collider.0.as_ref();
            let config_ref: &PhysicsConfig = &config;
            parallel_for(
                0,
                workspaces.len(),
                1,
                |i| {
                    let ws = unsafe { &mut *ptr.0.add(i) };
                    run_manifold_pipeline(ws, collider_ref, config_ref);
                },
                || {},
            );
        }

        // --- commit (serial) ---
        let mut created = 0usize;
        let mut updated = 0usize;
        let mut destroyed = 0usize;

        for mut ws in workspaces {
            for slot in &mut ws.slots {
                commit_slot(slot, &entities, &mut contact_points, &mut constraint_rows, &mut dirty);
                match slot.change {
                    SlotChange::New => created += 1,
                    SlotChange::Merged | SlotChange::Replaced => updated += 1,
                    SlotChange::Untouched => {}
                }
            }

            for entity in &ws.pruned {
                entities.delete(*entity).expect("pruned contact point entity must be alive");
                dirty.single_write(DirtyEvent::destroyed(*entity, ComponentKind::ContactPoint));
                destroyed += 1;
            }

            let manifold = manifolds.get_mut(ws.manifold).expect("manifold vanished during narrowphase");
            let mut points = [None; MAX_CONTACTS];
            for (i, slot) in ws.slots.iter().enumerate() {
                points[i] = slot.entity;
            }
            manifold.points = points;
            manifold.num_points = ws.slots.len();
        }

        debug!(created, updated, destroyed, "narrowphase pipeline complete");
    }
}

fn commit_slot(
    slot: &mut Slot,
    entities: &Entities<'_>,
    contact_points: &mut WriteStorage<'_, ContactPoint>,
    constraint_rows: &mut WriteStorage<'_, ConstraintRow>,
    dirty: &mut DirtyChannel,
) {
    match slot.change {
        SlotChange::New => {
            let entity = entities.create();
            contact_points.insert(entity, slot.data).expect("freshly created entity must be insertable");
            if let Some(constraint) = slot.constraint {
                constraint_rows.insert(entity, constraint).expect("freshly created entity must be insertable");
            }
            slot.entity = Some(entity);
            dirty.single_write(DirtyEvent::created(entity, ComponentKind::ContactPoint));
        }
        SlotChange::Merged | SlotChange::Replaced => {
            let entity = slot.entity.expect("merged/replaced slot must have an existing entity");
            contact_points.insert(entity, slot.data).expect("entity must be alive");
            if let Some(constraint) = slot.constraint {
                constraint_rows.insert(entity, constraint).expect("entity must be alive");
            }
            dirty.single_write(DirtyEvent { entity, component: ComponentKind::ContactPoint, kind: ChangeKind::Updated });
        }
        SlotChange::Untouched => {
            let entity = slot.entity.expect("untouched slot must have an existing entity");
            contact_points.insert(entity, slot.data).expect("entity must be alive");
        }
    }
}
