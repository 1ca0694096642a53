//! The per-manifold pipeline: distance refresh, collide, merge, prune.
//!
//! This module is deliberately storage-agnostic: [`ManifoldWorkspace`] is a
//! plain, owned snapshot of one manifold's world state and contents, and
//! [`run_manifold_pipeline`] mutates only that snapshot. [`crate::narrowphase::orchestrator`]
//! is what gathers a workspace from `specs` storages and commits the result
//! back — keeping the geometry-heavy logic free of ECS plumbing also makes
//! it trivially `Send`-safe to run inside `parallel_for`: each workspace is
//! a disjoint, independently-owned `Vec` element.

pub mod orchestrator;

use cgmath::{InnerSpace, Rotation, Vector3};
use collision::Aabb3;
use specs::Entity;

use crate::collide::ShapeCollider;
use crate::components::manifold::{ConstraintRow, ContactPoint};
use crate::components::material::{CombinedMaterial, Material};
use crate::components::shape::{inflate, intersects};
use crate::components::{Orientation, Position, Shape};
use crate::config::PhysicsConfig;
use crate::constants::MAX_CONTACTS;
use crate::error::ManifoldError;
use crate::real::Real;

/// What happened to a slot this step, used to decide which dirty event (if
/// any) and which warm-start treatment applies at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChange {
    /// Present before the step and untouched by merge/replace this step
    /// (still subject to the distance refresh and to pruning).
    Untouched,
    /// Matched an incoming candidate; anchors updated, impulse preserved.
    Merged,
    /// No match found; an existing slot's contents were overwritten by the
    /// insertion-index heuristic. Impulse is reset to zero.
    Replaced,
    /// A brand-new slot appended because the manifold had spare capacity.
    New,
}

/// One manifold slot, with enough state to decide what to commit.
#[derive(Debug, Clone)]
pub struct Slot {
    /// `None` for a slot created this step (`SlotChange::New`) that has no
    /// entity yet; `Some` otherwise.
    pub entity: Option<Entity>,
    pub data: ContactPoint,
    /// `None` when one (or both) bodies carry no [`Material`] — the contact
    /// point still exists, but no constraint row is built for it.
    pub constraint: Option<ConstraintRow>,
    pub change: SlotChange,
}

/// An owned, single-manifold snapshot the pipeline operates on.
#[derive(Debug, Clone)]
pub struct ManifoldWorkspace {
    pub manifold: Entity,
    pub bodies: (Entity, Entity),
    pub pose_a: (Position, Orientation),
    pub pose_b: (Position, Orientation),
    pub shape_a: Shape,
    pub shape_b: Shape,
    /// `None` means the body's AABB is missing this step; broadphase
    /// already treats that as separation for *pair* lifetime, but the
    /// narrowphase broad-check degrades to "no collision" rather
    /// than panicking, since destroying the manifold is broadphase's job.
    pub aabb_a: Option<Aabb3<Real>>,
    pub aabb_b: Option<Aabb3<Real>>,
    pub material_a: Option<Material>,
    pub material_b: Option<Material>,
    pub slots: Vec<Slot>,
    /// Entities of previously-existing contact points removed by pruning
    /// this step.
    pub pruned: Vec<Entity>,
}

fn world_point(pos: &Position, orn: &Orientation, local: Vector3<Real>) -> cgmath::Point3<Real> {
    pos.0 + orn.0.rotate_vector(local)
}

/// Recomputes every persisted point's `distance` from current poses,
/// before merge or prune look at it.
fn refresh_distances(ws: &mut ManifoldWorkspace) {
    for slot in &mut ws.slots {
        let pa = world_point(&ws.pose_a.0, &ws.pose_a.1, slot.data.pivot_a);
        let pb = world_point(&ws.pose_b.0, &ws.pose_b.1, slot.data.pivot_b);
        let n = ws.pose_b.1 .0.rotate_vector(slot.data.normal_b);
        slot.data.distance = cgmath::dot(n, pa - pb);
    }
}

/// Whether the manifold's own (tight) broad check still permits a
/// collide() call this step. Only `aabb_a` is shrunk by the break margin,
/// matching the broadphase create-pass test applied at manifold-local
/// granularity; this does not destroy the manifold on failure — that's
/// broadphase's job, using the looser separation margin on both sides.
fn broad_check(ws: &ManifoldWorkspace, break_offset: Real) -> bool {
    match (&ws.aabb_a, &ws.aabb_b) {
        (Some(a), Some(b)) => intersects(&inflate(a, -break_offset), b),
        _ => false,
    }
}

fn nearest_match(slots: &[Slot], candidate_pivot_a: Vector3<Real>, candidate_pivot_b: Vector3<Real>, threshold2: Real) -> Option<usize> {
    let mut best: Option<(usize, Real)> = None;
    for (i, slot) in slots.iter().enumerate() {
        let da = (candidate_pivot_a - slot.data.pivot_a).magnitude2();
        let db = (candidate_pivot_b - slot.data.pivot_b).magnitude2();
        let d = da.min(db);
        if d < threshold2 && best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

fn triangle_area(a: Vector3<Real>, b: Vector3<Real>, c: Vector3<Real>) -> Real {
    (b - a).cross(c - a).magnitude() * 0.5
}

/// Sum of the two triangles of the quadrilateral `a-b-c-d`, in order. Used
/// both for the baseline (current four points) and for each candidate
/// substitution.
fn quad_area(p: [Vector3<Real>; MAX_CONTACTS]) -> Real {
    triangle_area(p[0], p[1], p[2]) + triangle_area(p[0], p[2], p[3])
}

/// Chooses which of the four full slots to replace with
/// `new_pivot_b`, maximising the spanned area, protecting the deepest
/// point, and returning `None` if no substitution improves on the area of
/// the four points as they stand.
fn choose_replacement(slots: &[Slot], new_pivot_b: Vector3<Real>, new_distance: Real) -> Option<usize> {
    let current: [Vector3<Real>; MAX_CONTACTS] = [
        slots[0].data.pivot_b,
        slots[1].data.pivot_b,
        slots[2].data.pivot_b,
        slots[3].data.pivot_b,
    ];
    let baseline = quad_area(current);

    let deepest_idx = (0..MAX_CONTACTS)
        .min_by(|&a, &b| slots[a].data.distance.partial_cmp(&slots[b].data.distance).unwrap())
        .unwrap();
    let protect_deepest = slots[deepest_idx].data.distance < new_distance;

    let mut best: Option<(usize, Real)> = None;
    for k in 0..MAX_CONTACTS {
        if protect_deepest && k == deepest_idx {
            continue;
        }
        let mut candidate_points = current;
        candidate_points[k] = new_pivot_b;
        let area = quad_area(candidate_points);
        if best.map_or(true, |(_, best_area)| area > best_area) {
            best = Some((k, area));
        }
    }

    best.and_then(|(k, area)| if area > baseline { Some(k) } else { None })
}

/// Runs the full pipeline for one manifold: distance refresh,
/// broad check, collide, merge, and prune. `ws.slots`/`ws.pruned` are
/// mutated in place; nothing here touches a `specs::World`.
pub fn run_manifold_pipeline(ws: &mut ManifoldWorkspace, collider: &dyn ShapeCollider, config: &PhysicsConfig) {
    let break_offset = config.break_offset();
    let caching_threshold2 = config.caching_threshold * config.caching_threshold;

    refresh_distances(ws);

    // Slots untouched this step start out Untouched; merge/replace upgrade
    // the ones a candidate actually lands on.
    for slot in &mut ws.slots {
        slot.change = SlotChange::Untouched;
    }

    if broad_check(ws, break_offset) {
        let candidates = collider.collide(
            &ws.shape_a,
            (&ws.pose_a.0, &ws.pose_a.1),
            &ws.shape_b,
            (&ws.pose_b.0, &ws.pose_b.1),
            break_offset,
        );

        for candidate in candidates {
            if candidate.normal_b.magnitude2() < 1.0e-12 {
                // Geometric degeneracy: discard silently.
                continue;
            }

            if let Some(idx) = nearest_match(&ws.slots, candidate.pivot_a, candidate.pivot_b, caching_threshold2) {
                let slot = &mut ws.slots[idx];
                slot.data.pivot_a = candidate.pivot_a;
                slot.data.pivot_b = candidate.pivot_b;
                slot.data.normal_b = candidate.normal_b;
                slot.data.distance = candidate.distance;
                slot.data.lifetime += 1;
                slot.change = SlotChange::Merged;
                continue;
            }

            if ws.slots.len() < MAX_CONTACTS {
                let combined = combine(ws.material_a.as_ref(), ws.material_b.as_ref(), config.large_scalar);
                ws.slots.push(Slot {
                    entity: None,
                    data: ContactPoint {
                        manifold: ws.manifold,
                        body_a: ws.bodies.0,
                        body_b: ws.bodies.1,
                        pivot_a: candidate.pivot_a,
                        pivot_b: candidate.pivot_b,
                        normal_b: candidate.normal_b,
                        distance: candidate.distance,
                        lifetime: 0,
                        friction: combined.as_ref().map_or(0.0, |c| c.friction),
                        restitution: combined.as_ref().map_or(0.0, |c| c.restitution),
                    },
                    constraint: combined.map(|c| ConstraintRow {
                        normal_impulse: 0.0,
                        stiffness: c.stiffness,
                        damping: c.damping,
                    }),
                    change: SlotChange::New,
                });
            } else if let Some(idx) = choose_replacement(&ws.slots, candidate.pivot_b, candidate.distance) {
                let slot = &mut ws.slots[idx];
                slot.data.pivot_a = candidate.pivot_a;
                slot.data.pivot_b = candidate.pivot_b;
                slot.data.normal_b = candidate.normal_b;
                slot.data.distance = candidate.distance;
                slot.data.lifetime = 0;
                if let Some(constraint) = slot.constraint.as_mut() {
                    constraint.reset_impulse();
                }
                slot.change = SlotChange::Replaced;
            }
            // else: no substitution improved on the current area, discard the candidate.
        }
    }

    prune(ws, config.contact_breaking_threshold);
}

/// Validates a workspace's capacity invariant and runs the pipeline
/// directly, without a `specs::Dispatcher`. Intended for the handful of
/// direct-call entry points (tests, or an embedding application advancing a
/// single manifold outside the ordinary per-step systems) where a
/// precondition violation should be reported rather than panicking.
pub fn run_manifold_pipeline_checked(
    ws: &mut ManifoldWorkspace,
    collider: &dyn ShapeCollider,
    config: &PhysicsConfig,
) -> Result<(), ManifoldError> {
    if ws.slots.len() > MAX_CONTACTS {
        return Err(ManifoldError::CapacityInvariantViolated(ws.manifold, ws.slots.len()));
    }
    run_manifold_pipeline(ws, collider, config);
    Ok(())
}

fn combine(a: Option<&Material>, b: Option<&Material>, large_scalar: Real) -> Option<CombinedMaterial> {
    match (a, b) {
        (Some(a), Some(b)) => Some(Material::combine(a, b, large_scalar)),
        _ => None,
    }
}

/// Removes points that have separated beyond the breaking threshold,
/// normally or tangentially. Iterates in reverse and uses
/// `Vec::swap_remove` for O(1) compaction.
fn prune(ws: &mut ManifoldWorkspace, breaking_threshold: Real) {
    let threshold2 = breaking_threshold * breaking_threshold;
    let mut i = ws.slots.len();
    while i > 0 {
        i -= 1;
        let slot = &ws.slots[i];
        let pa = world_point(&ws.pose_a.0, &ws.pose_a.1, slot.data.pivot_a);
        let pb = world_point(&ws.pose_b.0, &ws.pose_b.1, slot.data.pivot_b);
        let n = ws.pose_b.1 .0.rotate_vector(slot.data.normal_b);
        let dn = slot.data.distance;
        let dp = (pa - pb) - n * dn;
        if dn > breaking_threshold || dp.magnitude2() > threshold2 {
            let removed = ws.slots.swap_remove(i);
            if let Some(entity) = removed.entity {
                ws.pruned.push(entity);
            }
        }
    }
}
