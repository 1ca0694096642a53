//! Reference [`ShapeCollider`] covering sphere/box/plane/capsule pairs by
//! closed-form closest-point geometry.
//!
//! This exists so the crate can be exercised end to end; it is not meant to
//! replace a production narrowphase such as `parry`'s. Throughout, the
//! convention `normal_b` always points from body B toward body A, and
//! `distance = dot(normal_b_world, pivot_a_world - pivot_b_world)` —
//! negative when penetrating.

use cgmath::{InnerSpace, Rotation, Vector3, Zero};

use super::{ContactCandidate, ResultSet, ShapeCollider};
use crate::components::{Orientation, Position, Shape};
use crate::constants::MAX_CONTACTS;
use crate::real::Real;

/// Degenerate contacts (zero-length separating axis) are discarded.
const DEGENERATE_EPSILON: Real = 1.0e-8;

/// Closed-form narrowphase for a fixed set of primitive pairs.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticCollider;

impl ShapeCollider for AnalyticCollider {
    fn collide(
        &self,
        shape_a: &Shape,
        pose_a: (&Position, &Orientation),
        shape_b: &Shape,
        pose_b: (&Position, &Orientation),
        threshold: Real,
    ) -> ResultSet {
        match (shape_a, shape_b) {
            (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) => {
                sphere_sphere(pose_a.0.0, pose_b.0.0, *ra, *rb, threshold)
                    .map(|c| to_local(c, pose_a, pose_b))
                    .into_iter()
                    .collect()
            }
            (Shape::Sphere { radius }, Shape::Plane { normal, offset }) => {
                sphere_plane(pose_a.0.0, pose_b, *radius, *normal, *offset, threshold, true)
                    .map(|c| to_local(c, pose_a, pose_b))
                    .into_iter()
                    .collect()
            }
            (Shape::Plane { normal, offset }, Shape::Sphere { radius }) => {
                sphere_plane(pose_b.0.0, pose_a, *radius, *normal, *offset, threshold, false)
                    .map(|c| to_local(c, pose_a, pose_b))
                    .into_iter()
                    .collect()
            }
            (Shape::Box { half_extents }, Shape::Plane { normal, offset }) => {
                box_plane(pose_a, *half_extents, pose_b, *normal, *offset, threshold, true)
                    .into_iter()
                    .map(|c| to_local(c, pose_a, pose_b))
                    .collect()
            }
            (Shape::Plane { normal, offset }, Shape::Box { half_extents }) => {
                box_plane(pose_b, *half_extents, pose_a, *normal, *offset, threshold, false)
                    .into_iter()
                    .map(|c| to_local(c, pose_a, pose_b))
                    .collect()
            }
            (
                Shape::Capsule { half_height, radius: ra },
                Shape::Sphere { radius: rb },
            ) => capsule_sphere(pose_a, *half_height, *ra, pose_b.0.0, *rb, threshold, true)
                .map(|c| to_local(c, pose_a, pose_b))
                .into_iter()
                .collect(),
            (
                Shape::Sphere { radius: ra },
                Shape::Capsule { half_height, radius: rb },
            ) => capsule_sphere(pose_b, *half_height, *rb, pose_a.0.0, *ra, threshold, false)
                .map(|c| to_local(c, pose_a, pose_b))
                .into_iter()
                .collect(),
            (Shape::Box { half_extents }, Shape::Sphere { radius }) => {
                box_sphere(pose_a, *half_extents, pose_b.0.0, *radius, threshold, true)
                    .map(|c| to_local(c, pose_a, pose_b))
                    .into_iter()
                    .collect()
            }
            (Shape::Sphere { radius }, Shape::Box { half_extents }) => {
                box_sphere(pose_b, *half_extents, pose_a.0.0, *radius, threshold, false)
                    .map(|c| to_local(c, pose_a, pose_b))
                    .into_iter()
                    .collect()
            }
            _ => Vec::new(),
        }
    }
}

/// A candidate still in world space, tagged with which side is A.
struct WorldCandidate {
    pivot_a: cgmath::Point3<Real>,
    pivot_b: cgmath::Point3<Real>,
    /// Points from B to A.
    normal_b_to_a: Vector3<Real>,
    distance: Real,
}

fn to_local(
    c: WorldCandidate,
    pose_a: (&Position, &Orientation),
    pose_b: (&Position, &Orientation),
) -> ContactCandidate {
    let inv_a = pose_a.1.0.conjugate();
    let inv_b = pose_b.1.0.conjugate();
    ContactCandidate {
        pivot_a: inv_a.rotate_vector(c.pivot_a - pose_a.0.0),
        pivot_b: inv_b.rotate_vector(c.pivot_b - pose_b.0.0),
        normal_b: inv_b.rotate_vector(c.normal_b_to_a),
        distance: c.distance,
    }
}

fn sphere_sphere(
    center_a: cgmath::Point3<Real>,
    center_b: cgmath::Point3<Real>,
    radius_a: Real,
    radius_b: Real,
    threshold: Real,
) -> Option<WorldCandidate> {
    let delta = center_b - center_a;
    let dist = delta.magnitude();
    if dist < DEGENERATE_EPSILON {
        return None;
    }
    let dir = delta / dist; // points A -> B
    let distance = dist - (radius_a + radius_b);
    if distance > threshold {
        return None;
    }
    Some(WorldCandidate {
        pivot_a: center_a + dir * radius_a,
        pivot_b: center_b - dir * radius_b,
        normal_b_to_a: -dir,
        distance,
    })
}

/// `sphere_is_a` tells us how to populate `pivot_a`/`pivot_b` relative to
/// the sphere/plane roles; the `normal_b_to_a` convention is unaffected by
/// the swap since it is defined on A/B directly.
#[allow(clippy::too_many_arguments)]
fn sphere_plane(
    sphere_center: cgmath::Point3<Real>,
    plane_pose: (&Position, &Orientation),
    radius: Real,
    normal_local: Vector3<Real>,
    offset_local: Real,
    threshold: Real,
    sphere_is_a: bool,
) -> Option<WorldCandidate> {
    let (plane_pos, plane_orn) = plane_pose;
    let normal_world = plane_orn.0.rotate_vector(normal_local);
    if normal_world.magnitude2() < DEGENERATE_EPSILON {
        return None;
    }
    let normal_world = normal_world.normalize();
    let plane_point_world = plane_pos.0 + normal_world * offset_local;
    let d = cgmath::dot(normal_world, sphere_center - plane_point_world);
    let distance = d - radius;
    if distance > threshold {
        return None;
    }
    let pivot_sphere = sphere_center - normal_world * radius;
    let pivot_plane = sphere_center - normal_world * d;
    // normal_world points from the plane toward the sphere.
    if sphere_is_a {
        // A = sphere, B = plane: B -> A is plane -> sphere, i.e. normal_world.
        Some(WorldCandidate {
            pivot_a: pivot_sphere,
            pivot_b: pivot_plane,
            normal_b_to_a: normal_world,
            distance,
        })
    } else {
        // A = plane, B = sphere: B -> A is sphere -> plane, i.e. -normal_world.
        Some(WorldCandidate {
            pivot_a: pivot_plane,
            pivot_b: pivot_sphere,
            normal_b_to_a: -normal_world,
            distance,
        })
    }
}

fn box_corners(half_extents: Vector3<Real>) -> [Vector3<Real>; 8] {
    let s = [-1.0 as Real, 1.0];
    let mut corners = [Vector3::zero(); 8];
    let mut i = 0;
    for &sx in &s {
        for &sy in &s {
            for &sz in &s {
                corners[i] = Vector3::new(sx * half_extents.x, sy * half_extents.y, sz * half_extents.z);
                i += 1;
            }
        }
    }
    corners
}

#[allow(clippy::too_many_arguments)]
fn box_plane(
    box_pose: (&Position, &Orientation),
    half_extents: Vector3<Real>,
    plane_pose: (&Position, &Orientation),
    normal_local: Vector3<Real>,
    offset_local: Real,
    threshold: Real,
    box_is_a: bool,
) -> Vec<WorldCandidate> {
    let (box_pos, box_orn) = box_pose;
    let (plane_pos, plane_orn) = plane_pose;
    let normal_world = plane_orn.0.rotate_vector(normal_local);
    if normal_world.magnitude2() < DEGENERATE_EPSILON {
        return Vec::new();
    }
    let normal_world = normal_world.normalize();
    let plane_point_world = plane_pos.0 + normal_world * offset_local;

    let mut candidates: Vec<WorldCandidate> = box_corners(half_extents)
        .iter()
        .filter_map(|&local_corner| {
            let world_corner = box_pos.0 + box_orn.0.rotate_vector(local_corner);
            let d = cgmath::dot(normal_world, world_corner - plane_point_world);
            if d > threshold {
                return None;
            }
            let plane_projection = world_corner - normal_world * d;
            if box_is_a {
                Some(WorldCandidate {
                    pivot_a: world_corner,
                    pivot_b: plane_projection,
                    normal_b_to_a: normal_world,
                    distance: d,
                })
            } else {
                Some(WorldCandidate {
                    pivot_a: plane_projection,
                    pivot_b: world_corner,
                    normal_b_to_a: -normal_world,
                    distance: d,
                })
            }
        })
        .collect();

    candidates.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap());
    candidates.truncate(MAX_CONTACTS);
    candidates
}

fn closest_point_on_segment(
    point: cgmath::Point3<Real>,
    a: cgmath::Point3<Real>,
    b: cgmath::Point3<Real>,
) -> cgmath::Point3<Real> {
    let ab = b - a;
    let len2 = ab.magnitude2();
    if len2 < DEGENERATE_EPSILON {
        return a;
    }
    let t = (cgmath::dot(point - a, ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

#[allow(clippy::too_many_arguments)]
fn capsule_sphere(
    capsule_pose: (&Position, &Orientation),
    half_height: Real,
    capsule_radius: Real,
    sphere_center: cgmath::Point3<Real>,
    sphere_radius: Real,
    threshold: Real,
    capsule_is_a: bool,
) -> Option<WorldCandidate> {
    let (capsule_pos, capsule_orn) = capsule_pose;
    let axis = capsule_orn.0.rotate_vector(Vector3::unit_y());
    let seg_a = capsule_pos.0 + axis * half_height;
    let seg_b = capsule_pos.0 - axis * half_height;
    let closest = closest_point_on_segment(sphere_center, seg_a, seg_b);

    let candidate = sphere_sphere(closest, sphere_center, capsule_radius, sphere_radius, threshold)?;
    if capsule_is_a {
        Some(candidate)
    } else {
        Some(WorldCandidate {
            pivot_a: candidate.pivot_b,
            pivot_b: candidate.pivot_a,
            normal_b_to_a: -candidate.normal_b_to_a,
            distance: candidate.distance,
        })
    }
}

fn closest_point_on_box(
    point_local: Vector3<Real>,
    half_extents: Vector3<Real>,
) -> Vector3<Real> {
    Vector3::new(
        point_local.x.clamp(-half_extents.x, half_extents.x),
        point_local.y.clamp(-half_extents.y, half_extents.y),
        point_local.z.clamp(-half_extents.z, half_extents.z),
    )
}

fn box_sphere(
    box_pose: (&Position, &Orientation),
    half_extents: Vector3<Real>,
    sphere_center: cgmath::Point3<Real>,
    sphere_radius: Real,
    threshold: Real,
    box_is_a: bool,
) -> Option<WorldCandidate> {
    let (box_pos, box_orn) = box_pose;
    let inv = box_orn.0.conjugate();
    let local_sphere_center = inv.rotate_vector(sphere_center - box_pos.0);
    let closest_local = closest_point_on_box(local_sphere_center, half_extents);
    let closest_world = box_pos.0 + box_orn.0.rotate_vector(closest_local);

    let delta = sphere_center - closest_world;
    let dist = delta.magnitude();
    if dist < DEGENERATE_EPSILON {
        return None;
    }
    let dir = delta / dist; // points box -> sphere
    let distance = dist - sphere_radius;
    if distance > threshold {
        return None;
    }
    let pivot_sphere = sphere_center - dir * sphere_radius;
    let pivot_box = closest_world;
    if box_is_a {
        // A = box, B = sphere: B -> A is sphere -> box, i.e. -dir.
        Some(WorldCandidate {
            pivot_a: pivot_box,
            pivot_b: pivot_sphere,
            normal_b_to_a: -dir,
            distance,
        })
    } else {
        Some(WorldCandidate {
            pivot_a: pivot_sphere,
            pivot_b: pivot_box,
            normal_b_to_a: dir,
            distance,
        })
    }
}
