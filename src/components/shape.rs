//! Tagged-variant collision shape and the world-space AABB it produces.
//!
//! Dispatch on shape pairs (both here, for the bounding volume, and in
//! [`crate::collide`] for exact contacts) is a `match` over the variants,
//! not a virtual call.

use cgmath::{EuclideanSpace, InnerSpace, Point3, Rotation};
use collision::Aabb3;
use specs::{Component, VecStorage};

use crate::components::pose::{Orientation, Position};
use crate::real::Real;

/// A collidable primitive in body-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: Real },
    Box { half_extents: cgmath::Vector3<Real> },
    /// Static half-space with unit `normal` and signed `offset` along it
    /// (`dot(normal, p) == offset` defines the plane). Planes are treated as
    /// unbounded for broadphase purposes: their world AABB is set to a very
    /// large box so they always pass the overlap test against finite shapes.
    Plane { normal: cgmath::Vector3<Real>, offset: Real },
    Capsule { half_height: Real, radius: Real },
}

const PLANE_EXTENT: Real = 1.0e9;

impl Shape {
    /// Computes the world-space AABB of this shape at the given pose.
    pub fn aabb(&self, position: &Position, orientation: &Orientation) -> Aabb3<Real> {
        let center = position.0;
        match *self {
            Shape::Sphere { radius } => Aabb3::new(
                center - cgmath::Vector3::new(radius, radius, radius),
                center + cgmath::Vector3::new(radius, radius, radius),
            ),
            Shape::Box { half_extents } => {
                // Rotate all eight corners; this is the straightforward
                // (if not the fastest) way to bound an oriented box and
                // avoids pulling in a rotation-matrix abs-value helper.
                let signs = [-1.0 as Real, 1.0];
                let mut min = Point3::new(Real::MAX, Real::MAX, Real::MAX);
                let mut max = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
                for &sx in &signs {
                    for &sy in &signs {
                        for &sz in &signs {
                            let local = cgmath::Vector3::new(
                                sx * half_extents.x,
                                sy * half_extents.y,
                                sz * half_extents.z,
                            );
                            let world = center + orientation.0.rotate_vector(local);
                            min.x = min.x.min(world.x);
                            min.y = min.y.min(world.y);
                            min.z = min.z.min(world.z);
                            max.x = max.x.max(world.x);
                            max.y = max.y.max(world.y);
                            max.z = max.z.max(world.z);
                        }
                    }
                }
                Aabb3::new(min, max)
            }
            Shape::Plane { .. } => Aabb3::new(
                center - cgmath::Vector3::new(PLANE_EXTENT, PLANE_EXTENT, PLANE_EXTENT),
                center + cgmath::Vector3::new(PLANE_EXTENT, PLANE_EXTENT, PLANE_EXTENT),
            ),
            Shape::Capsule { half_height, radius } => {
                let axis = orientation.0.rotate_vector(cgmath::Vector3::unit_y());
                let a = center + axis * half_height;
                let b = center - axis * half_height;
                let min = Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
                    - cgmath::Vector3::new(radius, radius, radius);
                let max = Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
                    + cgmath::Vector3::new(radius, radius, radius);
                Aabb3::new(min, max)
            }
        }
    }

    /// Approximate furthest extent from the body origin, used by the
    /// reference [`crate::collide::AnalyticCollider`] to bound its search.
    pub fn bounding_radius(&self) -> Real {
        match *self {
            Shape::Sphere { radius } => radius,
            Shape::Box { half_extents } => half_extents.magnitude(),
            Shape::Plane { .. } => PLANE_EXTENT,
            Shape::Capsule { half_height, radius } => half_height + radius,
        }
    }
}

impl Component for Shape {
    type Storage = VecStorage<Self>;
}

/// World-space AABB component, recomputed each step by the AABB refresher
/// for awake bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb(pub Aabb3<Real>);

impl Component for Aabb {
    type Storage = VecStorage<Self>;
}

/// Grows (positive `amount`) or shrinks (negative `amount`) an AABB
/// uniformly on every axis. Used by the broadphase to apply the hysteresis
/// margins.
pub fn inflate(aabb: &Aabb3<Real>, amount: Real) -> Aabb3<Real> {
    let d = cgmath::Vector3::new(amount, amount, amount);
    Aabb3::new(aabb.min - d, aabb.max + d)
}

/// Tests two (already-inflated) AABBs for overlap.
pub fn intersects(a: &Aabb3<Real>, b: &Aabb3<Real>) -> bool {
    a.min.x <= b.max.x
        && a.max.x >= b.min.x
        && a.min.y <= b.max.y
        && a.max.y >= b.min.y
        && a.min.z <= b.max.z
        && a.max.z >= b.min.z
}
