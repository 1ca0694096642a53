//! Shared `specs::World` setup for integration tests.

use cgmath::{Point3, Quaternion, Vector3};
use specs::{RunNow, World, WorldExt};

use contact_manifold::{
    Aabb, AabbRefreshSystem, BroadPhaseSystem, ColliderResource, ConstraintRow, ContactPoint,
    DirtyChannel, Manifold, Material, NarrowPhaseSystem, Orientation, PairEventChannel, PairTable,
    PhysicsConfig, Position, Shape, Sleeping,
};

pub fn new_world() -> World {
    let mut world = World::new();
    world.register::<Position>();
    world.register::<Orientation>();
    world.register::<Shape>();
    world.register::<Aabb>();
    world.register::<Material>();
    world.register::<Sleeping>();
    world.register::<Manifold>();
    world.register::<ContactPoint>();
    world.register::<ConstraintRow>();

    world.insert(PhysicsConfig::default());
    world.insert(DirtyChannel::default());
    world.insert(PairTable::default());
    world.insert(PairEventChannel::default());
    world.insert(ColliderResource::default());

    world
}

pub fn identity(pos: Point3<f32>) -> (Position, Orientation) {
    (Position(pos), Orientation(Quaternion::new(1.0, 0.0, 0.0, 0.0)))
}

pub fn sphere(radius: f32) -> Shape {
    Shape::Sphere { radius }
}

pub fn box_shape(half_extents: Vector3<f32>) -> Shape {
    Shape::Box { half_extents }
}

pub fn plane(normal: Vector3<f32>, offset: f32) -> Shape {
    Shape::Plane { normal, offset }
}

/// Runs one full step: AABB refresh, broadphase, narrowphase, then
/// `world.maintain()` to apply entity creation/destruction.
pub fn step(world: &mut World) {
    AabbRefreshSystem.run_now(world);
    BroadPhaseSystem.run_now(world);
    NarrowPhaseSystem.run_now(world);
    world.maintain();
}
