//! End-to-end scenarios against a full `specs::World`: pair formation,
//! persistence, hysteresis, merge, and the area-maximising insertion
//! policy.

mod support;

use approx::assert_abs_diff_eq;
use cgmath::{Point3, Vector3};
use specs::{Builder, Join, WorldExt};

use contact_manifold::{ContactPoint, Manifold, PairTable, Position};

use support::{box_shape, identity, new_world, plane, sphere, step};

fn manifold_points<'w>(world: &'w specs::World, manifold: specs::Entity) -> Vec<ContactPoint> {
    let manifolds = world.read_storage::<Manifold>();
    let contact_points = world.read_storage::<ContactPoint>();
    let m = manifolds.get(manifold).expect("manifold must exist");
    m.live_points()
        .iter()
        .map(|p| *contact_points.get(p.expect("live slot")).expect("contact point must exist"))
        .collect()
}

fn only_manifold(world: &specs::World) -> specs::Entity {
    let entities = world.entities();
    let manifolds = world.read_storage::<Manifold>();
    (&entities, &manifolds).join().map(|(e, _)| e).next().expect("expected one manifold")
}

#[test]
fn two_spheres_overlapping_form_one_contact() {
    let mut world = new_world();
    let (pos_a, orn_a) = identity(Point3::new(0.0, 0.0, 0.0));
    let (pos_b, orn_b) = identity(Point3::new(0.0, 0.0, 0.9));

    world.create_entity().with(pos_a).with(orn_a).with(sphere(0.5)).build();
    world.create_entity().with(pos_b).with(orn_b).with(sphere(0.5)).build();

    step(&mut world);

    let pair_table = world.read_resource::<PairTable>();
    assert_eq!(pair_table.len_pairs(), 1);
    drop(pair_table);

    let manifold = only_manifold(&world);
    let points = manifold_points(&world, manifold);
    assert_eq!(points.len(), 1);
    let c = points[0];
    assert_abs_diff_eq!(c.distance, -0.1, epsilon = 1.0e-4);
    assert_abs_diff_eq!(c.normal_b, Vector3::new(0.0, 0.0, -1.0), epsilon = 1.0e-4);
}

#[test]
fn pair_persists_within_hysteresis_band_and_breaks_outside_it() {
    let mut world = new_world();
    world.create_entity().with(Position(Point3::new(0.0, 0.0, 0.0))).with(identity(Point3::new(0.0, 0.0, 0.0)).1).with(sphere(0.5)).build();
    let b = world.create_entity().with(Position(Point3::new(0.0, 0.0, 0.9))).with(identity(Point3::new(0.0, 0.0, 0.9)).1).with(sphere(0.5)).build();

    step(&mut world);
    assert_eq!(world.read_resource::<PairTable>().len_pairs(), 1);

    // Move B so the gap is 0.015: inside BREAK_OFFSET (0.02), point persists.
    {
        let mut positions = world.write_storage::<Position>();
        positions.get_mut(b).unwrap().0 = Point3::new(0.0, 0.0, 1.015);
    }
    step(&mut world);
    assert_eq!(world.read_resource::<PairTable>().len_pairs(), 1);
    let manifold = only_manifold(&world);
    assert_eq!(manifold_points(&world, manifold).len(), 1);

    // Gap 0.04: beyond CONTACT_BREAKING_THRESHOLD, the point is pruned, but
    // the pair survives (AABBs still overlap within SEPARATION_OFFSET).
    {
        let mut positions = world.write_storage::<Position>();
        positions.get_mut(b).unwrap().0 = Point3::new(0.0, 0.0, 1.04);
    }
    step(&mut world);
    assert_eq!(world.read_resource::<PairTable>().len_pairs(), 1);
    let manifold = only_manifold(&world);
    assert_eq!(manifold_points(&world, manifold).len(), 0);

    // Gap far beyond SEPARATION_OFFSET: pair (and manifold) is destroyed.
    {
        let mut positions = world.write_storage::<Position>();
        positions.get_mut(b).unwrap().0 = Point3::new(0.0, 0.0, 5.0);
    }
    step(&mut world);
    assert!(world.read_resource::<PairTable>().is_empty());
}

#[test]
fn box_on_plane_has_four_contacts_and_rotation_merges() {
    use cgmath::{Deg, Quaternion, Rotation3};

    let mut world = new_world();
    let box_entity = world
        .create_entity()
        .with(Position(Point3::new(0.0, 0.5, 0.0)))
        .with(identity(Point3::new(0.0, 0.5, 0.0)).1)
        .with(box_shape(Vector3::new(0.5, 0.5, 0.5)))
        .build();
    world.create_entity().with(Position(Point3::new(0.0, 0.0, 0.0))).with(identity(Point3::new(0.0, 0.0, 0.0)).1).with(plane(Vector3::new(0.0, 1.0, 0.0), 0.0)).build();

    step(&mut world);

    let manifold = only_manifold(&world);
    let points_before = manifold_points(&world, manifold);
    assert_eq!(points_before.len(), 4);
    for c in &points_before {
        assert_abs_diff_eq!(c.distance, 0.0, epsilon = 1.0e-3);
        assert_eq!(c.lifetime, 0);
    }

    // Small rotation: same four contacts should merge (lifetime increments)
    // rather than being replaced.
    {
        let mut orientations = world.write_storage::<contact_manifold::Orientation>();
        orientations.get_mut(box_entity).unwrap().0 = Quaternion::from_angle_y(Deg(5.0));
    }
    step(&mut world);

    let points_after = manifold_points(&world, manifold);
    assert_eq!(points_after.len(), 4);
    assert!(points_after.iter().all(|c| c.lifetime == 1));
}
