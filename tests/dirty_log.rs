//! A step that creates one manifold, merges one contact,
//! and destroys another produces the corresponding `DirtyEvent`s, readable
//! once from a fresh `ReaderId`.

mod support;

use cgmath::Point3;
use specs::{Builder, WorldExt};

use contact_manifold::{ChangeKind, ComponentKind, DirtyChannel, DirtyEvent, Position};

use support::{identity, new_world, sphere, step};

#[test]
fn one_step_reports_create_merge_and_destroy() {
    let mut world = new_world();

    // Pair A-B: present from the start, nudged slightly next step (merge).
    let (pos_a, orn_a) = identity(Point3::new(0.0, 0.0, 0.0));
    let (pos_b, orn_b) = identity(Point3::new(0.0, 0.0, 0.9));
    world.create_entity().with(pos_a).with(orn_a).with(sphere(0.5)).build();
    let b = world.create_entity().with(pos_b).with(orn_b).with(sphere(0.5)).build();

    // Pair E-F: present from the start, moved far apart next step (destroy).
    let (pos_e, orn_e) = identity(Point3::new(100.0, 0.0, 0.0));
    let (pos_f, orn_f) = identity(Point3::new(100.0, 0.0, 0.9));
    world.create_entity().with(pos_e).with(orn_e).with(sphere(0.5)).build();
    let f = world.create_entity().with(pos_f).with(orn_f).with(sphere(0.5)).build();

    step(&mut world);

    let mut reader = world.write_resource::<DirtyChannel>().register_reader();

    // A-B: nudge within the caching threshold -> merge.
    {
        let mut positions = world.write_storage::<Position>();
        positions.get_mut(b).unwrap().0 = Point3::new(0.0, 0.0, 0.905);
    }

    // C-D: brand new overlapping pair -> create.
    let (pos_c, orn_c) = identity(Point3::new(200.0, 0.0, 0.0));
    let (pos_d, orn_d) = identity(Point3::new(200.0, 0.0, 0.9));
    world.create_entity().with(pos_c).with(orn_c).with(sphere(0.5)).build();
    world.create_entity().with(pos_d).with(orn_d).with(sphere(0.5)).build();

    // E-F: separate far beyond SEPARATION_OFFSET -> destroy.
    {
        let mut positions = world.write_storage::<Position>();
        positions.get_mut(f).unwrap().0 = Point3::new(100.0, 0.0, 50.0);
    }

    step(&mut world);

    let events: Vec<DirtyEvent> = {
        let channel = world.read_resource::<DirtyChannel>();
        channel.read(&mut reader).copied().collect()
    };

    let created = events.iter().filter(|e| e.kind == ChangeKind::Created).count();
    let updated = events.iter().filter(|e| e.kind == ChangeKind::Updated).count();
    let destroyed = events.iter().filter(|e| e.kind == ChangeKind::Destroyed).count();

    assert_eq!(created, 2, "expected a Manifold + ContactPoint creation for C-D");
    assert_eq!(updated, 1, "expected one ContactPoint update for A-B's merge");
    assert_eq!(destroyed, 2, "expected a Manifold + ContactPoint destruction for E-F");

    assert!(events
        .iter()
        .any(|e| e.component == ComponentKind::ContactPoint && e.kind == ChangeKind::Updated));
}
