//! The serial and parallel narrowphase paths must agree on the resulting
//! set of contact points for many independent manifolds.

mod support;

use approx::assert_abs_diff_eq;
use cgmath::{InnerSpace, Point3};
use specs::{Builder, Join, RunNow, WorldExt};

use contact_manifold::{
    AabbRefreshSystem, BroadPhaseSystem, ContactPoint, Manifold, NarrowPhaseSystem, PhysicsConfig,
    Position,
};

use support::{identity, new_world, sphere};

const PAIR_COUNT: usize = 100;

fn build_pairs(world: &mut specs::World) {
    for i in 0..PAIR_COUNT {
        let x = i as f32 * 10.0;
        let (pos_a, orn_a) = identity(Point3::new(x, 0.0, 0.0));
        let (pos_b, orn_b) = identity(Point3::new(x, 0.0, 0.9));
        world.create_entity().with(pos_a).with(orn_a).with(sphere(0.5)).build();
        world.create_entity().with(pos_b).with(orn_b).with(sphere(0.5)).build();
    }
}

fn run_one_step(force_serial: bool) -> Vec<(f32, [f32; 3], [f32; 3])> {
    let mut world = new_world();
    world.insert(PhysicsConfig { force_serial, ..PhysicsConfig::default() });
    build_pairs(&mut world);

    AabbRefreshSystem.run_now(&world);
    BroadPhaseSystem.run_now(&world);
    NarrowPhaseSystem.run_now(&world);
    world.maintain();

    let manifolds = world.read_storage::<Manifold>();
    let contact_points = world.read_storage::<ContactPoint>();
    let positions = world.read_storage::<Position>();

    let mut results: Vec<(f32, [f32; 3], [f32; 3])> = (&manifolds)
        .join()
        .flat_map(|m| {
            m.live_points().iter().map(|p| {
                let cp = contact_points.get(p.expect("live slot")).expect("contact point must exist");
                let anchor_x = positions.get(cp.body_a).map(|pos| pos.0.x).unwrap_or(0.0);
                (anchor_x, [cp.distance, cp.normal_b.x, cp.normal_b.y], [cp.normal_b.z, cp.pivot_a.magnitude(), cp.pivot_b.magnitude()])
            })
        })
        .collect();

    results.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    results
}

#[test]
fn serial_and_parallel_narrowphase_agree() {
    let serial = run_one_step(true);
    let parallel = run_one_step(false);

    assert_eq!(serial.len(), PAIR_COUNT);
    assert_eq!(serial.len(), parallel.len());

    for (s, p) in serial.iter().zip(parallel.iter()) {
        assert_abs_diff_eq!(s.0, p.0, epsilon = 1.0e-4);
        assert_abs_diff_eq!(s.1[0], p.1[0], epsilon = 1.0e-4);
        assert_abs_diff_eq!(s.1[1], p.1[1], epsilon = 1.0e-4);
        assert_abs_diff_eq!(s.1[2], p.1[2], epsilon = 1.0e-4);
        assert_abs_diff_eq!(s.2[0], p.2[0], epsilon = 1.0e-4);
        assert_abs_diff_eq!(s.2[1], p.2[1], epsilon = 1.0e-4);
        assert_abs_diff_eq!(s.2[2], p.2[2], epsilon = 1.0e-4);
    }
}
