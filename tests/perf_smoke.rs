use toaster_physics::World;

#[test]
fn perf_smoke_step() {
    let mut world = World::new(8000, 2.0, 300.0).unwrap();
    world.enable_perf_metrics(true);
    let added = world
        .scatter_particles(8000, 3, 10.0, 10.0, 280.0, 200.0, 0.4)
        .unwrap();
    assert_eq!(added, 8000);

    for _ in 0..5 {
        world.update(1.0 / 60.0).unwrap();
    }
    let stats = world.get_step_stats();
    assert!(stats.step_ms() >= 0.0);
    assert_eq!(stats.particle_count(), 8000);
    assert_eq!(world.circle_count(), 8000);
}

#[test]
fn long_frames_are_capped() {
    let mut world = World::new(1, 2.0, 300.0).unwrap();
    world.add_particle(150.0, 50.0, 0.0, 1.0).unwrap();

    // A 5 second hitch integrates as one 0.2 s step
    world.step(5.0).unwrap();
    let v = world.core().store().velocities[0];
    assert!((v.y - 9.81 * 0.2).abs() < 1e-3, "v={v:?}");
}
