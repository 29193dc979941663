use approx::assert_relative_eq;

use flight_core::types::constants::GRAVITY;
use flight_core::{
    simulate, BodyProperties, ParticleState, Scenario, Termination, Trajectory, Vec3,
};

fn launch(pos: Vec3, vel: Vec3, spin: Vec3, body: &BodyProperties) -> ParticleState {
    ParticleState::new(pos, vel, spin, body).unwrap()
}

/// Time for a vacuum projectile launched upward at `vz` from `z0` to reach the ground.
fn ballistic_flight_time(z0: f64, vz: f64) -> f64 {
    (vz + (vz * vz + 2.0 * GRAVITY * z0).sqrt()) / GRAVITY
}

#[test]
fn test_no_drag_matches_closed_form() {
    let scenario = Scenario::validation_no_drag();
    let trajectory = scenario.run().unwrap();
    let last = trajectory.last().unwrap();

    let t_flight = ballistic_flight_time(10.0, 15.0);

    assert_eq!(trajectory.termination(), Some(Termination::Grounded));
    assert_eq!(last.pos.z, 0.0);
    assert_relative_eq!(last.time, t_flight, max_relative = 1e-3);
    assert_relative_eq!(last.pos.x, 15.0 * t_flight, max_relative = 1e-3);
    assert_relative_eq!(last.pos.y, 5.0 * t_flight, max_relative = 1e-3);
}

#[test]
fn test_ground_launch_range_formula() {
    let speed: f64 = 20.0;
    for angle_deg in [30.0f64, 45.0, 60.0] {
        for h in [0.01, 0.001] {
            let theta = angle_deg.to_radians();
            let vx = speed * theta.cos();
            let initial = launch(
                Vec3::ZERO,
                Vec3::new(vx, 0.0, speed * theta.sin()),
                Vec3::ZERO,
                &BodyProperties::ideal(),
            );

            let trajectory = simulate(&initial, Vec3::ZERO, h, 10.0).unwrap();
            let expected = speed * speed * (2.0 * theta).sin() / GRAVITY;
            let error = (trajectory.range() - expected).abs();

            // Landing is detected at the end of the crossing step, so the
            // range overshoots by at most one step of horizontal travel.
            assert!(
                error <= vx * h + 1e-9,
                "angle {} h {}: range {} vs {}",
                angle_deg,
                h,
                trajectory.range(),
                expected
            );
        }
    }
}

#[test]
fn test_first_sample_is_initial_state() {
    for scenario in Scenario::BUILTIN.iter().filter_map(|n| Scenario::builtin(n)) {
        let trajectory = scenario.run().unwrap();
        let first = trajectory.first().unwrap();

        assert_eq!(first.time, 0.0, "{}", scenario.name);
        assert_eq!(first.pos, scenario.position, "{}", scenario.name);
        assert!(
            trajectory.samples().windows(2).all(|w| w[0].time <= w[1].time),
            "{}: times must be non-decreasing",
            scenario.name
        );
    }
}

#[test]
fn test_resting_on_ground_ends_immediately() {
    let initial = launch(
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(5.0, 5.0, 0.0),
        Vec3::new(0.0, 0.0, 100.0),
        &BodyProperties::ping_pong(),
    );

    let trajectory = simulate(&initial, Vec3::new(3.0, 0.0, 0.0), 0.001, 10.0).unwrap();

    assert_eq!(trajectory.len(), 1);
    assert_eq!(trajectory.termination(), Some(Termination::Grounded));
}

#[test]
fn test_horizontal_motion_uniform_without_air() {
    let h = 0.001;
    let trajectory = Scenario::validation_no_drag().run().unwrap();
    let samples = trajectory.samples();

    // Every step before the landing clamp covers the same horizontal distance.
    for w in samples[..samples.len() - 1].windows(2) {
        let dx = w[1].pos.x - w[0].pos.x;
        let dy = w[1].pos.y - w[0].pos.y;
        assert!((dx - 15.0 * h).abs() < 1e-9, "dx={}", dx);
        assert!((dy - 5.0 * h).abs() < 1e-9, "dy={}", dy);
    }
}

#[test]
fn test_drag_shortens_range() {
    let vacuum = Scenario::validation_no_drag().run().unwrap();
    let air = Scenario::validation_drag().run().unwrap();

    assert!(
        air.range() < vacuum.range(),
        "drag range {} should be below vacuum range {}",
        air.range(),
        vacuum.range()
    );
    assert!(air.max_height() < vacuum.max_height());
}

#[test]
fn test_magnus_bends_the_path() {
    let plain = Scenario::validation_drag().run().unwrap();
    let spun = Scenario::validation_magnus().run().unwrap();

    let a = plain.last().unwrap().pos;
    let b = spun.last().unwrap().pos;
    assert!(
        (a - b).magnitude() > 0.01,
        "spin should move the landing point: {:?} vs {:?}",
        a,
        b
    );
}

#[test]
fn test_backspin_extends_flight() {
    let body = BodyProperties::ping_pong();
    let pos = Vec3::new(0.0, 0.0, 1.0);
    let vel = Vec3::new(10.0, 0.0, 3.0);

    let plain = simulate(&launch(pos, vel, Vec3::ZERO, &body), Vec3::ZERO, 0.001, 10.0).unwrap();
    let backspin = simulate(
        &launch(pos, vel, Vec3::new(0.0, -20.0, 0.0), &body),
        Vec3::ZERO,
        0.001,
        10.0,
    )
    .unwrap();

    assert!(backspin.flight_time() > plain.flight_time());
    assert!(backspin.range() > plain.range());
}

#[test]
fn test_tailwind_carries_further() {
    let body = BodyProperties::ping_pong();
    let initial = launch(
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(8.0, 0.0, 6.0),
        Vec3::ZERO,
        &body,
    );

    let calm = simulate(&initial, Vec3::ZERO, 0.001, 10.0).unwrap();
    let tail = simulate(&initial, Vec3::new(5.0, 0.0, 0.0), 0.001, 10.0).unwrap();
    let head = simulate(&initial, Vec3::new(-5.0, 0.0, 0.0), 0.001, 10.0).unwrap();

    let x = |t: &Trajectory| t.last().unwrap().pos.x;
    assert!(x(&tail) > x(&calm));
    assert!(x(&head) < x(&calm));
}

#[test]
fn test_wind_has_no_effect_in_vacuum() {
    let initial = launch(
        Vec3::new(0.0, 0.0, 2.0),
        Vec3::new(5.0, 0.0, 5.0),
        Vec3::ZERO,
        &BodyProperties::ideal(),
    );

    let calm = simulate(&initial, Vec3::ZERO, 0.001, 10.0).unwrap();
    let windy = simulate(&initial, Vec3::new(0.0, 20.0, 0.0), 0.001, 10.0).unwrap();

    assert_eq!(calm, windy);
}

#[test]
fn test_independent_runs_in_parallel() {
    let expected: Vec<Trajectory> = Scenario::BUILTIN
        .iter()
        .map(|n| Scenario::builtin(n).unwrap().run().unwrap())
        .collect();

    let results: Vec<Trajectory> = std::thread::scope(|scope| {
        let handles: Vec<_> = Scenario::BUILTIN
            .iter()
            .map(|&n| scope.spawn(move || Scenario::builtin(n).unwrap().run().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results, expected);
}
