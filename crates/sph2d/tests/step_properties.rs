//! End-to-end properties of `Simulation::step`.
//!
//! Run with: cargo test -p sph2d --test step_properties

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sph2d::{
    random_scatter, uniform_grid, BoundaryMode, Domain, FrameStats, Integrator, Particle,
    PointerInput, PressureModel, Simulation, SimulationParams,
};

const DT: f32 = 0.01;

/// Scattered particles with random initial velocities, seeded.
fn scattered(n: usize, seed: u64) -> Vec<Particle> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut particles = random_scatter(n, Domain::default(), &mut rng);
    for p in &mut particles {
        p.velocity = Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
    }
    particles
}

/// Pointer that sweeps around the domain and alternates attract/repel.
fn pointer_at(frame: usize) -> PointerInput {
    let t = frame as f32 * 0.1;
    let magnitude = match frame % 60 {
        0..=19 => 0.02,
        20..=39 => -0.02,
        _ => 0.0,
    };
    PointerInput::new(Vec2::new(t.cos() * 0.5, t.sin() * 0.5), magnitude)
}

fn run(sim: &Simulation, particles: &mut [Particle], frames: usize, dt: f32) {
    for frame in 0..frames {
        sim.step(particles, dt, pointer_at(frame));
    }
}

#[test]
fn test_isolated_particle_has_self_density() {
    let params = SimulationParams::default();
    let sim = Simulation::new(params.clone()).unwrap();
    let mut particles = vec![Particle::at_rest(Vec2::ZERO)];
    sim.step(&mut particles, DT, PointerInput::inactive());

    let h = params.radius;
    let expected = params.mass * sim.kernels().poly6_coeff() * h.powi(6);
    assert!(
        (particles[0].density - expected).abs() / expected < 1e-5,
        "density {} != {}",
        particles[0].density,
        expected
    );
}

#[test]
fn test_pair_pressure_is_equal_and_opposite() {
    let params = SimulationParams::default()
        .with_gravity(Vec2::ZERO)
        .with_pressure(0.0, 1.0)
        .with_domain(Domain::centered(Vec2::splat(10.0)));
    let h = params.radius;
    let sim = Simulation::new(params).unwrap();

    let mut particles = vec![
        Particle::at_rest(Vec2::ZERO),
        Particle::at_rest(Vec2::new(h / 2.0, 0.0)),
    ];
    sim.step(&mut particles, DT, PointerInput::inactive());

    assert_eq!(particles[0].density, particles[1].density);
    let a0 = particles[0].pressure_acceleration;
    let a1 = particles[1].pressure_acceleration;
    assert!(a0.length() > 0.0);
    assert_eq!(a0, -a1);
}

#[test]
fn test_pair_within_half_radius_moves_apart() {
    for model in [PressureModel::DensityRatio, PressureModel::AveragedPressure] {
        for integrator in [Integrator::PositionVerlet, Integrator::SemiImplicitEuler] {
            let params = SimulationParams::default()
                .with_gravity(Vec2::ZERO)
                .with_pressure(0.0, 1.0)
                .with_pressure_model(model)
                .with_integrator(integrator)
                .with_domain(Domain::centered(Vec2::splat(10.0)));
            let h = params.radius;
            let sim = Simulation::new(params).unwrap();

            let mut particles = vec![
                Particle::at_rest(Vec2::ZERO),
                Particle::at_rest(Vec2::new(h / 2.0, 0.0)),
            ];
            sim.step(&mut particles, DT, PointerInput::inactive());

            let label = format!("{:?}/{:?}", model, integrator);
            assert!(particles[0].velocity.x < 0.0, "{}", label);
            assert!(particles[1].velocity.x > 0.0, "{}", label);
            assert!(particles[0].position.x < 0.0, "{}", label);
            assert!(particles[1].position.x > h / 2.0, "{}", label);
            assert_eq!(particles[0].position.y, 0.0, "{}", label);
        }
    }
}

#[test]
fn test_free_fall_matches_gravity() {
    for integrator in [Integrator::PositionVerlet, Integrator::SemiImplicitEuler] {
        let params = SimulationParams::default()
            .with_integrator(integrator)
            .with_max_velocity(100.0)
            .with_domain(Domain::centered(Vec2::splat(20.0)));
        let sim = Simulation::new(params).unwrap();

        let mut particles = vec![Particle::at_rest(Vec2::ZERO)];
        for _ in 0..100 {
            sim.step(&mut particles, DT, PointerInput::inactive());
        }

        let vy = particles[0].velocity.y;
        assert!((vy + 9.81).abs() < 0.1, "{:?}: vy = {}", integrator, vy);
        assert_eq!(particles[0].velocity.x, 0.0);
        assert!(particles[0].position.y < -4.0);
    }
}

#[test]
fn test_damping_slows_verlet_trajectory() {
    let fall = |damping: f32| {
        let params = SimulationParams::default()
            .with_damping(damping)
            .with_domain(Domain::centered(Vec2::splat(20.0)));
        let sim = Simulation::new(params).unwrap();
        let mut particles = vec![Particle::at_rest(Vec2::ZERO)];
        for _ in 0..50 {
            sim.step(&mut particles, DT, PointerInput::inactive());
        }
        particles[0]
    };

    let free = fall(1.0);
    let damped = fall(0.9);
    assert!(
        damped.position.y > free.position.y + 0.5,
        "damped {:?} vs free {:?}",
        damped.position,
        free.position
    );

    // Stored velocity agrees with the motion actually taken
    let moved = (damped.position.y - damped.previous_position.y) / DT;
    assert!(
        (damped.velocity.y - moved).abs() < 0.1 * moved.abs(),
        "velocity {} vs displacement rate {}",
        damped.velocity.y,
        moved
    );
}

#[test]
fn test_free_fall_hits_velocity_clamp() {
    let sim = Simulation::new(
        SimulationParams::default().with_domain(Domain::centered(Vec2::splat(20.0))),
    )
    .unwrap();
    let mut particles = vec![Particle::at_rest(Vec2::ZERO)];
    for _ in 0..100 {
        sim.step(&mut particles, DT, PointerInput::inactive());
        assert!(particles[0].velocity.y >= -5.0);
    }
    assert_eq!(particles[0].velocity.y, -5.0);
}

#[test]
fn test_particles_stay_confined() {
    let sim = Simulation::new(SimulationParams::water()).unwrap();
    let tolerance = sim.params().boundary_tolerance;
    let domain = sim.params().domain;

    let mut particles = scattered(300, 42);
    for frame in 0..200 {
        sim.step(&mut particles, 0.016, pointer_at(frame));
        for (i, p) in particles.iter().enumerate() {
            assert!(
                domain.contains(p.position, tolerance),
                "frame {}: particle {} escaped to {:?}",
                frame,
                i,
                p.position
            );
        }
    }
    assert!(FrameStats::from_particles(&particles, sim.params().mass).all_finite);
}

#[test]
fn test_every_variant_stays_confined_and_finite() {
    let integrators = [Integrator::PositionVerlet, Integrator::SemiImplicitEuler];
    let models = [PressureModel::DensityRatio, PressureModel::AveragedPressure];
    let modes = [BoundaryMode::SoftPush, BoundaryMode::HardReflect];

    for integrator in integrators {
        for model in models {
            for mode in modes {
                let params = SimulationParams::water()
                    .with_integrator(integrator)
                    .with_pressure_model(model)
                    .with_boundary_mode(mode);
                let tolerance = params.boundary_tolerance;
                let domain = params.domain;
                let sim = Simulation::new(params).unwrap();

                let mut particles = uniform_grid(225, Domain::centered(Vec2::splat(0.6)));
                run(&sim, &mut particles, 120, 0.02);

                let label = format!("{:?}/{:?}/{:?}", integrator, model, mode);
                for p in &particles {
                    assert!(p.is_finite(), "{}: {:?}", label, p);
                    assert!(domain.contains(p.position, tolerance), "{}: {:?}", label, p.position);
                }
            }
        }
    }
}

#[test]
fn test_dt_outside_range_matches_clamped_dt() {
    let sim = Simulation::new(SimulationParams::water()).unwrap();
    let initial = scattered(120, 3);

    for (raw, clamped) in [(0.0001, 0.001), (1.0, 0.033), (-5.0, 0.001), (f32::NAN, 0.001)] {
        let mut a = initial.clone();
        let mut b = initial.clone();
        for frame in 0..10 {
            let ra = sim.step(&mut a, raw, pointer_at(frame));
            let rb = sim.step(&mut b, clamped, pointer_at(frame));
            assert_eq!(ra, rb);
        }
        assert_eq!(a, b, "dt {} should behave like {}", raw, clamped);
    }
}

#[test]
fn test_identical_runs_are_identical() {
    let sim = Simulation::new(SimulationParams::water()).unwrap();
    let mut a = scattered(250, 11);
    let mut b = scattered(250, 11);
    assert_eq!(a, b);

    run(&sim, &mut a, 60, 0.016);
    run(&sim, &mut b, 60, 0.016);
    assert_eq!(a, b);
}

#[test]
fn test_serial_and_parallel_are_bit_identical() {
    let serial = Simulation::new(SimulationParams::water().with_parallel(false)).unwrap();
    let parallel = Simulation::new(SimulationParams::water().with_parallel(true)).unwrap();

    let mut a = scattered(250, 5);
    let mut b = a.clone();
    run(&serial, &mut a, 60, 0.016);
    run(&parallel, &mut b, 60, 0.016);
    assert_eq!(a, b);
}

#[test]
fn test_repelling_pointer_pushes_away() {
    let params = SimulationParams::default().with_gravity(Vec2::ZERO);
    let sim = Simulation::new(params).unwrap();
    let mut particles = vec![Particle::at_rest(Vec2::new(0.3, 0.0))];
    sim.step(&mut particles, DT, PointerInput::new(Vec2::ZERO, -0.02));
    assert!(particles[0].position.x > 0.3);
    assert!(particles[0].velocity.x > 0.0);
}

#[test]
fn test_step_preserves_particle_count() {
    let sim = Simulation::new(SimulationParams::water()).unwrap();
    let mut particles = uniform_grid(400, Domain::default());
    assert_eq!(particles.len(), 400);
    run(&sim, &mut particles, 30, 0.016);
    assert_eq!(particles.len(), 400);
}
