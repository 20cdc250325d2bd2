//! Quick benchmark for profiling the brute-force SPH step
//!
//! Run with: cargo run --release --example bench -p sph2d
//! Profile with: cargo flamegraph --example bench -p sph2d

use std::time::Instant;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sph2d::{random_scatter, Domain, PointerInput, Simulation, SimulationParams};

const FRAMES: usize = 300; // 5 seconds at 60 FPS
const DT: f32 = 1.0 / 60.0;

fn bench(particle_count: usize, parallel: bool) -> f64 {
    let sim = match Simulation::new(SimulationParams::water().with_parallel(parallel)) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Invalid parameters: {}", e);
            return f64::NAN;
        }
    };
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut particles = random_scatter(particle_count, Domain::default(), &mut rng);

    // Warm up
    for _ in 0..30 {
        sim.step(&mut particles, DT, PointerInput::inactive());
    }

    let start = Instant::now();
    for frame in 0..FRAMES {
        // Sweep an attracting pointer across the box like an interactive user
        let x = (frame as f32 / FRAMES as f32) * 2.0 - 1.0;
        sim.step(&mut particles, DT, PointerInput::new(Vec2::new(x, 0.0), 0.02));
    }
    let elapsed = start.elapsed();
    elapsed.as_secs_f64() / FRAMES as f64
}

fn main() {
    env_logger::init();

    println!("=== Brute-force SPH step ===");
    for &count in &[100, 250, 500, 1000] {
        for &parallel in &[false, true] {
            let avg = bench(count, parallel);
            let fps = 1.0 / avg;
            println!(
                "  n={:5} {:8}: {:7.3}ms/frame ({:.0} FPS)",
                count,
                if parallel { "rayon" } else { "serial" },
                avg * 1000.0,
                fps
            );
        }
    }
}
