//! Dam Break Diagnostic
//!
//! Release a block of fluid in the left half of the box and log frame stats.
//! Run with: RUST_LOG=info cargo run --release --example dam_break -p sph2d [params.json]
//!
//! Without an argument the water preset is used. Pass a JSON file written by
//! `SimulationParams::save_json` to try other tunings.

use std::path::PathBuf;

use glam::Vec2;
use sph2d::{uniform_grid, Domain, FrameStats, PointerInput, SimError, Simulation, SimulationParams};

const NUM_PARTICLES: usize = 400;
const FRAMES: usize = 600; // 10 seconds at 60 FPS
const DT: f32 = 1.0 / 60.0;
const LOG_EVERY: usize = 60;

fn main() -> Result<(), SimError> {
    env_logger::init();

    let params = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            log::info!("Loading parameters from {}", path.display());
            SimulationParams::load_json(&path)?
        }
        None => SimulationParams::water(),
    };
    let sim = Simulation::new(params)?;
    let mass = sim.params().mass;

    // Fluid column against the left wall, bottom to just above the middle
    let domain = sim.params().domain;
    let size = domain.size();
    let block = Domain::new(
        domain.min + Vec2::splat(0.02),
        domain.min + Vec2::new(size.x * 0.4, size.y * 0.6),
    );
    let mut particles = uniform_grid(NUM_PARTICLES, block);
    log::info!("Spawned {} particles in {:?}", particles.len(), block);

    let mut total_recovered = 0;
    for frame in 0..FRAMES {
        let report = sim.step(&mut particles, DT, PointerInput::inactive());
        total_recovered += report.recovered;

        if frame % LOG_EVERY == 0 {
            let stats = FrameStats::from_particles(&particles, mass);
            log::info!("Frame {:4}: {}", frame, stats);
        }
    }

    let stats = FrameStats::from_particles(&particles, mass);
    log::info!("Final: {}", stats);
    if total_recovered > 0 {
        log::warn!("{} particle recoveries over the run", total_recovered);
    }
    Ok(())
}
