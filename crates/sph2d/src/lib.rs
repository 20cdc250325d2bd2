//! 2D SPH fluid step
//!
//! Brute-force smoothed particle hydrodynamics on the plane:
//! - Poly6 density and Spiky pressure-gradient kernels
//! - Non-negative linear equation of state
//! - Pointer attract/repel field and uniform gravity
//! - Position Verlet (default) or semi-implicit Euler integration
//! - Rectangular confinement with soft push or hard reflection
//!
//! The caller owns the particle set and calls [`Simulation::step`] once per
//! frame. Rendering and windowing live outside this crate; [`speed_color`]
//! and [`FrameStats`] are the read-only hooks they need.

pub mod boundary;
pub mod density;
pub mod diagnostics;
pub mod error;
pub mod external;
pub mod integrate;
pub mod kernels;
pub mod params;
pub mod particle;
pub mod pressure;
pub mod serde_utils;
pub mod simulation;

pub use boundary::{BoundaryMode, Domain};
pub use diagnostics::FrameStats;
pub use error::SimError;
pub use external::PointerInput;
pub use integrate::Integrator;
pub use kernels::SmoothingKernels;
pub use params::SimulationParams;
pub use particle::{random_scatter, speed_color, uniform_grid, Particle, ParticleSet, COLOR_MAX_SPEED};
pub use pressure::PressureModel;
pub use simulation::{Simulation, StepReport};
