//! One-frame SPH step.
//!
//! Fixed order per call:
//! 1. clamp dt
//! 2. predict positions from velocity
//! 3. density (on predicted positions)
//! 4. pressure acceleration (needs every density, so runs after 3 completes)
//! 5. per particle: pointer + gravity + pressure -> integrate -> confine
//!
//! Cross-particle reads only ever see the pre-integration snapshot. The step
//! is deterministic: no randomness, and each per-particle sum runs in index
//! order whether or not the rayon path is used.

use glam::Vec2;
use rayon::prelude::*;

use crate::boundary::BoundaryHandler;
use crate::density::compute_densities;
use crate::error::SimError;
use crate::external::{PointerField, PointerInput};
use crate::integrate::Integration;
use crate::kernels::SmoothingKernels;
use crate::params::SimulationParams;
use crate::particle::{update_each, Particle};
use crate::pressure::PressureSolver;

/// What a step did besides moving particles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Timestep actually used after clamping.
    pub dt: f32,
    /// Particles reset to their pre-step state after going non-finite.
    pub recovered: usize,
}

/// Stepper holding immutable parameters and derived kernel constants.
#[derive(Clone, Debug)]
pub struct Simulation {
    params: SimulationParams,
    kernels: SmoothingKernels,
    pressure: PressureSolver,
    pointer_field: PointerField,
    integration: Integration,
    boundary: BoundaryHandler,
}

impl Simulation {
    /// Validate `params` and precompute kernel constants.
    pub fn new(params: SimulationParams) -> Result<Self, SimError> {
        params.validate()?;

        let kernels = SmoothingKernels::new(params.radius);
        log::debug!(
            "sph2d: h={} mass={} poly6={:.4e} spiky={:.4e} integrator={:?} pressure={:?} boundary={:?}",
            params.radius,
            params.mass,
            kernels.poly6_coeff(),
            kernels.spiky_coeff(),
            params.integrator,
            params.pressure_model,
            params.boundary_mode,
        );

        Ok(Self {
            kernels,
            pressure: PressureSolver {
                target_density: params.target_density,
                pressure_multiplier: params.pressure_multiplier,
                mass: params.mass,
                model: params.pressure_model,
            },
            pointer_field: PointerField {
                radius: params.pointer_radius,
                force_scale: params.pointer_force_scale,
            },
            integration: Integration {
                scheme: params.integrator,
                damping: params.damping,
                max_velocity: params.max_velocity,
            },
            boundary: BoundaryHandler {
                domain: params.domain,
                mode: params.boundary_mode,
                tolerance: params.boundary_tolerance,
                damping: params.boundary_damping,
                push: params.boundary_push,
            },
            params,
        })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn kernels(&self) -> &SmoothingKernels {
        &self.kernels
    }

    /// Advance `particles` in place by one frame.
    ///
    /// `dt` is clamped to `[min_dt, max_dt]` first; callers need not pre-clamp.
    pub fn step(&self, particles: &mut [Particle], dt: f32, pointer: PointerInput) -> StepReport {
        let dt = self.params.clamp_dt(dt);
        let parallel = self.params.parallel;
        if particles.is_empty() {
            return StepReport { dt, recovered: 0 };
        }

        // 1. Prediction
        update_each(particles, parallel, |_, p| {
            p.predicted_position = p.position + p.velocity * dt;
        });

        // 2. Density, then pressure (barrier between the two passes)
        compute_densities(particles, &self.kernels, self.params.mass, parallel);
        self.pressure
            .compute_accelerations(particles, &self.kernels, parallel);

        // 3. Forces, integration, confinement, non-finite recovery
        let gravity = self.params.gravity;
        let advance = |p: &mut Particle| self.advance_particle(p, gravity, &pointer, dt) as usize;
        let recovered: usize = if parallel {
            particles.par_iter_mut().map(advance).sum()
        } else {
            particles.iter_mut().map(advance).sum()
        };

        if recovered > 0 {
            log::warn!(
                "sph2d: {} particle(s) went non-finite at dt={}; restored to last good state \
                 (timestep or pressure stiffness too high)",
                recovered,
                dt
            );
        }

        StepReport { dt, recovered }
    }

    /// Forces + integration + boundary for one particle.
    ///
    /// Returns true if the particle was non-finite going in or coming out, in
    /// which case it is restored to its pre-step position and history with
    /// zero velocity. A pre-step position that was itself non-finite falls
    /// back to the domain centre.
    fn advance_particle(
        &self,
        p: &mut Particle,
        gravity: Vec2,
        pointer: &PointerInput,
        dt: f32,
    ) -> bool {
        let last_good = (p.position, p.previous_position);

        let mut acceleration = p.pressure_acceleration + gravity;
        acceleration += self.pointer_field.acceleration(p.position, pointer);

        // Velocity clamping would hide a NaN lane, so inputs are checked up front
        if acceleration.is_finite() && p.is_finite() && p.previous_position.is_finite() {
            self.integration.advance(p, acceleration, dt);
            self.boundary.confine(p, dt);
            if p.is_finite() && p.previous_position.is_finite() {
                return false;
            }
        }

        let (position, previous_position) = last_good;
        p.position = if position.is_finite() {
            position
        } else {
            self.boundary.domain.center()
        };
        p.previous_position = if previous_position.is_finite() {
            previous_position
        } else {
            p.position
        };
        p.velocity = Vec2::ZERO;
        p.pressure_acceleration = Vec2::ZERO;
        true
    }
}
