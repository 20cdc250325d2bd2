//! Pressure-gradient acceleration.
//!
//! Equation of state: `p(rho) = max((rho - rho0) * k, 0)`. Under-dense regions
//! exert no pressure; only compression pushes particles apart.
//!
//! Each particle accumulates its own force by visiting every other particle
//! within the smoothing radius (symmetric double loop, no mirrored writes).
//! The summed force is divided by the particle's own density.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::kernels::SmoothingKernels;
use crate::particle::{update_each, Particle};

/// Floor applied to any density used as a divisor.
pub const DENSITY_EPSILON: f32 = 1e-6;

/// Pair distance below which the direction between two particles is undefined.
const COINCIDENT_DISTANCE: f32 = 1e-9;

/// Symmetrisation of the pairwise pressure term.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureModel {
    /// `m * (p_i / rho_i^2 + p_j / rho_j^2) * gradW`
    #[default]
    DensityRatio,
    /// `m * ((p_i + p_j) / 2) / rho_j * gradW`
    AveragedPressure,
}

impl PressureModel {
    /// Scalar pair term multiplying `mass * gradW`.
    #[inline]
    fn pair_term(&self, p_i: f32, rho_i: f32, p_j: f32, rho_j: f32) -> f32 {
        match self {
            PressureModel::DensityRatio => p_i / (rho_i * rho_i) + p_j / (rho_j * rho_j),
            PressureModel::AveragedPressure => 0.5 * (p_i + p_j) / rho_j,
        }
    }
}

/// Pressure solver settings, fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct PressureSolver {
    pub target_density: f32,
    pub pressure_multiplier: f32,
    pub mass: f32,
    pub model: PressureModel,
}

impl PressureSolver {
    /// Equation of state, clamped to non-negative.
    #[inline]
    pub fn pressure(&self, density: f32) -> f32 {
        ((density - self.target_density) * self.pressure_multiplier).max(0.0)
    }

    /// Pressure acceleration of particle `i` given a snapshot of predicted
    /// positions and densities from this step.
    pub fn acceleration_of(
        &self,
        i: usize,
        predicted: &[Vec2],
        densities: &[f32],
        kernels: &SmoothingKernels,
    ) -> Vec2 {
        let h = kernels.radius();
        let pos_i = predicted[i];
        let rho_i = guard_density(densities[i]);
        let p_i = self.pressure(densities[i]);

        let mut pressure_force = Vec2::ZERO;
        for (j, (&pos_j, &density_j)) in predicted.iter().zip(densities).enumerate() {
            if i == j {
                continue;
            }
            let dist_vector = pos_i - pos_j;
            let dst = dist_vector.length();
            if dst.is_nan() || dst > h {
                continue;
            }

            let direction = if dst > COINCIDENT_DISTANCE {
                dist_vector / dst
            } else if i < j {
                Vec2::X
            } else {
                Vec2::NEG_X
            };

            let rho_j = guard_density(density_j);
            let p_j = self.pressure(density_j);
            let term = self.model.pair_term(p_i, rho_i, p_j, rho_j);
            let influence = kernels.gradient_magnitude(dst);
            // gradW is negative inside the support, so this points away from j
            pressure_force += -direction * (self.mass * term * influence);
        }

        pressure_force / rho_i
    }

    /// Overwrite every particle's `pressure_acceleration`.
    ///
    /// Densities must already be complete for all particles.
    pub fn compute_accelerations(
        &self,
        particles: &mut [Particle],
        kernels: &SmoothingKernels,
        parallel: bool,
    ) {
        let predicted: Vec<Vec2> = particles.iter().map(|p| p.predicted_position).collect();
        let densities: Vec<f32> = particles.iter().map(|p| p.density).collect();

        let degenerate = degenerate_density_count(&densities);
        if degenerate > 0 {
            log::debug!(
                "{} particle(s) with zero or invalid density; divisor clamped to {}",
                degenerate,
                DENSITY_EPSILON
            );
        }

        update_each(particles, parallel, |i, p| {
            p.pressure_acceleration = self.acceleration_of(i, &predicted, &densities, kernels);
        });
    }
}

/// Densities at or below the divisor floor, NaN included.
fn degenerate_density_count(densities: &[f32]) -> usize {
    densities.iter().filter(|&&d| d <= DENSITY_EPSILON || d.is_nan()).count()
}

/// Clamp a density divisor to a small positive floor. NaN maps to the floor too.
#[inline]
fn guard_density(density: f32) -> f32 {
    if density > DENSITY_EPSILON {
        density
    } else {
        DENSITY_EPSILON
    }
}
