//! Per-particle density from a brute-force all-pairs kernel sum.
//!
//! Every particle sums `mass * W(d)` over all particles (itself included)
//! whose predicted position lies within the smoothing radius. O(n^2) per step;
//! there is no neighbour acceleration structure.

use glam::Vec2;

use crate::kernels::SmoothingKernels;
use crate::particle::{update_each, Particle};

/// Density at `point` from a snapshot of predicted positions.
///
/// A particle at `point` that is also in `predicted` contributes its own
/// `mass * W(0)` through the zero-distance term.
pub fn density_at(point: Vec2, predicted: &[Vec2], kernels: &SmoothingKernels, mass: f32) -> f32 {
    let h = kernels.radius();
    let mut density = 0.0;
    for &other in predicted {
        let dst = point.distance(other);
        // NaN positions never count as neighbours
        if dst.is_nan() || dst > h {
            continue;
        }
        density += kernels.density(dst) * mass;
    }
    density
}

/// Overwrite every particle's `density` from the current predicted positions.
pub fn compute_densities(
    particles: &mut [Particle],
    kernels: &SmoothingKernels,
    mass: f32,
    parallel: bool,
) {
    let predicted: Vec<Vec2> = particles.iter().map(|p| p.predicted_position).collect();

    update_each(particles, parallel, |_, p| {
        p.density = density_at(p.predicted_position, &predicted, kernels, mass);
    });
}
