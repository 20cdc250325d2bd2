//! Fluid particles and initial placement.
//!
//! A particle set is an ordered `Vec<Particle>` owned by the caller. Order
//! carries no physical meaning; the index is only used for self-exclusion.
//! The particle count never changes while a simulation runs.

use glam::Vec2;
use rand::Rng;
use rayon::prelude::*;

use crate::boundary::Domain;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Position one step ago. Verlet history; kept consistent for Euler too.
    pub previous_position: Vec2,
    /// Position extrapolated by velocity over the upcoming step. Density and
    /// pressure are evaluated here.
    pub predicted_position: Vec2,
    pub velocity: Vec2,
    /// Recomputed every step.
    pub density: f32,
    /// Force per unit mass from the pressure gradient, recomputed every step.
    pub pressure_acceleration: Vec2,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            previous_position: position,
            predicted_position: position,
            velocity,
            density: 0.0,
            pressure_acceleration: Vec2::ZERO,
        }
    }

    /// Create a particle at rest.
    pub fn at_rest(position: Vec2) -> Self {
        Self::new(position, Vec2::ZERO)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Caller-owned particle storage mutated in place by each step.
pub type ParticleSet = Vec<Particle>;

/// Run `f` on every particle with its index, on the rayon pool or serially.
///
/// `f` may only write the particle it is handed; cross-particle reads must go
/// through a snapshot taken before the pass.
pub(crate) fn update_each<F>(particles: &mut [Particle], parallel: bool, f: F)
where
    F: Fn(usize, &mut Particle) + Sync + Send,
{
    if parallel {
        particles
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, p)| f(i, p));
    } else {
        particles.iter_mut().enumerate().for_each(|(i, p)| f(i, p));
    }
}

/// Place `floor(sqrt(n))^2` particles on a square lattice starting at the
/// domain's min corner, spaced `span / per_row` on each axis.
pub fn uniform_grid(num_particles: usize, bounds: Domain) -> ParticleSet {
    let per_row = (num_particles as f32).sqrt() as usize;
    if per_row == 0 {
        return Vec::new();
    }
    let spacing = bounds.size() / per_row as f32;

    let mut particles = Vec::with_capacity(per_row * per_row);
    for i in 0..per_row {
        for j in 0..per_row {
            let position = bounds.min + Vec2::new(i as f32 * spacing.x, j as f32 * spacing.y);
            particles.push(Particle::at_rest(position));
        }
    }
    particles
}

/// Scatter `num_particles` uniformly inside `bounds`, at rest.
///
/// Randomness comes only from `rng`; pass a seeded generator for repeatable sets.
pub fn random_scatter<R: Rng + ?Sized>(
    num_particles: usize,
    bounds: Domain,
    rng: &mut R,
) -> ParticleSet {
    let size = bounds.size();
    (0..num_particles)
        .map(|_| {
            let position = bounds.min + Vec2::new(rng.gen::<f32>() * size.x, rng.gen::<f32>() * size.y);
            Particle::at_rest(position)
        })
        .collect()
}

/// Default speed at which [`speed_color`] saturates to red.
pub const COLOR_MAX_SPEED: f32 = 2.0;

/// RGB colour mixing blue (slow) to red (fast) by `min(|v| / max_speed, 1)`.
pub fn speed_color(velocity: Vec2, max_speed: f32) -> [f32; 3] {
    let t = if max_speed > 0.0 {
        (velocity.length() / max_speed).min(1.0)
    } else {
        1.0
    };
    [t, 0.0, 1.0 - t]
}
