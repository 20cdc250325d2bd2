//! Time integration of particle motion.
//!
//! One transition per step from `(position, history)` to the next state given
//! the total acceleration and an already-clamped `dt`. Both variants damp the
//! velocity and clamp it component-wise to `max_velocity`. Verlet applies the
//! same damping and limit to the per-step displacement, since its motion comes
//! from positions rather than the stored velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Integrator {
    /// `x' = 2x - x_prev + a dt^2`, `v' = (x' - x_prev) / 2dt`.
    #[default]
    PositionVerlet,
    /// `v' = (v + a dt) * damping`, `x' = x + v' dt`.
    SemiImplicitEuler,
}

/// Integration settings shared by every particle.
#[derive(Clone, Copy, Debug)]
pub struct Integration {
    pub scheme: Integrator,
    pub damping: f32,
    pub max_velocity: f32,
}

impl Integration {
    /// Advance one particle by `dt` under `acceleration`.
    pub fn advance(&self, particle: &mut Particle, acceleration: Vec2, dt: f32) {
        match self.scheme {
            Integrator::PositionVerlet => self.verlet(particle, acceleration, dt),
            Integrator::SemiImplicitEuler => self.semi_implicit_euler(particle, acceleration, dt),
        }
    }

    #[inline]
    fn clamp_velocity(&self, velocity: Vec2) -> Vec2 {
        let max_vel = Vec2::splat(self.max_velocity);
        velocity.clamp(-max_vel, max_vel)
    }

    fn verlet(&self, particle: &mut Particle, acceleration: Vec2, dt: f32) {
        let position = particle.position;
        let mut new_position =
            2.0 * position - particle.previous_position + acceleration * dt * dt;

        let velocity = (new_position - particle.previous_position) / (2.0 * dt);
        particle.velocity = self.clamp_velocity(velocity * self.damping);

        // Velocity here is derived from positions, so damping and the clamp
        // only act on motion if they are applied to the displacement too.
        let max_step = Vec2::splat(self.max_velocity * dt);
        let displacement = (new_position - position) * self.damping;
        new_position = position + displacement.clamp(-max_step, max_step);

        particle.previous_position = position;
        particle.position = new_position;
    }

    fn semi_implicit_euler(&self, particle: &mut Particle, acceleration: Vec2, dt: f32) {
        let velocity = (particle.velocity + acceleration * dt) * self.damping;
        particle.velocity = self.clamp_velocity(velocity);

        particle.previous_position = particle.position;
        particle.position += particle.velocity * dt;
    }
}
