//! Per-frame summary statistics for logging and tests.

use crate::particle::Particle;

/// Snapshot of a particle set after a step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub count: usize,
    pub min_density: f32,
    pub mean_density: f32,
    pub max_density: f32,
    pub max_speed: f32,
    /// `sum(0.5 * m * |v|^2)` with uniform particle mass.
    pub kinetic_energy: f32,
    /// False if any position or velocity is NaN or infinite.
    pub all_finite: bool,
}

impl FrameStats {
    pub fn from_particles(particles: &[Particle], mass: f32) -> Self {
        if particles.is_empty() {
            return Self {
                all_finite: true,
                ..Self::default()
            };
        }

        let mut min_density = f32::INFINITY;
        let mut max_density = f32::NEG_INFINITY;
        let mut density_sum = 0.0f64;
        let mut max_speed = 0.0f32;
        let mut speed_sq_sum = 0.0f64;
        let mut all_finite = true;

        for p in particles {
            min_density = min_density.min(p.density);
            max_density = max_density.max(p.density);
            density_sum += p.density as f64;

            let speed_sq = p.velocity.length_squared();
            max_speed = max_speed.max(speed_sq.sqrt());
            speed_sq_sum += speed_sq as f64;

            all_finite &= p.is_finite();
        }

        Self {
            count: particles.len(),
            min_density,
            mean_density: (density_sum / particles.len() as f64) as f32,
            max_density,
            max_speed,
            kinetic_energy: (0.5 * mass as f64 * speed_sq_sum) as f32,
            all_finite,
        }
    }
}

impl std::fmt::Display for FrameStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "n={} rho[min={:.2} mean={:.2} max={:.2}] vmax={:.3} ke={:.4}{}",
            self.count,
            self.min_density,
            self.mean_density,
            self.max_density,
            self.max_speed,
            self.kinetic_energy,
            if self.all_finite { "" } else { " NON-FINITE" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_empty_set() {
        let stats = FrameStats::from_particles(&[], 1.0);
        assert_eq!(stats.count, 0);
        assert!(stats.all_finite);
        assert_eq!(stats.kinetic_energy, 0.0);
    }

    #[test]
    fn test_density_and_speed_summary() {
        let mut a = Particle::new(Vec2::ZERO, Vec2::new(3.0, 4.0));
        a.density = 10.0;
        let mut b = Particle::new(Vec2::ONE, Vec2::new(1.0, 0.0));
        b.density = 30.0;

        let stats = FrameStats::from_particles(&[a, b], 2.0);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min_density, 10.0);
        assert_eq!(stats.max_density, 30.0);
        assert_eq!(stats.mean_density, 20.0);
        assert_eq!(stats.max_speed, 5.0);
        // 0.5 * 2 * (25 + 1)
        assert!((stats.kinetic_energy - 26.0).abs() < 1e-5);
        assert!(stats.all_finite);
    }

    #[test]
    fn test_flags_non_finite() {
        let p = Particle::new(Vec2::new(f32::NAN, 0.0), Vec2::ZERO);
        let stats = FrameStats::from_particles(&[p], 1.0);
        assert!(!stats.all_finite);
        assert!(stats.to_string().contains("NON-FINITE"));
    }
}
