//! Simulation parameters.
//!
//! Parameters are fixed for the lifetime of a [`crate::Simulation`]. Defaults
//! reproduce the tuning of the interactive demo: a 0.08 smoothing radius in a
//! [-1, 1] x [-1, 1] domain with Earth gravity.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::boundary::{BoundaryMode, Domain};
use crate::error::SimError;
use crate::integrate::Integrator;
use crate::kernels::SmoothingKernels;
use crate::pressure::PressureModel;
use crate::serde_utils::{deserialize_vec2, serialize_vec2};

/// Parameters controlling one simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Smoothing (interaction) radius h.
    pub radius: f32,
    /// Uniform particle mass.
    pub mass: f32,
    /// Velocity multiplier applied after each integration (1.0 = none).
    pub damping: f32,
    /// Density at which the equation of state yields zero pressure.
    pub target_density: f32,
    /// Pressure stiffness k in `p = max((rho - rho0) * k, 0)`.
    pub pressure_multiplier: f32,
    #[serde(serialize_with = "serialize_vec2", deserialize_with = "deserialize_vec2")]
    pub gravity: Vec2,

    /// Rectangular confinement domain.
    pub domain: Domain,
    /// Distance from a wall inside which the boundary reacts.
    pub boundary_tolerance: f32,
    /// Fraction of an overshoot kept after reflection (also hard-mode restitution).
    pub boundary_damping: f32,
    /// Inward velocity nudge for particles hugging a wall (soft mode).
    pub boundary_push: f32,

    /// Pointer influence radius.
    pub pointer_radius: f32,
    /// Pointer acceleration scale, multiplied by the signed input magnitude.
    pub pointer_force_scale: f32,

    /// Timestep clamp range; callers need not pre-clamp.
    pub min_dt: f32,
    pub max_dt: f32,
    /// Component-wise velocity limit.
    pub max_velocity: f32,

    pub integrator: Integrator,
    pub pressure_model: PressureModel,
    pub boundary_mode: BoundaryMode,

    /// Run per-particle passes on the rayon pool. Results are identical either way.
    pub parallel: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            radius: 0.08,
            mass: 1.0,
            damping: 1.0,
            target_density: 0.0,
            pressure_multiplier: 0.0,
            gravity: Vec2::new(0.0, -9.81),
            domain: Domain::default(),
            boundary_tolerance: 0.001,
            boundary_damping: 0.5,
            boundary_push: 0.02,
            pointer_radius: 1.0,
            pointer_force_scale: 50.0,
            min_dt: 0.001,
            max_dt: 0.033,
            max_velocity: 5.0,
            integrator: Integrator::default(),
            pressure_model: PressureModel::default(),
            boundary_mode: BoundaryMode::default(),
            parallel: true,
        }
    }
}

impl SimulationParams {
    /// A compressible water preset for a few hundred particles in the default
    /// domain. Rest density sits around ten neighbours per smoothing disc.
    pub fn water() -> Self {
        Self {
            target_density: 600.0,
            pressure_multiplier: 1.0,
            ..Self::default()
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_pressure(mut self, target_density: f32, pressure_multiplier: f32) -> Self {
        self.target_density = target_density;
        self.pressure_multiplier = pressure_multiplier;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_max_velocity(mut self, max_velocity: f32) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_pressure_model(mut self, pressure_model: PressureModel) -> Self {
        self.pressure_model = pressure_model;
        self
    }

    pub fn with_boundary_mode(mut self, boundary_mode: BoundaryMode) -> Self {
        self.boundary_mode = boundary_mode;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Clamp a caller-supplied timestep to the stable range.
    #[inline]
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_nan() {
            return self.min_dt;
        }
        dt.clamp(self.min_dt, self.max_dt)
    }

    /// Reject parameters that would divide by zero or poison the step with NaN.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.radius > 0.0) || !self.radius.is_finite() {
            return Err(SimError::NonPositiveRadius(self.radius));
        }
        // f32 kernel constants overflow or vanish for extreme radii (h^8 in poly6)
        let kernels = SmoothingKernels::new(self.radius);
        let self_density = kernels.self_density();
        if !kernels.poly6_coeff().is_finite()
            || !kernels.spiky_coeff().is_finite()
            || !(self_density > 0.0)
            || !self_density.is_finite()
        {
            return Err(SimError::InvalidParameter {
                name: "radius",
                value: self.radius,
            });
        }
        if !(self.mass > 0.0) || !self.mass.is_finite() {
            return Err(SimError::NonPositiveMass(self.mass));
        }
        if !self.domain.is_valid() {
            return Err(SimError::InvalidBounds {
                min: self.domain.min.to_array(),
                max: self.domain.max.to_array(),
            });
        }
        if !(self.min_dt > 0.0) || !(self.min_dt <= self.max_dt) || !self.max_dt.is_finite() {
            return Err(SimError::InvalidTimestepRange {
                min: self.min_dt,
                max: self.max_dt,
            });
        }

        check_finite("damping", self.damping)?;
        check_finite("target_density", self.target_density)?;
        check_finite("pressure_multiplier", self.pressure_multiplier)?;
        check_finite("gravity.x", self.gravity.x)?;
        check_finite("gravity.y", self.gravity.y)?;
        check_finite("pointer_force_scale", self.pointer_force_scale)?;
        check_non_negative("boundary_tolerance", self.boundary_tolerance)?;
        check_non_negative("boundary_damping", self.boundary_damping)?;
        check_non_negative("boundary_push", self.boundary_push)?;
        check_non_negative("pointer_radius", self.pointer_radius)?;
        if !(self.max_velocity > 0.0) || !self.max_velocity.is_finite() {
            return Err(SimError::InvalidParameter {
                name: "max_velocity",
                value: self.max_velocity,
            });
        }
        Ok(())
    }

    /// Save parameters to a JSON file
    pub fn save_json(&self, path: &Path) -> Result<(), SimError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load parameters from a JSON file. Missing fields take their defaults.
    pub fn load_json(path: &Path) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        let params = serde_json::from_str(&json)?;
        Ok(params)
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<(), SimError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

fn check_non_negative(name: &'static str, value: f32) -> Result<(), SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}
