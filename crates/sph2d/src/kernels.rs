//! 2D SPH smoothing kernels.
//!
//! Both kernels are only valid for `0 <= d <= h`. Callers exclude pairs beyond
//! the support radius before evaluating them; contributions past `h` are zero
//! by definition and never computed.

use std::f32::consts::PI;

/// Poly6 density kernel and Spiky gradient magnitude with coefficients
/// precomputed for a fixed smoothing radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothingKernels {
    radius: f32,
    radius_sq: f32,
    poly6_coeff: f32, // 4.0 / (PI * h^8)
    spiky_coeff: f32, // -30.0 / (PI * h^5)
}

impl SmoothingKernels {
    /// `radius` must be positive; [`crate::SimulationParams::validate`] enforces this
    /// before any stepper is built.
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            radius_sq: radius * radius,
            poly6_coeff: 4.0 / (PI * radius.powi(8)),
            spiky_coeff: -30.0 / (PI * radius.powi(5)),
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn radius_sq(&self) -> f32 {
        self.radius_sq
    }

    #[inline]
    pub fn poly6_coeff(&self) -> f32 {
        self.poly6_coeff
    }

    #[inline]
    pub fn spiky_coeff(&self) -> f32 {
        self.spiky_coeff
    }

    /// Poly6 2D: W(d) = (4 / (pi * h^8)) * (h^2 - d^2)^3
    #[inline]
    pub fn density(&self, dst: f32) -> f32 {
        let diff = self.radius_sq - dst * dst;
        self.poly6_coeff * diff * diff * diff
    }

    /// Spiky gradient magnitude 2D: -(30 / (pi * h^5)) * (h - d)^2
    ///
    /// Negative inside the support; the direction comes from the caller.
    #[inline]
    pub fn gradient_magnitude(&self, dst: f32) -> f32 {
        let diff = self.radius - dst;
        self.spiky_coeff * diff * diff
    }

    /// Kernel value at zero distance, the self contribution to density.
    #[inline]
    pub fn self_density(&self) -> f32 {
        self.poly6_coeff * self.radius_sq * self.radius_sq * self.radius_sq
    }
}
