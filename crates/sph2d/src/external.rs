//! Pointer-driven external force.
//!
//! A pointer at some position with a signed magnitude (positive attracts,
//! negative repels, zero is inactive) accelerates particles within an
//! influence radius toward or away from it.

use glam::Vec2;

/// Pointer distance inside which no force is applied (direction undefined).
const DEAD_ZONE: f32 = 0.01;
/// Softening added to the distance in the inverse falloff.
const SOFTENING: f32 = 0.1;

/// Pointer state sampled once per frame by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerInput {
    pub position: Vec2,
    /// Positive attracts, negative repels, zero disables the field.
    pub magnitude: f32,
}

impl PointerInput {
    pub fn new(position: Vec2, magnitude: f32) -> Self {
        Self {
            position,
            magnitude,
        }
    }

    /// No pointer force this frame.
    pub fn inactive() -> Self {
        Self::default()
    }

    /// Compose the signed magnitude from attract/repel buttons. Both held cancel out.
    pub fn from_buttons(position: Vec2, attract: bool, repel: bool, strength: f32) -> Self {
        let magnitude = strength * attract as u8 as f32 - strength * repel as u8 as f32;
        Self::new(position, magnitude)
    }

    /// Map a window pixel (origin top-left, y down) to normalized device
    /// coordinates in [-1, 1] with y up.
    pub fn from_screen(x_px: f32, y_px: f32, width: f32, height: f32, magnitude: f32) -> Self {
        let position = Vec2::new(2.0 * x_px / width - 1.0, 1.0 - 2.0 * y_px / height);
        Self::new(position, magnitude)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.magnitude != 0.0
    }
}

/// Converts pointer input into per-particle acceleration.
#[derive(Clone, Copy, Debug)]
pub struct PointerField {
    /// Influence radius around the pointer.
    pub radius: f32,
    /// Acceleration scale applied on top of the input magnitude.
    pub force_scale: f32,
}

impl PointerField {
    /// Acceleration at `position` for this frame's pointer.
    ///
    /// Falloff is `1 - (d/R)^2` times an inverse distance `1 / (d + 0.1)`,
    /// directed along the particle-to-pointer vector.
    pub fn acceleration(&self, position: Vec2, pointer: &PointerInput) -> Vec2 {
        if !pointer.is_active() {
            return Vec2::ZERO;
        }
        let to_pointer = pointer.position - position;
        let distance = to_pointer.length();
        if distance >= self.radius || distance <= DEAD_ZONE {
            return Vec2::ZERO;
        }

        let normalized_dist = distance / self.radius;
        let falloff = 1.0 - normalized_dist * normalized_dist;
        let accel = pointer.magnitude * self.force_scale * falloff / (distance + SOFTENING);
        (to_pointer / distance) * accel
    }
}
