//! Error type for simulation construction and configuration I/O.
//!
//! Stepping never returns an error: degenerate numeric states are clamped or
//! recovered inside the step and reported through `log` and `StepReport`.

/// Errors raised while building a [`crate::Simulation`] or loading its parameters.
#[derive(Debug)]
pub enum SimError {
    /// Smoothing radius must be strictly positive and finite.
    NonPositiveRadius(f32),
    /// Particle mass must be strictly positive and finite.
    NonPositiveMass(f32),
    /// Domain min corner must lie strictly below the max corner on both axes.
    InvalidBounds { min: [f32; 2], max: [f32; 2] },
    /// Timestep range must satisfy `0 < min <= max`.
    InvalidTimestepRange { min: f32, max: f32 },
    /// A scalar parameter is non-finite or outside its allowed range.
    InvalidParameter { name: &'static str, value: f32 },
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::NonPositiveRadius(r) => {
                write!(f, "smoothing radius must be positive, got {}", r)
            }
            SimError::NonPositiveMass(m) => write!(f, "particle mass must be positive, got {}", m),
            SimError::InvalidBounds { min, max } => write!(
                f,
                "domain bounds are empty: min ({}, {}) max ({}, {})",
                min[0], min[1], max[0], max[1]
            ),
            SimError::InvalidTimestepRange { min, max } => {
                write!(f, "invalid timestep range [{}, {}]", min, max)
            }
            SimError::InvalidParameter { name, value } => {
                write!(f, "parameter `{}` has invalid value {}", name, value)
            }
            SimError::Io(e) => write!(f, "config I/O failed: {}", e),
            SimError::Json(e) => write!(f, "config JSON is malformed: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            SimError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Json(e)
    }
}
