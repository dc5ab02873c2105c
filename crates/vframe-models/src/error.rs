//! Validation errors for pipeline data models.

use thiserror::Error;

/// Result type for model validation.
pub type ModelResult<T> = Result<T, ModelError>;

/// Reasons a candidate or segment is unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Non-finite value in field `{field}`")]
    NonFinite { field: &'static str },

    #[error("Confidence {0} outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("Negative extent {w}x{h}")]
    NegativeExtent { w: f64, h: f64 },

    #[error("Invalid time range [{start}, {end})")]
    InvalidTimeRange { start: f64, end: f64 },

    #[error("Invalid frame geometry: {0}")]
    InvalidGeometry(String),
}

impl ModelError {
    /// Create a non-finite field error.
    pub fn non_finite(field: &'static str) -> Self {
        Self::NonFinite { field }
    }

    /// Create an invalid geometry error.
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry(message.into())
    }
}
