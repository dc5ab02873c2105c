//! Error types for focus direction and path planning.

use thiserror::Error;
use vframe_models::ModelError;

/// Result type for director operations.
pub type DirectorResult<T> = Result<T, DirectorError>;

/// Errors that can occur while configuring or running the director.
///
/// Only construction-time problems reach callers of [`crate::Reframer`];
/// spline failures are recovered inside the planner.
#[derive(Debug, Error)]
pub enum DirectorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("Invalid frame geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid clip duration: {0}")]
    InvalidDuration(f64),

    #[error("Spline fitting failed: {0}")]
    SplineFit(String),

    #[error("Trajectory decode failed: {0}")]
    TrajectoryDecode(String),

    #[error("Invalid input: {0}")]
    Model(#[from] ModelError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DirectorError {
    /// Create an invalid geometry error.
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry(message.into())
    }

    /// Create a spline fitting error.
    pub fn spline_fit(message: impl Into<String>) -> Self {
        Self::SplineFit(message.into())
    }

    /// Create a trajectory decode error.
    pub fn trajectory_decode(message: impl Into<String>) -> Self {
        Self::TrajectoryDecode(message.into())
    }
}
