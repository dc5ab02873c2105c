//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Invalid job: {0}")]
    InvalidJob(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Metrics export failed: {0}")]
    MetricsFailed(String),

    #[error("Director error: {0}")]
    Director(#[from] vframe_director::DirectorError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }

    pub fn invalid_job(msg: impl Into<String>) -> Self {
        Self::InvalidJob(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn metrics_failed(msg: impl Into<String>) -> Self {
        Self::MetricsFailed(msg.into())
    }

    /// Check if the error comes from the job file rather than the environment.
    ///
    /// Rerunning such a job unchanged fails the same way.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            WorkerError::InvalidJob(_) | WorkerError::Json(_) | WorkerError::Director(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors() {
        assert!(WorkerError::invalid_job("no duration").is_input_error());
        assert!(!WorkerError::config_error("bad env").is_input_error());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!WorkerError::from(io).is_input_error());
    }
}
