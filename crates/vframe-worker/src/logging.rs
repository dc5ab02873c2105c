//! Job-scoped structured logging.
//!
//! Every event carries `job_id` and `stage` so one clip's lifecycle can be
//! filtered out of interleaved worker logs. Director events emitted inside
//! [`JobLogger::create_span`] inherit both fields.

use tracing::{error, info, warn, Span};
use vframe_models::JobId;

#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    stage: &'static str,
}

impl JobLogger {
    /// `stage` names the worker step, e.g. `"load"` or `"plan"`.
    pub fn new(job_id: &JobId, stage: &'static str) -> Self {
        Self {
            job_id: job_id.to_string(),
            stage,
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(job_id = %self.job_id, stage = self.stage, "Reframe started: {}", message);
    }

    pub fn log_progress(&self, message: &str) {
        info!(job_id = %self.job_id, stage = self.stage, "{}", message);
    }

    pub fn log_warning(&self, message: &str) {
        warn!(job_id = %self.job_id, stage = self.stage, "{}", message);
    }

    pub fn log_error(&self, message: &str) {
        error!(job_id = %self.job_id, stage = self.stage, "Reframe failed: {}", message);
    }

    pub fn log_completion(&self, message: &str) {
        info!(job_id = %self.job_id, stage = self.stage, "Reframe finished: {}", message);
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn stage(&self) -> &'static str {
        self.stage
    }

    pub fn create_span(&self) -> Span {
        tracing::info_span!("reframe_job", job_id = %self.job_id, stage = self.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_carries_job_and_stage() {
        let logger = JobLogger::new(&JobId::from_string("clip-42"), "plan");

        assert_eq!(logger.job_id(), "clip-42");
        assert_eq!(logger.stage(), "plan");
    }
}
