//! Prometheus export for batch runs.
//!
//! The worker is short-lived, so instead of serving a scrape endpoint it
//! renders the exposition once per job and writes it to a file for a
//! node-exporter textfile collector to pick up.

use std::path::Path;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::error::{WorkerError, WorkerResult};

/// Metric names as constants for consistency.
pub mod names {
    pub const JOBS_COMPLETED_TOTAL: &str = "vframe_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "vframe_jobs_failed_total";
    pub const JOB_DURATION_SECONDS: &str = "vframe_job_duration_seconds";
}

/// Install the Prometheus recorder.
pub fn init_metrics() -> WorkerResult<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| WorkerError::metrics_failed(e.to_string()))
}

/// Write the current exposition to `path`.
pub async fn write_metrics(handle: &PrometheusHandle, path: &Path) -> WorkerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, handle.render()).await?;
    Ok(())
}

pub fn record_job_completed(duration_secs: f64) {
    counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
    histogram!(names::JOB_DURATION_SECONDS).record(duration_secs);
}

pub fn record_job_failed(reason: &'static str) {
    counter!(names::JOBS_FAILED_TOTAL, "reason" => reason).increment(1);
}
