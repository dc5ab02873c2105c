//! Batch reframing worker.
//!
//! This crate provides:
//! - Job and output records for pre-extracted candidates and transcripts
//! - Environment-driven configuration with per-job overrides
//! - Job execution on the blocking pool with structured logging
//! - Prometheus exposition written per run

pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod metrics;
pub mod runner;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use job::{ReframeJob, ReframeOutput};
pub use logging::JobLogger;
pub use runner::{load_job, plan_job, run_job};
