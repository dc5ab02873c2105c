//! Runs one reframing job from a job file to an output file.

use std::path::Path;
use std::time::Instant;

use tracing::Instrument;
use vframe_director::Reframer;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::job::{ReframeJob, ReframeOutput};
use crate::logging::JobLogger;
use crate::metrics;

/// Load a job file.
pub async fn load_job(path: &Path) -> WorkerResult<ReframeJob> {
    let raw = tokio::fs::read_to_string(path).await?;
    let job: ReframeJob = serde_json::from_str(&raw)?;
    if !(job.duration.is_finite() && job.duration > 0.0) {
        return Err(WorkerError::invalid_job(format!(
            "duration must be positive, got {}",
            job.duration
        )));
    }
    Ok(job)
}

/// Plan a loaded job on the blocking pool.
pub async fn plan_job(config: &WorkerConfig, job: ReframeJob) -> WorkerResult<ReframeOutput> {
    let logger = JobLogger::new(&job.job_id, "plan");
    let span = logger.create_span();

    async move {
        logger.log_start(&format!(
            "{:.1}s clip, {} samples, {} segments",
            job.duration,
            job.samples.len(),
            job.segments.len()
        ));
        let started = Instant::now();

        let director = config.director_for(job.config.as_ref())?;
        let reframer = Reframer::new(director, job.geometry(config.target_aspect))?;

        let ReframeJob {
            job_id,
            duration,
            samples,
            segments,
            ..
        } = job;

        let span = tracing::Span::current();
        let plan = tokio::task::spawn_blocking(move || {
            let _guard = span.enter();
            reframer.plan(samples, segments, duration)
        })
        .await
        .map_err(|e| WorkerError::job_failed(format!("planning task panicked: {}", e)))??;

        if plan.stats.fallback_samples == plan.stats.samples {
            logger.log_warning("no usable candidates, clip framed on the frame centre");
        }
        logger.log_progress(&format!(
            "{} selections, {} keyframes, {:?} path",
            plan.selections.len(),
            plan.keyframes.len(),
            plan.stats.path_mode
        ));

        let output = ReframeOutput::from_plan(job_id, plan);
        metrics::record_job_completed(started.elapsed().as_secs_f64());
        Ok::<_, WorkerError>(output)
    }
    .instrument(span)
    .await
}

/// Load, plan and write one job.
pub async fn run_job(
    config: &WorkerConfig,
    job_path: &Path,
    output_path: &Path,
) -> WorkerResult<ReframeOutput> {
    let job = match load_job(job_path).await {
        Ok(job) => job,
        Err(e) => {
            metrics::record_job_failed("load");
            return Err(e);
        }
    };
    let logger = JobLogger::new(&job.job_id, "plan");

    let output = match plan_job(config, job).await {
        Ok(output) => output,
        Err(e) => {
            logger.log_error(&e.to_string());
            metrics::record_job_failed("plan");
            return Err(e);
        }
    };

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output_path, serde_json::to_vec_pretty(&output)?).await?;

    logger.log_completion(&format!("trajectory written to {}", output_path.display()));
    Ok(output)
}
