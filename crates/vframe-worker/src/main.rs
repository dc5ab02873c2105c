//! Reframing worker binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vframe_models::AspectRatio;
use vframe_worker::{metrics, run_job, ReframeJob, WorkerConfig};

#[derive(Parser)]
#[command(name = "vframe-worker")]
#[command(about = "Plans vertical camera trajectories for pre-analysed clips", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan one job and write its trajectory
    Plan {
        /// Job file (JSON)
        #[arg(short, long)]
        job: PathBuf,

        /// Output file for the trajectory table and selections
        #[arg(short, long)]
        output: PathBuf,

        /// Aspect ratio (W:H) for jobs that don't set one
        #[arg(short, long)]
        aspect: Option<AspectRatio>,
    },
    /// Print the JSON schema of the job file
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);
    init_tracing(use_json)?;

    match cli.command {
        Commands::Schema => {
            let schema = schemars::schema_for!(ReframeJob);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Commands::Plan { job, output, aspect } => {
            info!("Starting vframe-worker");

            let mut config = match WorkerConfig::from_env() {
                Ok(config) => config,
                Err(e) => {
                    error!("Invalid worker configuration: {}", e);
                    return Err(e).context("invalid worker configuration");
                }
            };
            if let Some(aspect) = aspect {
                config.target_aspect = aspect;
            }
            info!("Worker config: {:?}", config);

            let metrics_handle = match &config.metrics_path {
                Some(_) => Some(metrics::init_metrics()?),
                None => None,
            };

            let result = run_job(&config, &job, &output).await;

            if let (Some(handle), Some(path)) = (&metrics_handle, &config.metrics_path) {
                if let Err(e) = metrics::write_metrics(handle, path).await {
                    warn!("Failed to write metrics to {}: {}", path.display(), e);
                }
            }

            match result {
                Ok(_) => {
                    info!("Worker finished");
                    Ok(())
                }
                Err(e) => {
                    error!("Job failed: {}", e);
                    Err(e).with_context(|| format!("failed to plan {}", job.display()))
                }
            }
        }
    }
}

/// Colored output for dev, JSON for production.
fn init_tracing(use_json: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("vframe_director=info".parse()?)
        .add_directive("vframe_worker=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}
