//! End-to-end reframing pipeline for one clip.
//!
//! Wires the synchronizer, the decision engine and the path planner
//! together. A `Reframer` is built once from a validated configuration and
//! frame geometry; each `plan` call is an independent job that owns its own
//! history and trajectory.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;
use vframe_models::{
    AudioIntentSegment, CameraKeyframe, CandidateSample, FocusSelection, FrameGeometry,
};

use crate::config::DirectorConfig;
use crate::detection::{ContentDetector, DetectionSampler, FrameSource};
use crate::engine::PriorityDecisionEngine;
use crate::error::{DirectorError, DirectorResult};
use crate::metrics;
use crate::planner::{CameraPathPlanner, PathMode};
use crate::synchronizer::AudioVisualSynchronizer;
use crate::trajectory::CameraTrajectory;

/// Counters describing how a plan was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStats {
    pub samples: usize,
    pub dropped_candidates: usize,
    pub fallback_samples: usize,
    pub switches: usize,
    pub merged_keyframes: usize,
    pub path_mode: PathMode,
    pub velocity_limited_samples: usize,
}

/// Everything produced for one clip.
#[derive(Debug, Clone)]
pub struct ReframePlan {
    pub selections: Vec<FocusSelection>,
    pub keyframes: Vec<CameraKeyframe>,
    pub trajectory: CameraTrajectory,
    pub stats: PlanStats,
}

/// Vertical reframing pipeline.
#[derive(Debug, Clone)]
pub struct Reframer {
    config: DirectorConfig,
    geometry: FrameGeometry,
}

impl Reframer {
    /// Validate configuration and geometry.
    pub fn new(config: DirectorConfig, geometry: FrameGeometry) -> DirectorResult<Self> {
        let config = config.validated()?;
        geometry
            .validate()
            .map_err(|e| DirectorError::invalid_geometry(e.to_string()))?;
        Ok(Self { config, geometry })
    }

    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    /// Plan a clip from pre-extracted candidate samples.
    ///
    /// Fails only for a non-positive or non-finite duration. Malformed
    /// candidates, empty samples and a missing transcript are absorbed.
    pub fn plan(
        &self,
        samples: Vec<CandidateSample>,
        segments: Vec<AudioIntentSegment>,
        duration: f64,
    ) -> DirectorResult<ReframePlan> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(DirectorError::InvalidDuration(duration));
        }
        let started = Instant::now();

        let synchronizer = AudioVisualSynchronizer::new(segments);
        info!(
            samples = samples.len(),
            segments = synchronizer.len(),
            duration,
            "Planning reframe"
        );

        let engine = PriorityDecisionEngine::new(self.config.clone(), self.geometry, synchronizer);
        let (selections, selection_stats) = engine.run(samples, duration);

        let planner = CameraPathPlanner::new(self.config.clone(), self.geometry);
        let path = planner.plan(&selections, duration);

        let stats = PlanStats {
            samples: selection_stats.samples,
            dropped_candidates: selection_stats.dropped_candidates,
            fallback_samples: selection_stats.fallback_samples,
            switches: selection_stats.switches,
            merged_keyframes: path.merged_keyframes,
            path_mode: path.mode,
            velocity_limited_samples: path.velocity_limited,
        };

        let elapsed = started.elapsed().as_secs_f64();
        metrics::record_plan_duration(elapsed);
        info!(
            selections = selections.len(),
            path_mode = ?stats.path_mode,
            elapsed_ms = (elapsed * 1000.0) as u64,
            "Reframe planned"
        );

        Ok(ReframePlan {
            selections,
            keyframes: path.keyframes,
            trajectory: path.trajectory,
            stats,
        })
    }

    /// Sample detectors over the clip, then plan.
    pub fn plan_with_detectors<S>(
        &self,
        source: &S,
        detectors: &[Box<dyn ContentDetector>],
        segments: Vec<AudioIntentSegment>,
        duration: f64,
    ) -> DirectorResult<ReframePlan>
    where
        S: FrameSource + ?Sized,
    {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(DirectorError::InvalidDuration(duration));
        }
        let samples =
            DetectionSampler::new(self.config.sample_interval).collect(source, detectors, duration);
        self.plan(samples, segments, duration)
    }
}
