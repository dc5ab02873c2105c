//! Job and result records exchanged with the orchestrator.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vframe_director::{PlanStats, ReframePlan};
use vframe_models::{
    AspectRatio, AudioIntentSegment, CameraKeyframe, CandidateSample, FocusSelection,
    FrameGeometry, JobId, TrajectoryTable,
};

/// One clip to reframe, with detector output and transcript already extracted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReframeJob {
    #[serde(default)]
    pub job_id: JobId,
    /// Clip duration in seconds
    pub duration: f64,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Output aspect ratio; the worker's configured ratio when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_aspect: Option<AspectRatio>,
    /// Candidates per sampled time
    #[serde(default)]
    pub samples: Vec<CandidateSample>,
    /// Transcript intent segments; empty without a transcript
    #[serde(default)]
    pub segments: Vec<AudioIntentSegment>,
    /// Partial director configuration overriding the worker's
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl ReframeJob {
    /// Frame geometry, using `default_aspect` when the job sets none.
    pub fn geometry(&self, default_aspect: AspectRatio) -> FrameGeometry {
        FrameGeometry::new(
            self.frame_width,
            self.frame_height,
            self.target_aspect.unwrap_or(default_aspect),
        )
    }
}

/// Everything written back for a finished job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReframeOutput {
    pub job_id: JobId,
    pub generated_at: DateTime<Utc>,
    pub stats: PlanStats,
    pub selections: Vec<FocusSelection>,
    pub keyframes: Vec<CameraKeyframe>,
    pub trajectory: TrajectoryTable,
}

impl ReframeOutput {
    pub fn from_plan(job_id: JobId, plan: ReframePlan) -> Self {
        Self {
            job_id,
            generated_at: Utc::now(),
            stats: plan.stats,
            trajectory: plan.trajectory.to_table(),
            selections: plan.selections,
            keyframes: plan.keyframes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_job_uses_defaults() {
        let job: ReframeJob =
            serde_json::from_str(r#"{"duration": 12.5, "frame_width": 1920, "frame_height": 1080}"#)
                .unwrap();

        assert!(job.target_aspect.is_none());
        assert_eq!(job.geometry(AspectRatio::SQUARE).target_aspect, AspectRatio::SQUARE);
        assert!(job.samples.is_empty());
        assert!(job.segments.is_empty());
        assert!(job.config.is_none());
        assert!(!job.job_id.as_str().is_empty());
    }

    #[test]
    fn test_job_aspect_wins_over_default() {
        let job: ReframeJob = serde_json::from_str(
            r#"{"duration": 3.0, "frame_width": 1920, "frame_height": 1080,
                "target_aspect": {"width": 4, "height": 5}}"#,
        )
        .unwrap();

        assert_eq!(job.geometry(AspectRatio::SQUARE).target_aspect, AspectRatio::new(4, 5));
    }

    #[test]
    fn test_schema_names_fields() {
        let schema = serde_json::to_string(&schemars::schema_for!(ReframeJob)).unwrap();
        assert!(schema.contains("\"duration\""));
        assert!(schema.contains("\"segments\""));
    }
}
