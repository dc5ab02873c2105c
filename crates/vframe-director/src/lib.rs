#![deny(unreachable_patterns)]
//! Focus selection and camera path planning for vertical reframing.
//!
//! This crate provides:
//! - A content detection interface with sparse, parallel sampling
//! - Audio-visual synchronization of transcript intent segments
//! - A priority decision engine with hysteresis and frame-centre fallback
//! - A camera path planner producing bounded, velocity-limited trajectories
//! - The `Reframer` pipeline tying them together for one clip

pub mod config;
pub mod detection;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod planner;
pub mod reframer;
pub mod synchronizer;
pub mod trajectory;


pub use config::DirectorConfig;
pub use detection::{ContentDetector, DetectionSampler, Frame, FrameSource};
pub use engine::{
    FocusDecision, PriorityDecisionEngine, PriorityScorer, ScoringContext, SelectionHistory,
    SelectionStats,
};
pub use error::{DirectorError, DirectorResult};
pub use planner::{CameraPathPlanner, MotionConstraints, PathMode, PlannedPath};
pub use reframer::{PlanStats, ReframePlan, Reframer};
pub use synchronizer::AudioVisualSynchronizer;
pub use trajectory::CameraTrajectory;
