//! Shared data models for the VFrame reframing pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Focus candidates reported by content detectors
//! - Audio intent segments from transcript analysis
//! - Scored candidates and focus selections
//! - Camera keyframes and trajectory tables
//! - Frame geometry and crop rectangles

pub mod camera;
pub mod candidate;
pub mod error;
pub mod geometry;
pub mod intent;
pub mod job;
pub mod selection;

// Re-export common types
pub use camera::{CameraKeyframe, CameraSample, TrajectoryTable};
pub use candidate::{
    CandidateKind, CandidateKindParseError, CandidateSample, Extent, FocusCandidate, Point,
};
pub use error::{ModelError, ModelResult};
pub use geometry::{AspectRatio, AspectRatioParseError, CropRect, FrameGeometry};
pub use intent::{AudioIntentSegment, IntentKind};
pub use job::JobId;
pub use selection::{FocusSelection, ScoredCandidate};
