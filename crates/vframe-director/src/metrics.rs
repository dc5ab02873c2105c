//! Metrics emitted by the director.
//!
//! Recording is a no-op unless the host process installs a recorder
//! (the worker installs the Prometheus exporter).

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    // Input metrics
    pub const CANDIDATES_DROPPED_TOTAL: &str = "vframe_candidates_dropped_total";
    pub const SEGMENTS_DROPPED_TOTAL: &str = "vframe_segments_dropped_total";
    pub const FALLBACK_SAMPLES_TOTAL: &str = "vframe_fallback_samples_total";

    // Selection metrics
    pub const FOCUS_SWITCHES_TOTAL: &str = "vframe_focus_switches_total";

    // Planner metrics
    pub const PLANNER_FALLBACKS_TOTAL: &str = "vframe_planner_fallbacks_total";
    pub const KEYFRAMES_MERGED_TOTAL: &str = "vframe_keyframes_merged_total";
    pub const VELOCITY_LIMITED_SAMPLES_TOTAL: &str = "vframe_velocity_limited_samples_total";
    pub const PLAN_DURATION_SECONDS: &str = "vframe_plan_duration_seconds";
}

/// Record a candidate rejected by validation.
pub fn record_candidate_dropped(reason: &'static str) {
    counter!(names::CANDIDATES_DROPPED_TOTAL, "reason" => reason).increment(1);
}

/// Record a transcript segment rejected by the synchronizer.
pub fn record_segment_dropped(reason: &'static str) {
    counter!(names::SEGMENTS_DROPPED_TOTAL, "reason" => reason).increment(1);
}

/// Record a sample resolved by the frame-centre fallback.
pub fn record_fallback_sample() {
    counter!(names::FALLBACK_SAMPLES_TOTAL).increment(1);
}

/// Record a change of focus target.
pub fn record_focus_switch(kind: &'static str) {
    counter!(names::FOCUS_SWITCHES_TOTAL, "kind" => kind).increment(1);
}

/// Record the planner taking a static path instead of a spline.
pub fn record_planner_fallback(reason: &'static str) {
    counter!(names::PLANNER_FALLBACKS_TOTAL, "reason" => reason).increment(1);
}

/// Record keyframes dropped by the merge-before-fit pass.
pub fn record_keyframes_merged(count: usize) {
    counter!(names::KEYFRAMES_MERGED_TOTAL).increment(count as u64);
}

/// Record samples clipped by the velocity limiter.
pub fn record_velocity_limited(count: usize) {
    counter!(names::VELOCITY_LIMITED_SAMPLES_TOTAL).increment(count as u64);
}

/// Record wall-clock time spent planning one clip.
pub fn record_plan_duration(duration_secs: f64) {
    histogram!(names::PLAN_DURATION_SECONDS).record(duration_secs);
}
