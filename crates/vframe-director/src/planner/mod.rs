//! Dynamic camera path planner.
//!
//! Turns the sparse focus selections into a dense, renderable trajectory:
//!
//! 1. One keyframe per selection (target centre, extent-derived zoom)
//! 2. Keyframes closer than the minimum hold are merged, keeping the
//!    higher-priority one
//! 3. Short or near-static clips hold the best keyframe; otherwise a clamped
//!    cubic spline per axis is evaluated at the output rate with cubic
//!    ease-in-out inside each segment
//! 4. Zoom rate, pan velocity and crop bounds are enforced in one final pass
//!
//! Spline failures never reach the caller; the planner falls back to the
//! static path.

pub mod constraints;
pub mod easing;
pub mod spline;
pub mod zoom;

pub use constraints::{peak_velocity, peak_zoom_speed, ConstrainedPath, MotionConstraints};
pub use easing::ease_in_out_cubic;
pub use spline::ClampedCubicSpline;
pub use zoom::desired_zoom;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vframe_models::{CameraKeyframe, CameraSample, FocusSelection, FrameGeometry};

use crate::config::DirectorConfig;
use crate::error::DirectorResult;
use crate::metrics;
use crate::trajectory::CameraTrajectory;

/// Gap below which the last grid point and the clip end are the same sample.
const GRID_EPSILON: f64 = 1e-9;

/// Fewest keyframes that get a smoothed path.
const MIN_SMOOTHED_KEYFRAMES: usize = 3;

/// How the planner produced the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathMode {
    /// Spline through all keyframes
    Smoothed,
    /// Best keyframe held for the whole clip (short clip or few keyframes)
    Static,
    /// Best keyframe held because spline fitting failed
    Fallback,
}

/// Planner output with diagnostics.
#[derive(Debug, Clone)]
pub struct PlannedPath {
    /// Keyframes after merging
    pub keyframes: Vec<CameraKeyframe>,
    pub trajectory: CameraTrajectory,
    pub mode: PathMode,
    pub merged_keyframes: usize,
    pub velocity_limited: usize,
}

/// Plans the camera trajectory for one clip.
#[derive(Debug, Clone)]
pub struct CameraPathPlanner {
    config: DirectorConfig,
    geometry: FrameGeometry,
}

impl CameraPathPlanner {
    pub fn new(config: DirectorConfig, geometry: FrameGeometry) -> Self {
        Self { config, geometry }
    }

    /// Build the trajectory over `[0, duration]`.
    ///
    /// `duration` must be positive and finite; the reframer checks it.
    pub fn plan(&self, selections: &[FocusSelection], duration: f64) -> PlannedPath {
        let raw_keyframes = self.keyframes(selections);
        let (keyframes, merged_keyframes) = merge_keyframes(&raw_keyframes, self.config.min_hold_duration);
        if merged_keyframes > 0 {
            debug!(merged = merged_keyframes, "Merged near-simultaneous keyframes");
            metrics::record_keyframes_merged(merged_keyframes);
        }

        let grid = self.time_grid(duration);

        let (raw, mode) = if keyframes.len() < MIN_SMOOTHED_KEYFRAMES
            || duration < self.config.short_clip_threshold
        {
            metrics::record_planner_fallback("static");
            (self.static_samples(&keyframes, &grid), PathMode::Static)
        } else {
            match self.spline_samples(&keyframes, &grid, duration) {
                Ok(samples) => (samples, PathMode::Smoothed),
                Err(e) => {
                    warn!("Spline fitting failed: {}, holding best keyframe", e);
                    metrics::record_planner_fallback("spline_fit");
                    (self.static_samples(&keyframes, &grid), PathMode::Fallback)
                }
            }
        };

        let constrained = MotionConstraints::from_config(&self.config).apply(&raw, &self.geometry);
        if constrained.velocity_limited > 0 {
            metrics::record_velocity_limited(constrained.velocity_limited);
        }

        info!(
            keyframes = keyframes.len(),
            merged = merged_keyframes,
            samples = constrained.samples.len(),
            velocity_limited = constrained.velocity_limited,
            mode = ?mode,
            "Camera path planned"
        );

        PlannedPath {
            keyframes,
            trajectory: CameraTrajectory::from_parts(
                self.config.output_fps,
                duration,
                self.geometry,
                constrained.samples,
            ),
            mode,
            merged_keyframes,
            velocity_limited: constrained.velocity_limited,
        }
    }

    /// One keyframe per selection.
    pub fn keyframes(&self, selections: &[FocusSelection]) -> Vec<CameraKeyframe> {
        selections
            .iter()
            .map(|selection| {
                let zoom = desired_zoom(&selection.target.candidate, &self.geometry, &self.config);
                CameraKeyframe::from_selection(selection, zoom)
            })
            .collect()
    }

    /// Output times `i / fps` for the whole clip, closed at `duration`.
    fn time_grid(&self, duration: f64) -> Vec<f64> {
        let fps = self.config.output_fps;
        let frames = (duration * fps + GRID_EPSILON).floor() as usize;
        let mut grid: Vec<f64> = (0..=frames).map(|i| i as f64 / fps).collect();
        if let Some(&last) = grid.last() {
            if duration - last > GRID_EPSILON {
                grid.push(duration);
            }
        }
        grid
    }

    /// Hold the highest-priority keyframe (earliest on ties).
    fn static_samples(&self, keyframes: &[CameraKeyframe], grid: &[f64]) -> Vec<CameraSample> {
        let (cx, cy, zoom) = match best_keyframe(keyframes) {
            Some(kf) => (kf.center_x, kf.center_y, kf.zoom),
            None => {
                let (cx, cy) = self.geometry.center();
                (cx, cy, self.config.min_zoom)
            }
        };
        grid.iter()
            .map(|&t| CameraSample::new(t, cx, cy, zoom))
            .collect()
    }

    fn spline_samples(
        &self,
        keyframes: &[CameraKeyframe],
        grid: &[f64],
        duration: f64,
    ) -> DirectorResult<Vec<CameraSample>> {
        let knots = pad_to_clip(keyframes, duration);

        let times: Vec<f64> = knots.iter().map(|k| k.time).collect();
        let xs: Vec<f64> = knots.iter().map(|k| k.center_x).collect();
        let ys: Vec<f64> = knots.iter().map(|k| k.center_y).collect();
        let zooms: Vec<f64> = knots.iter().map(|k| k.zoom).collect();

        let x_spline = ClampedCubicSpline::fit(&times, &xs)?;
        let y_spline = ClampedCubicSpline::fit(&times, &ys)?;
        let zoom_spline = ClampedCubicSpline::fit(&times, &zooms)?;

        Ok(grid
            .iter()
            .map(|&t| {
                CameraSample::new(
                    t,
                    x_spline.evaluate_eased(t),
                    y_spline.evaluate_eased(t),
                    zoom_spline.evaluate_eased(t),
                )
            })
            .collect())
    }
}

/// Drop keyframes closer than `min_gap` to the previous kept one, keeping the
/// higher priority (the earlier on ties). Returns the kept keyframes and the
/// number dropped.
pub fn merge_keyframes(keyframes: &[CameraKeyframe], min_gap: f64) -> (Vec<CameraKeyframe>, usize) {
    let mut kept: Vec<CameraKeyframe> = Vec::with_capacity(keyframes.len());
    let mut dropped = 0;

    for kf in keyframes {
        match kept.last_mut() {
            Some(last) if kf.time - last.time < min_gap => {
                if kf.priority > last.priority {
                    *last = *kf;
                }
                dropped += 1;
            }
            _ => kept.push(*kf),
        }
    }

    (kept, dropped)
}

/// Highest-priority keyframe, earliest on ties.
pub fn best_keyframe(keyframes: &[CameraKeyframe]) -> Option<&CameraKeyframe> {
    keyframes.iter().fold(None, |best, kf| match best {
        Some(b) if b.priority >= kf.priority => Some(b),
        _ => Some(kf),
    })
}

/// Hold the first and last keyframes out to the clip boundaries.
fn pad_to_clip(keyframes: &[CameraKeyframe], duration: f64) -> Vec<CameraKeyframe> {
    let mut knots = keyframes.to_vec();
    if let Some(first) = knots.first().copied() {
        if first.time > GRID_EPSILON {
            knots.insert(0, CameraKeyframe { time: 0.0, ..first });
        }
    }
    if let Some(last) = knots.last().copied() {
        if duration - last.time > GRID_EPSILON {
            knots.push(CameraKeyframe {
                time: duration,
                ..last
            });
        }
    }
    knots
}
