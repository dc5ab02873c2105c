//! Camera motion constraint enforcement.
//!
//! A single forward pass over the dense samples that limits zoom rate,
//! pan velocity and crop bounds together. It runs last in the planner, so
//! whatever the spline and easing produced, the output satisfies every
//! motion invariant exactly.

use vframe_models::{CameraSample, FrameGeometry};

use crate::config::DirectorConfig;

/// Bisection steps when backing off a zoom-out that would outrun the pan limit.
const ZOOM_SEARCH_STEPS: usize = 40;

/// Slack for floating-point error when checking a clipped step.
const STEP_TOLERANCE: f64 = 1e-9;

/// Hard motion limits applied to a dense trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConstraints {
    /// Pixels per second
    pub max_velocity: f64,
    /// Zoom units per second
    pub max_zoom_speed: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

/// Constrained samples plus how many of them the velocity limit clipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedPath {
    pub samples: Vec<CameraSample>,
    pub velocity_limited: usize,
}

impl MotionConstraints {
    pub fn from_config(config: &DirectorConfig) -> Self {
        Self {
            max_velocity: config.max_velocity,
            max_zoom_speed: config.max_zoom_speed,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    /// Enforce zoom range, zoom rate, pan velocity and crop bounds.
    ///
    /// Each output sample depends only on the previous output sample and the
    /// raw target, so the pass never has to revisit earlier samples.
    pub fn apply(&self, raw: &[CameraSample], geometry: &FrameGeometry) -> ConstrainedPath {
        let mut samples: Vec<CameraSample> = Vec::with_capacity(raw.len());
        let mut velocity_limited = 0;

        for target in raw {
            let Some(prev) = samples.last().copied() else {
                let zoom = self.clamp_zoom(target.zoom);
                let (cx, cy) = geometry.clamp_center(target.cx, target.cy, zoom);
                samples.push(CameraSample::new(target.time, cx, cy, zoom));
                continue;
            };

            let dt = (target.time - prev.time).max(0.0);
            let reach = self.max_velocity * dt;

            let max_dz = self.max_zoom_speed * dt;
            let mut zoom =
                self.clamp_zoom(prev.zoom + (target.zoom - prev.zoom).clamp(-max_dz, max_dz));

            // Zooming out shrinks the valid centre range; don't shrink it past reach
            if distance_to_bounds(geometry, prev.cx, prev.cy, zoom) > reach {
                zoom = self.feasible_zoom(geometry, &prev, zoom, reach);
            }

            let (qx, qy) = geometry.clamp_center(target.cx, target.cy, zoom);
            let step = ((qx - prev.cx).powi(2) + (qy - prev.cy).powi(2)).sqrt();

            let (cx, cy) = if step <= reach {
                (qx, qy)
            } else {
                velocity_limited += 1;
                let scale = reach / step;
                let (sx, sy) = geometry.clamp_center(
                    prev.cx + (qx - prev.cx) * scale,
                    prev.cy + (qy - prev.cy) * scale,
                    zoom,
                );
                let moved = ((sx - prev.cx).powi(2) + (sy - prev.cy).powi(2)).sqrt();
                if moved <= reach + STEP_TOLERANCE {
                    (sx, sy)
                } else {
                    // Nearest valid centre; within reach by the zoom search above
                    geometry.clamp_center(prev.cx, prev.cy, zoom)
                }
            };

            samples.push(CameraSample::new(target.time, cx, cy, zoom));
        }

        ConstrainedPath {
            samples,
            velocity_limited,
        }
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            self.min_zoom
        }
    }

    /// Zoom closest to `wanted` (between the previous zoom and `wanted`) whose
    /// valid centre range is still within `reach` of the previous centre.
    fn feasible_zoom(
        &self,
        geometry: &FrameGeometry,
        prev: &CameraSample,
        wanted: f64,
        reach: f64,
    ) -> f64 {
        let mut feasible = prev.zoom;
        let mut infeasible = wanted;
        for _ in 0..ZOOM_SEARCH_STEPS {
            let mid = 0.5 * (feasible + infeasible);
            if distance_to_bounds(geometry, prev.cx, prev.cy, mid) <= reach {
                feasible = mid;
            } else {
                infeasible = mid;
            }
        }
        feasible
    }
}

/// Distance from a centre to the valid centre range at `zoom`.
fn distance_to_bounds(geometry: &FrameGeometry, cx: f64, cy: f64, zoom: f64) -> f64 {
    let (x, y) = geometry.clamp_center(cx, cy, zoom);
    ((x - cx).powi(2) + (y - cy).powi(2)).sqrt()
}

/// Peak pan speed over consecutive samples (pixels per second).
pub fn peak_velocity(samples: &[CameraSample]) -> f64 {
    samples
        .windows(2)
        .filter(|w| w[1].time > w[0].time)
        .map(|w| w[0].displacement(&w[1]) / (w[1].time - w[0].time))
        .fold(0.0, f64::max)
}

/// Peak zoom rate over consecutive samples (zoom units per second).
pub fn peak_zoom_speed(samples: &[CameraSample]) -> f64 {
    samples
        .windows(2)
        .filter(|w| w[1].time > w[0].time)
        .map(|w| (w[1].zoom - w[0].zoom).abs() / (w[1].time - w[0].time))
        .fold(0.0, f64::max)
}
