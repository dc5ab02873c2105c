//! Camera keyframes and the dense trajectory table handed to renderers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geometry::FrameGeometry;
use crate::selection::FocusSelection;

/// Sparse control point for the path planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CameraKeyframe {
    /// Timestamp in seconds
    pub time: f64,
    /// Camera centre x-coordinate
    pub center_x: f64,
    /// Camera centre y-coordinate
    pub center_y: f64,
    /// Zoom factor (1.0 = widest crop of the target aspect)
    pub zoom: f64,
    /// Priority of the selection this keyframe came from
    pub priority: i32,
}

impl CameraKeyframe {
    pub fn new(time: f64, center_x: f64, center_y: f64, zoom: f64, priority: i32) -> Self {
        Self {
            time,
            center_x,
            center_y,
            zoom,
            priority,
        }
    }

    /// Keyframe at the selection's target centre with the given zoom.
    pub fn from_selection(selection: &FocusSelection, zoom: f64) -> Self {
        let position = selection.target.candidate.position;
        Self {
            time: selection.time,
            center_x: position.x,
            center_y: position.y,
            zoom,
            priority: selection.target.final_priority,
        }
    }
}

/// One camera state of the dense trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CameraSample {
    pub time: f64,
    pub cx: f64,
    pub cy: f64,
    pub zoom: f64,
}

impl CameraSample {
    pub fn new(time: f64, cx: f64, cy: f64, zoom: f64) -> Self {
        Self { time, cx, cy, zoom }
    }

    /// Linear interpolation between two samples.
    pub fn lerp(a: &CameraSample, b: &CameraSample, t: f64) -> CameraSample {
        CameraSample {
            time: a.time + t * (b.time - a.time),
            cx: a.cx + t * (b.cx - a.cx),
            cy: a.cy + t * (b.cy - a.cy),
            zoom: a.zoom + t * (b.zoom - a.zoom),
        }
    }

    /// Pixel distance travelled between two samples.
    pub fn displacement(&self, other: &CameraSample) -> f64 {
        ((other.cx - self.cx).powi(2) + (other.cy - self.cy).powi(2)).sqrt()
    }
}

/// Serialized form of a camera trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrajectoryTable {
    /// Sampling rate of `samples`
    pub fps: f64,
    /// Clip duration in seconds
    pub duration: f64,
    pub geometry: FrameGeometry,
    pub samples: Vec<CameraSample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_lerp() {
        let a = CameraSample::new(0.0, 100.0, 200.0, 1.0);
        let b = CameraSample::new(1.0, 300.0, 200.0, 2.0);
        let mid = CameraSample::lerp(&a, &b, 0.5);

        assert_eq!(mid.time, 0.5);
        assert_eq!(mid.cx, 200.0);
        assert_eq!(mid.zoom, 1.5);
        assert_eq!(a.displacement(&b), 200.0);
    }
}
