//! Camera trajectory handed to the renderer.

use vframe_models::{CameraSample, CropRect, FrameGeometry, TrajectoryTable};

use crate::error::{DirectorError, DirectorResult};
use crate::planner::{peak_velocity, peak_zoom_speed};

/// Continuous camera path over `[0, duration]`, stored as a dense table.
///
/// Queries between table rows are linearly interpolated. Because the valid
/// centre range is convex in zoom, interpolating two in-bounds samples stays
/// in bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTrajectory {
    fps: f64,
    duration: f64,
    geometry: FrameGeometry,
    samples: Vec<CameraSample>,
}

impl CameraTrajectory {
    /// Assemble from planner output. `samples` must be non-empty and sorted.
    pub(crate) fn from_parts(
        fps: f64,
        duration: f64,
        geometry: FrameGeometry,
        samples: Vec<CameraSample>,
    ) -> Self {
        Self {
            fps,
            duration,
            geometry,
            samples,
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    pub fn samples(&self) -> &[CameraSample] {
        &self.samples
    }

    /// Camera state at `t`, clamped to `[0, duration]`.
    pub fn sample(&self, t: f64) -> CameraSample {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, self.duration) };

        let idx = self.samples.partition_point(|s| s.time <= t);
        if idx == 0 {
            return CameraSample { time: t, ..self.samples[0] };
        }
        if idx == self.samples.len() {
            return CameraSample {
                time: t,
                ..self.samples[idx - 1]
            };
        }

        let a = &self.samples[idx - 1];
        let b = &self.samples[idx];
        let span = b.time - a.time;
        if span <= 0.0 {
            return CameraSample { time: t, ..*a };
        }
        let mut s = CameraSample::lerp(a, b, (t - a.time) / span);
        s.time = t;
        s
    }

    /// Integer crop rectangle at `t`.
    pub fn crop_at(&self, t: f64) -> CropRect {
        let s = self.sample(t);
        self.geometry.crop_rect(s.cx, s.cy, s.zoom)
    }

    /// Highest pan speed between consecutive samples.
    pub fn peak_velocity(&self) -> f64 {
        peak_velocity(&self.samples)
    }

    /// Highest zoom rate between consecutive samples.
    pub fn peak_zoom_speed(&self) -> f64 {
        peak_zoom_speed(&self.samples)
    }

    /// Serializable sample table.
    pub fn to_table(&self) -> TrajectoryTable {
        TrajectoryTable {
            fps: self.fps,
            duration: self.duration,
            geometry: self.geometry,
            samples: self.samples.clone(),
        }
    }

    /// Rebuild from a sample table, rejecting tables `sample` can't answer from.
    pub fn from_table(table: TrajectoryTable) -> DirectorResult<Self> {
        table.geometry.validate()?;
        if !(table.duration.is_finite() && table.duration > 0.0) {
            return Err(DirectorError::trajectory_decode(format!(
                "invalid duration {}",
                table.duration
            )));
        }
        if !(table.fps.is_finite() && table.fps > 0.0) {
            return Err(DirectorError::trajectory_decode(format!("invalid fps {}", table.fps)));
        }
        if table.samples.is_empty() {
            return Err(DirectorError::trajectory_decode("no samples"));
        }
        let finite = table
            .samples
            .iter()
            .all(|s| s.time.is_finite() && s.cx.is_finite() && s.cy.is_finite() && s.zoom.is_finite());
        if !finite {
            return Err(DirectorError::trajectory_decode("non-finite sample"));
        }
        if table.samples.windows(2).any(|w| w[1].time < w[0].time) {
            return Err(DirectorError::trajectory_decode("samples not sorted by time"));
        }

        Ok(Self {
            fps: table.fps,
            duration: table.duration,
            geometry: table.geometry,
            samples: table.samples,
        })
    }

    pub fn to_json(&self) -> DirectorResult<String> {
        Ok(serde_json::to_string(&self.to_table())?)
    }

    pub fn from_json(json: &str) -> DirectorResult<Self> {
        let table: TrajectoryTable = serde_json::from_str(json)?;
        Self::from_table(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vframe_models::AspectRatio;

    fn trajectory() -> CameraTrajectory {
        CameraTrajectory::from_parts(
            2.0,
            1.0,
            FrameGeometry::new(1920, 1080, AspectRatio::PORTRAIT),
            vec![
                CameraSample::new(0.0, 400.0, 540.0, 1.0),
                CameraSample::new(0.5, 500.0, 540.0, 1.2),
                CameraSample::new(1.0, 600.0, 540.0, 1.4),
            ],
        )
    }

    #[test]
    fn test_sample_interpolates() {
        let s = trajectory().sample(0.25);
        assert_eq!(s.time, 0.25);
        assert!((s.cx - 450.0).abs() < 1e-9);
        assert!((s.zoom - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_sample_clamps_time() {
        let trajectory = trajectory();
        assert_eq!(trajectory.sample(-3.0).cx, 400.0);
        assert_eq!(trajectory.sample(7.0).cx, 600.0);
        assert_eq!(trajectory.sample(f64::NAN).cx, 400.0);
        assert_eq!(trajectory.sample(7.0).time, 1.0);
    }

    #[test]
    fn test_crop_at_fits_frame() {
        let trajectory = trajectory();
        for i in 0..=10 {
            let rect = trajectory.crop_at(i as f64 / 10.0);
            assert!(rect.fits_within(1920, 1080));
        }
    }

    #[test]
    fn test_json_round_trip() {
        let trajectory = trajectory();
        let json = trajectory.to_json().unwrap();
        let decoded = CameraTrajectory::from_json(&json).unwrap();
        assert_eq!(decoded, trajectory);
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            assert_eq!(decoded.sample(t), trajectory.sample(t));
        }
    }

    #[test]
    fn test_from_table_rejects_invalid() {
        let mut table = trajectory().to_table();
        table.samples.clear();
        assert!(CameraTrajectory::from_table(table).is_err());

        let mut table = trajectory().to_table();
        table.samples.swap(0, 2);
        assert!(CameraTrajectory::from_table(table).is_err());

        let mut table = trajectory().to_table();
        table.duration = 0.0;
        assert!(CameraTrajectory::from_table(table).is_err());

        assert!(CameraTrajectory::from_json("{not json").is_err());
    }
}
