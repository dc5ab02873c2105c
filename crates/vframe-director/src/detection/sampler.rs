//! Sparse detector sampling over a clip.

use rayon::prelude::*;
use tracing::{debug, info};
use vframe_models::CandidateSample;

use super::provider::{ContentDetector, FrameSource};

/// Runs detectors at a fixed interval over the clip.
///
/// Sampled times are independent, so they are processed on the rayon pool;
/// results come back in time order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionSampler {
    interval: f64,
}

impl DetectionSampler {
    pub fn new(interval: f64) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Sample times `0, i, 2i, ...` strictly below `duration`.
    pub fn sample_times(&self, duration: f64) -> Vec<f64> {
        if !(self.interval.is_finite() && self.interval > 0.0)
            || !(duration.is_finite() && duration > 0.0)
        {
            return Vec::new();
        }
        (0u64..)
            .map(|i| i as f64 * self.interval)
            .take_while(|t| *t < duration)
            .collect()
    }

    /// Run every detector on every sampled frame.
    ///
    /// Times where the source yields no frame produce empty samples, which
    /// the engine resolves with its frame-centre fallback.
    pub fn collect<S>(
        &self,
        source: &S,
        detectors: &[Box<dyn ContentDetector>],
        duration: f64,
    ) -> Vec<CandidateSample>
    where
        S: FrameSource + ?Sized,
    {
        let times = self.sample_times(duration);
        info!(
            samples = times.len(),
            detectors = detectors.len(),
            interval = self.interval,
            "Sampling detectors"
        );

        times
            .par_iter()
            .map(|&t| match source.frame_at(t) {
                Some(frame) => {
                    let candidates = detectors
                        .iter()
                        .flat_map(|detector| {
                            let found = detector.detect(&frame);
                            if !found.is_empty() {
                                debug!(time = t, kind = %detector.kind(), count = found.len(), "Detector hit");
                            }
                            found
                        })
                        .collect();
                    CandidateSample::new(t, candidates)
                }
                None => {
                    debug!(time = t, "No frame available");
                    CandidateSample::empty(t)
                }
            })
            .collect()
    }
}
