//! Audio-visual synchronization.
//!
//! Projects transcript intent segments onto the candidate timeline so the
//! decision engine can look up the segment active at any sampled time.

use tracing::{debug, warn};
use vframe_models::AudioIntentSegment;

use crate::metrics;

/// Sorted, non-overlapping intent segments with interval lookup.
///
/// An empty synchronizer (no transcript) answers `None` for every time, so
/// audio-derived boosts degrade to zero without special-casing downstream.
#[derive(Debug, Clone, Default)]
pub struct AudioVisualSynchronizer {
    segments: Vec<AudioIntentSegment>,
}

impl AudioVisualSynchronizer {
    /// Build from raw segments.
    ///
    /// Invalid segments are dropped. Overlaps are resolved by trimming the
    /// later segment to start where the earlier one ends; segments trimmed to
    /// nothing are dropped.
    pub fn new(segments: impl IntoIterator<Item = AudioIntentSegment>) -> Self {
        let mut valid: Vec<AudioIntentSegment> = segments
            .into_iter()
            .filter(|segment| match segment.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Dropping transcript segment: {}", e);
                    metrics::record_segment_dropped("invalid_range");
                    false
                }
            })
            .collect();

        valid.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut resolved: Vec<AudioIntentSegment> = Vec::with_capacity(valid.len());
        for mut segment in valid {
            if let Some(prev) = resolved.last() {
                if segment.start < prev.end {
                    debug!(
                        "Trimming overlapping segment [{:.2}, {:.2}) to start at {:.2}",
                        segment.start, segment.end, prev.end
                    );
                    segment.start = prev.end;
                    if segment.end <= segment.start {
                        metrics::record_segment_dropped("overlap");
                        continue;
                    }
                }
            }
            resolved.push(segment);
        }

        Self { segments: resolved }
    }

    /// Synchronizer for a job without transcript.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Segment whose `[start, end)` contains `t`, via binary search.
    pub fn segment_at(&self, t: f64) -> Option<&AudioIntentSegment> {
        if !t.is_finite() {
            return None;
        }
        let idx = self.segments.partition_point(|segment| segment.start <= t);
        if idx == 0 {
            return None;
        }
        let candidate = &self.segments[idx - 1];
        candidate.contains(t).then_some(candidate)
    }

    pub fn segments(&self) -> &[AudioIntentSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}
