//! Priority decision engine.
//!
//! Fuses the candidates of each sampled time with transcript boosts and the
//! selection history into one focus target, with hysteresis so the camera
//! does not ping-pong between similar candidates.
//!
//! The engine is a fold: [`PriorityDecisionEngine::step`] takes the history
//! built so far and returns the next one. Samples must be replayed in time
//! order; [`PriorityDecisionEngine::run`] sorts them first.

mod history;
mod scoring;

pub use history::{SelectionHistory, SelectionStats};
pub use scoring::{compare_scored, select_winner, PriorityScorer, ScoringContext, FALLBACK_REASON};

use tracing::{debug, info, warn};
use vframe_models::{
    CandidateSample, FocusCandidate, FocusSelection, FrameGeometry, ScoredCandidate,
};

use crate::config::DirectorConfig;
use crate::metrics;
use crate::synchronizer::AudioVisualSynchronizer;

/// Outcome of the hysteresis rule for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDecision {
    /// No focus yet
    Select,
    /// Winner is the current target; its hold is extended
    Confirm,
    /// Current target kept against a different winner
    Hold,
    /// Hold elapsed, winner takes over
    SwitchAfterHold,
    /// Winner beat the current target by the configured margin
    SwitchOnMargin,
}

impl FocusDecision {
    pub fn is_switch(&self) -> bool {
        matches!(
            self,
            FocusDecision::Select | FocusDecision::SwitchAfterHold | FocusDecision::SwitchOnMargin
        )
    }
}

/// Selects one focus target per sampled time.
#[derive(Debug, Clone)]
pub struct PriorityDecisionEngine {
    config: DirectorConfig,
    geometry: FrameGeometry,
    synchronizer: AudioVisualSynchronizer,
}

impl PriorityDecisionEngine {
    /// Create an engine. `config` is expected to be validated.
    pub fn new(
        config: DirectorConfig,
        geometry: FrameGeometry,
        synchronizer: AudioVisualSynchronizer,
    ) -> Self {
        Self {
            config,
            geometry,
            synchronizer,
        }
    }

    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    /// Decide every sample of a clip and close the last selection at `duration`.
    ///
    /// Samples with a non-finite time or outside `[0, duration)` are ignored.
    /// The first selection always starts at 0, so the sequence covers the
    /// whole clip even when the first detector sample comes late or never.
    pub fn run(
        &self,
        samples: impl IntoIterator<Item = CandidateSample>,
        duration: f64,
    ) -> (Vec<FocusSelection>, SelectionStats) {
        let mut ordered: Vec<CandidateSample> = Vec::new();
        let mut ignored = 0usize;
        for sample in samples {
            if sample.time.is_finite() && sample.time >= 0.0 && sample.time < duration {
                ordered.push(sample);
            } else {
                ignored += 1;
            }
        }
        if ignored > 0 {
            warn!(ignored, duration, "Ignoring samples outside the clip timeline");
        }

        // Stable, so samples sharing a time keep their arrival order
        ordered.sort_by(|a, b| a.time.total_cmp(&b.time));
        if ordered.is_empty() {
            ordered.push(CandidateSample::empty(0.0));
        }

        let history = ordered
            .iter()
            .fold(SelectionHistory::new(), |history, sample| self.step(history, sample));

        let (mut selections, stats) = history.into_selections(duration);
        if let Some(first) = selections.first_mut() {
            first.time = 0.0;
        }

        info!(
            samples = stats.samples,
            selections = selections.len(),
            switches = stats.switches,
            fallback_samples = stats.fallback_samples,
            dropped_candidates = stats.dropped_candidates,
            "Focus selection complete"
        );

        (selections, stats)
    }

    /// Process one sampled time.
    pub fn step(&self, mut history: SelectionHistory, sample: &CandidateSample) -> SelectionHistory {
        let t = sample.time;

        let (mut candidates, dropped) = self.valid_candidates(sample);
        let fallback = candidates.is_empty();
        if fallback {
            metrics::record_fallback_sample();
            candidates.push(FocusCandidate::frame_center(
                t,
                self.geometry.frame_width,
                self.geometry.frame_height,
            ));
        }

        let scorer = PriorityScorer::new(&self.config, &self.geometry);
        let ctx = ScoringContext {
            time: t,
            segment: self.synchronizer.segment_at(t),
            history: &history,
        };
        let scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|candidate| scorer.score(candidate, &ctx))
            .collect();

        if let Some(winner) = select_winner(&scored) {
            let decision = self.decide(&history, winner, &scored, t);
            self.apply(&mut history, decision, winner, &scored, t);
        }

        history.observe(t, &candidates, self.config.novelty_window);
        history.record_sample(dropped, fallback);
        history
    }

    /// Hysteresis rule for one sample.
    pub fn decide(
        &self,
        history: &SelectionHistory,
        winner: &ScoredCandidate,
        scored: &[ScoredCandidate],
        t: f64,
    ) -> FocusDecision {
        let Some(current) = history.current() else {
            return FocusDecision::Select;
        };
        let radius = self.config.target_match_radius;

        if winner
            .candidate
            .same_target(&current.target.candidate, radius)
        {
            return FocusDecision::Confirm;
        }

        // No selection may be replaced before it has been visible for the minimum hold
        if t < current.time + self.config.min_hold_duration {
            return FocusDecision::Hold;
        }

        if t >= current.hold_until {
            return FocusDecision::SwitchAfterHold;
        }

        let current_score = self
            .live_score(&current.target.candidate, scored)
            .unwrap_or_else(|| history.current_priority());
        let required = current_score.saturating_add(self.config.priority_change_threshold);
        if winner.final_priority >= required {
            FocusDecision::SwitchOnMargin
        } else {
            FocusDecision::Hold
        }
    }

    fn apply(
        &self,
        history: &mut SelectionHistory,
        decision: FocusDecision,
        winner: &ScoredCandidate,
        scored: &[ScoredCandidate],
        t: f64,
    ) {
        let hold_until = t + self.config.min_hold_duration;

        match decision {
            FocusDecision::Confirm => {
                history.extend_hold(hold_until);
                history.set_current_priority(winner.final_priority);
            }
            FocusDecision::Hold => {
                let live = history
                    .current()
                    .and_then(|current| self.live_score(&current.target.candidate, scored));
                if let Some(live) = live {
                    history.set_current_priority(live);
                }
            }
            FocusDecision::Select
            | FocusDecision::SwitchAfterHold
            | FocusDecision::SwitchOnMargin => {
                debug!(
                    time = t,
                    kind = %winner.candidate.kind,
                    priority = winner.final_priority,
                    decision = ?decision,
                    reasons = %winner.reasons.join(", "),
                    "Focus switch"
                );
                metrics::record_focus_switch(winner.candidate.kind.as_str());
                history.push_selection(FocusSelection::new(t, winner.clone(), hold_until));
            }
        }
    }

    /// Score of the current target in this sample, if it is still present.
    fn live_score(&self, target: &FocusCandidate, scored: &[ScoredCandidate]) -> Option<i32> {
        scored
            .iter()
            .filter(|s| s.candidate.same_target(target, self.config.target_match_radius))
            .map(|s| s.final_priority)
            .max()
    }

    /// Candidates that pass validation, plus the number dropped.
    fn valid_candidates(&self, sample: &CandidateSample) -> (Vec<FocusCandidate>, usize) {
        let mut dropped = 0;
        let valid = sample
            .candidates
            .iter()
            .filter(|candidate| match candidate.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(time = sample.time, kind = %candidate.kind, "Dropping candidate: {}", e);
                    metrics::record_candidate_dropped("invalid");
                    dropped += 1;
                    false
                }
            })
            .cloned()
            .collect();
        (valid, dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vframe_models::{AspectRatio, CandidateKind, Extent, Point};

    fn engine(config: DirectorConfig) -> PriorityDecisionEngine {
        PriorityDecisionEngine::new(
            config,
            FrameGeometry::new(1920, 1080, AspectRatio::PORTRAIT),
            AudioVisualSynchronizer::empty(),
        )
    }

    fn candidate(time: f64, kind: CandidateKind, x: f64) -> FocusCandidate {
        FocusCandidate::new(time, kind, Point::new(x, 540.0), Extent::new(100.0, 100.0), 0.9)
    }

    #[test]
    fn test_empty_clip_selects_fallback() {
        let (selections, stats) = engine(DirectorConfig::default()).run(Vec::new(), 10.0);

        assert_eq!(selections.len(), 1);
        assert!(selections[0].is_fallback());
        assert_eq!(selections[0].time, 0.0);
        assert_eq!(selections[0].end, 10.0);
        assert_eq!(stats.fallback_samples, 1);
    }

    #[test]
    fn test_malformed_candidates_degrade_to_fallback() {
        let mut bad = candidate(1.0, CandidateKind::Face, 500.0);
        bad.confidence = 1.5;
        let mut nan = candidate(1.0, CandidateKind::Text, 500.0);
        nan.position.x = f64::NAN;

        let (selections, stats) = engine(DirectorConfig::default())
            .run(vec![CandidateSample::new(0.0, vec![bad, nan])], 4.0);

        assert_eq!(selections.len(), 1);
        assert!(selections[0].is_fallback());
        assert_eq!(stats.dropped_candidates, 2);
    }

    #[test]
    fn test_late_first_sample_starts_at_zero() {
        let samples = vec![CandidateSample::new(
            1.5,
            vec![candidate(1.5, CandidateKind::Face, 900.0)],
        )];
        let (selections, _) = engine(DirectorConfig::default()).run(samples, 6.0);

        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].time, 0.0);
        assert_eq!(selections[0].target.candidate.kind, CandidateKind::Face);
    }

    #[test]
    fn test_samples_out_of_order_are_sorted() {
        let samples = vec![
            CandidateSample::new(3.0, vec![candidate(3.0, CandidateKind::Face, 900.0)]),
            CandidateSample::new(0.0, vec![candidate(0.0, CandidateKind::Face, 900.0)]),
            CandidateSample::new(f64::NAN, vec![candidate(0.0, CandidateKind::Text, 100.0)]),
            CandidateSample::new(12.0, vec![candidate(12.0, CandidateKind::Text, 100.0)]),
        ];
        let (selections, stats) = engine(DirectorConfig::default()).run(samples, 10.0);

        assert_eq!(stats.samples, 2);
        assert_eq!(selections.len(), 1);
    }

    #[test]
    fn test_hold_floor_blocks_early_switch() {
        let engine = engine(DirectorConfig::default());
        let history = engine.step(
            SelectionHistory::new(),
            &CandidateSample::new(0.0, vec![candidate(0.0, CandidateKind::Motion, 300.0)]),
        );

        // Far stronger challenger half a second later
        let challenger = candidate(0.5, CandidateKind::Face, 1500.0).with_base_priority(400);
        let history = engine.step(history, &CandidateSample::new(0.5, vec![challenger]));

        assert_eq!(history.selections().len(), 1);
        assert_eq!(history.current_kind(), Some(CandidateKind::Motion));
    }

    #[test]
    fn test_margin_switch_before_hold_elapses() {
        let engine = engine(DirectorConfig::default());
        let motion = candidate(0.0, CandidateKind::Motion, 300.0);

        let mut history = SelectionHistory::new();
        for t in [0.0, 1.0, 2.0] {
            let mut m = motion.clone();
            m.time = t;
            history = engine.step(history, &CandidateSample::new(t, vec![m]));
        }
        // Confirmed at 2.0, hold runs until 4.0
        assert_eq!(history.current().unwrap().hold_until, 4.0);

        let mut m = motion.clone();
        m.time = 2.5;
        let strong = candidate(2.5, CandidateKind::Face, 1500.0).with_base_priority(200);
        let history = engine.step(history, &CandidateSample::new(2.5, vec![m, strong]));

        assert_eq!(history.selections().len(), 2);
        assert_eq!(history.selections()[0].end, 2.5);
        assert_eq!(history.current_kind(), Some(CandidateKind::Face));
    }

    #[test]
    fn test_decide_outcomes() {
        let engine = engine(DirectorConfig::default());
        let scorer_history = SelectionHistory::new();
        let first = ScoredCandidate::new(candidate(0.0, CandidateKind::Text, 300.0), 100, vec![]);
        assert_eq!(
            engine.decide(&scorer_history, &first, &[first.clone()], 0.0),
            FocusDecision::Select
        );

        let history = engine.step(
            SelectionHistory::new(),
            &CandidateSample::new(0.0, vec![candidate(0.0, CandidateKind::Text, 300.0)]),
        );
        let current_score = history.current_priority();

        let same = ScoredCandidate::new(candidate(1.0, CandidateKind::Text, 320.0), 90, vec![]);
        assert_eq!(
            engine.decide(&history, &same, &[same.clone()], 1.0),
            FocusDecision::Confirm
        );

        let weak = ScoredCandidate::new(
            candidate(3.0, CandidateKind::Face, 1500.0),
            current_score + 19,
            vec![],
        );
        assert_eq!(engine.decide(&history, &weak, &[weak.clone()], 1.0), FocusDecision::Hold);
        assert_eq!(
            engine.decide(&history, &weak, &[weak.clone()], 2.0),
            FocusDecision::SwitchAfterHold
        );
    }
}
