//! Selection history threaded through the decision fold.

use vframe_models::{CandidateKind, FocusCandidate, FocusSelection, Point};

/// A non-synthetic candidate seen at a sampled time, kept for novelty checks.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Observation {
    time: f64,
    kind: CandidateKind,
    position: Point,
}

/// Counters accumulated while folding samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionStats {
    /// Samples processed
    pub samples: usize,
    /// Candidates rejected by validation
    pub dropped_candidates: usize,
    /// Samples resolved by the frame-centre fallback
    pub fallback_samples: usize,
    /// Focus changes after the initial selection
    pub switches: usize,
}

/// Everything the engine needs to remember between sampled times.
///
/// Each engine step consumes the previous history and returns the next one,
/// so the decision loop is a pure fold over the sample sequence.
#[derive(Debug, Clone, Default)]
pub struct SelectionHistory {
    selections: Vec<FocusSelection>,
    observations: Vec<Observation>,
    /// Most recent score of the current target
    current_priority: i32,
    stats: SelectionStats,
}

impl SelectionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selection currently on screen.
    pub fn current(&self) -> Option<&FocusSelection> {
        self.selections.last()
    }

    /// Latest known score of the current target.
    pub fn current_priority(&self) -> i32 {
        self.current_priority
    }

    pub fn selections(&self) -> &[FocusSelection] {
        &self.selections
    }

    pub fn stats(&self) -> SelectionStats {
        self.stats
    }

    /// Whether a matching target was observed in `[t - window, t)`.
    pub fn seen_recently(
        &self,
        candidate: &FocusCandidate,
        t: f64,
        window: f64,
        match_radius: f64,
    ) -> bool {
        self.observations.iter().any(|obs| {
            obs.time < t
                && t - obs.time <= window
                && obs.kind == candidate.kind
                && obs.position.distance(&candidate.position) <= match_radius
        })
    }

    /// Whether `kind` was the focus of an earlier selection that ended within
    /// `window` of `t`. The current selection's kind is never penalised.
    pub fn kind_recently_left(&self, kind: CandidateKind, t: f64, window: f64) -> bool {
        let Some((current, previous)) = self.selections.split_last() else {
            return false;
        };
        if current.target.candidate.kind == kind && !current.target.candidate.synthetic {
            return false;
        }
        previous.iter().rev().any(|selection| {
            let candidate = &selection.target.candidate;
            !candidate.synthetic && candidate.kind == kind && t - selection.end <= window
        })
    }

    /// Kind of the current (non-fallback) focus target.
    pub fn current_kind(&self) -> Option<CandidateKind> {
        self.current()
            .filter(|selection| !selection.is_fallback())
            .map(|selection| selection.target.candidate.kind)
    }

    // === Fold updates (engine only) ===

    pub(crate) fn push_selection(&mut self, selection: FocusSelection) {
        if let Some(previous) = self.selections.last_mut() {
            previous.end = selection.time;
            self.stats.switches += 1;
        }
        self.current_priority = selection.target.final_priority;
        self.selections.push(selection);
    }

    /// Extend the current hold after the target was confirmed again at `t`.
    pub(crate) fn extend_hold(&mut self, hold_until: f64) {
        if let Some(current) = self.selections.last_mut() {
            current.hold_until = current.hold_until.max(hold_until);
            current.end = current.end.max(hold_until);
        }
    }

    pub(crate) fn set_current_priority(&mut self, priority: i32) {
        self.current_priority = priority;
    }

    pub(crate) fn observe(&mut self, t: f64, candidates: &[FocusCandidate], window: f64) {
        self.observations.retain(|obs| t - obs.time <= window);
        self.observations.extend(
            candidates
                .iter()
                .filter(|candidate| !candidate.synthetic)
                .map(|candidate| Observation {
                    time: t,
                    kind: candidate.kind,
                    position: candidate.position,
                }),
        );
    }

    pub(crate) fn record_sample(&mut self, dropped: usize, fallback: bool) {
        self.stats.samples += 1;
        self.stats.dropped_candidates += dropped;
        if fallback {
            self.stats.fallback_samples += 1;
        }
    }

    /// Close the last selection at the clip end and hand the sequence over.
    pub(crate) fn into_selections(mut self, duration: f64) -> (Vec<FocusSelection>, SelectionStats) {
        if let Some(last) = self.selections.last_mut() {
            last.end = duration;
        }
        (self.selections, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vframe_models::{Extent, ScoredCandidate};

    fn candidate(kind: CandidateKind, x: f64) -> FocusCandidate {
        FocusCandidate::new(0.0, kind, Point::new(x, 500.0), Extent::new(100.0, 100.0), 0.9)
    }

    fn selection(time: f64, kind: CandidateKind) -> FocusSelection {
        FocusSelection::new(
            time,
            ScoredCandidate::new(candidate(kind, 500.0), 100, Vec::new()),
            time + 2.0,
        )
    }

    #[test]
    fn test_push_selection_closes_previous() {
        let mut history = SelectionHistory::new();
        history.push_selection(selection(0.0, CandidateKind::Face));
        history.push_selection(selection(3.0, CandidateKind::Text));

        assert_eq!(history.selections()[0].end, 3.0);
        assert_eq!(history.stats().switches, 1);
        assert_eq!(history.current_kind(), Some(CandidateKind::Text));
    }

    #[test]
    fn test_seen_recently_window_and_radius() {
        let mut history = SelectionHistory::new();
        history.observe(1.0, &[candidate(CandidateKind::Face, 500.0)], 5.0);

        let nearby = candidate(CandidateKind::Face, 540.0);
        let far = candidate(CandidateKind::Face, 900.0);

        assert!(history.seen_recently(&nearby, 2.0, 5.0, 80.0));
        assert!(!history.seen_recently(&far, 2.0, 5.0, 80.0));
        assert!(!history.seen_recently(&nearby, 7.0, 5.0, 80.0));
        assert!(!history.seen_recently(&nearby, 1.0, 5.0, 80.0), "same sample is not history");
    }

    #[test]
    fn test_kind_recently_left() {
        let mut history = SelectionHistory::new();
        history.push_selection(selection(0.0, CandidateKind::Face));
        history.push_selection(selection(4.0, CandidateKind::Text));

        assert!(history.kind_recently_left(CandidateKind::Face, 5.0, 3.0));
        assert!(!history.kind_recently_left(CandidateKind::Face, 8.0, 3.0));
        assert!(!history.kind_recently_left(CandidateKind::Text, 5.0, 3.0));
        assert!(!history.kind_recently_left(CandidateKind::Motion, 5.0, 3.0));
    }

    #[test]
    fn test_extend_hold_is_monotonic() {
        let mut history = SelectionHistory::new();
        history.push_selection(selection(0.0, CandidateKind::Face));
        history.extend_hold(3.0);
        history.extend_hold(2.5);
        assert_eq!(history.current().unwrap().hold_until, 3.0);
    }
}
