//! Priority scoring for focus candidates.
//!
//! Every term is an integer so two runs over the same input produce the same
//! ranking bit for bit. Each non-zero term leaves a reason string on the
//! scored candidate, which is what the engine logs when it switches focus.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use vframe_models::{AudioIntentSegment, FocusCandidate, FrameGeometry, ScoredCandidate};

use super::history::SelectionHistory;
use crate::config::DirectorConfig;

/// Maximum bonus for a candidate at the exact frame centre.
const MAX_CENTRALITY_BONUS: f64 = 5.0;

/// Maximum bonus for large candidates.
const MAX_SIZE_BONUS: f64 = 10.0;

/// Linear extent (relative to the frame) that earns the full size bonus.
const FULL_SIZE_FRACTION: f64 = 0.5;

/// Bonus at confidence 1.0.
const MAX_CONFIDENCE_BONUS: f64 = 5.0;

/// Reason attached to the synthetic frame-centre candidate.
pub const FALLBACK_REASON: &str = "fallback:frame_center";

/// Everything a score depends on besides the candidate itself.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    /// Sampled time being decided
    pub time: f64,
    /// Transcript segment active at `time`
    pub segment: Option<&'a AudioIntentSegment>,
    /// Decisions made before `time`
    pub history: &'a SelectionHistory,
}

/// Pure scoring function over candidate, context and configuration.
#[derive(Debug, Clone, Copy)]
pub struct PriorityScorer<'a> {
    config: &'a DirectorConfig,
    geometry: &'a FrameGeometry,
}

impl<'a> PriorityScorer<'a> {
    pub fn new(config: &'a DirectorConfig, geometry: &'a FrameGeometry) -> Self {
        Self { config, geometry }
    }

    /// Score one candidate.
    pub fn score(&self, candidate: &FocusCandidate, ctx: &ScoringContext<'_>) -> ScoredCandidate {
        let base = candidate.base_priority();

        if candidate.synthetic {
            return ScoredCandidate::new(candidate.clone(), base, vec![FALLBACK_REASON.to_string()]);
        }

        let mut total = base;
        let mut reasons = vec![format!("base:{}", base)];
        let mut add = |value: i32, reason: String| {
            if value != 0 {
                total = total.saturating_add(value);
                reasons.push(reason);
            }
        };

        if let Some(segment) = ctx.segment {
            let boost = self.audio_boost(candidate, segment);
            add(boost, format!("audio:{:+}({})", boost, segment.intent));

            for keyword in matched_keywords(candidate, segment) {
                let boost = self.config.keyword_match_boost;
                add(boost, format!("keyword:{:+}({})", boost, keyword));
            }
        }

        let seen = ctx.history.seen_recently(
            candidate,
            ctx.time,
            self.config.novelty_window,
            self.config.target_match_radius,
        );
        if !seen {
            let boost = self.config.novelty_boost;
            add(boost, format!("novelty:{:+}", boost));
        }

        if ctx
            .history
            .kind_recently_left(candidate.kind, ctx.time, self.config.recency_window)
        {
            let penalty = -self.config.recency_penalty;
            add(penalty, format!("recency:{:+}", penalty));
        }

        let centrality = self.centrality_bonus(candidate);
        add(centrality, format!("centrality:{:+}", centrality));

        let size = self.size_bonus(candidate);
        add(size, format!("size:{:+}", size));

        let confidence = confidence_bonus(candidate);
        add(confidence, format!("confidence:{:+}", confidence));

        if ctx.history.current_kind() == Some(candidate.kind) {
            let inertia = self.config.focus_inertia;
            add(inertia, format!("inertia:{:+}", inertia));
        }

        ScoredCandidate::new(candidate.clone(), total, reasons)
    }

    /// Boost when the candidate kind matches the active intent.
    fn audio_boost(&self, candidate: &FocusCandidate, segment: &AudioIntentSegment) -> i32 {
        if !segment.intent.matches(candidate.kind) {
            return 0;
        }
        if segment.priority_boost > 0 {
            segment.priority_boost
        } else {
            self.config.audio_boost_factor
        }
    }

    /// 0..=5, linear in distance from the frame centre.
    fn centrality_bonus(&self, candidate: &FocusCandidate) -> i32 {
        let (cx, cy) = self.geometry.center();
        let half_diagonal = (cx * cx + cy * cy).sqrt();
        if half_diagonal <= 0.0 {
            return 0;
        }
        let distance = ((candidate.position.x - cx).powi(2) + (candidate.position.y - cy).powi(2))
            .sqrt();
        let closeness = 1.0 - (distance / half_diagonal).min(1.0);
        (MAX_CENTRALITY_BONUS * closeness).round() as i32
    }

    /// 0..=10, saturating once the candidate spans half the frame.
    fn size_bonus(&self, candidate: &FocusCandidate) -> i32 {
        let frame_area = self.geometry.width() * self.geometry.height();
        if frame_area <= 0.0 || candidate.extent.is_point_like() {
            return 0;
        }
        let linear = (candidate.extent.area() / frame_area).sqrt() / FULL_SIZE_FRACTION;
        (MAX_SIZE_BONUS * linear.min(1.0)).round() as i32
    }
}

/// 0..=5, linear in detector confidence.
fn confidence_bonus(candidate: &FocusCandidate) -> i32 {
    (MAX_CONFIDENCE_BONUS * candidate.confidence.clamp(0.0, 1.0)).round() as i32
}

/// Distinct segment keywords found in the candidate's text, case-insensitively.
fn matched_keywords(candidate: &FocusCandidate, segment: &AudioIntentSegment) -> Vec<String> {
    if !candidate.kind.is_textual() {
        return Vec::new();
    }
    let Some(text) = candidate.text_content.as_deref() else {
        return Vec::new();
    };
    let text = text.to_lowercase();

    let keywords: BTreeSet<String> = segment
        .keywords
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect();

    keywords
        .into_iter()
        .filter(|keyword| text.contains(keyword.as_str()))
        .collect()
}

/// Total order over scored candidates; `Greater` means `a` is preferred.
///
/// Final priority, then confidence, then extent area, then kind order.
/// Callers resolve a remaining `Equal` in favour of the earlier candidate.
pub fn compare_scored(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    a.final_priority
        .cmp(&b.final_priority)
        .then_with(|| a.candidate.confidence.total_cmp(&b.candidate.confidence))
        .then_with(|| a.candidate.extent.area().total_cmp(&b.candidate.extent.area()))
        .then_with(|| {
            b.candidate
                .kind
                .tie_break_rank()
                .cmp(&a.candidate.kind.tie_break_rank())
        })
}

/// Best candidate under [`compare_scored`], first-seen on exact ties.
pub fn select_winner(scored: &[ScoredCandidate]) -> Option<&ScoredCandidate> {
    scored.iter().fold(None, |best, candidate| match best {
        Some(current) if compare_scored(candidate, current) != Ordering::Greater => Some(current),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vframe_models::{AspectRatio, CandidateKind, Extent, IntentKind, Point};

    fn geometry() -> FrameGeometry {
        FrameGeometry::new(1920, 1080, AspectRatio::PORTRAIT)
    }

    fn candidate(kind: CandidateKind, x: f64, y: f64, size: f64, confidence: f64) -> FocusCandidate {
        FocusCandidate::new(2.0, kind, Point::new(x, y), Extent::new(size, size), confidence)
    }

    fn score(candidate: &FocusCandidate, segment: Option<&AudioIntentSegment>) -> ScoredCandidate {
        let config = DirectorConfig::default();
        let geometry = geometry();
        let history = SelectionHistory::new();
        let scorer = PriorityScorer::new(&config, &geometry);
        scorer.score(
            candidate,
            &ScoringContext {
                time: 2.0,
                segment,
                history: &history,
            },
        )
    }

    #[test]
    fn test_score_terms_without_audio() {
        // Centred, 432px square (9% of the frame area), full confidence
        let face = candidate(CandidateKind::Face, 960.0, 540.0, 432.0, 1.0);
        let scored = score(&face, None);

        // 100 base + 15 novelty + 5 centrality + 6 size + 5 confidence
        assert_eq!(scored.final_priority, 131);
        assert_eq!(
            scored.reasons,
            vec!["base:100", "novelty:+15", "centrality:+5", "size:+6", "confidence:+5"]
        );
    }

    #[test]
    fn test_audio_and_keyword_boosts() {
        let segment = AudioIntentSegment::new(0.0, 6.0, IntentKind::Demonstrative)
            .with_keywords(["Login", "password", "login", "  "]);
        let text = candidate(CandidateKind::Text, 960.0, 540.0, 0.0, 0.8)
            .with_text("Enter your LOGIN and Password");

        let scored = score(&text, Some(&segment));
        assert!(scored.reasons.contains(&"audio:+20(demonstrative)".to_string()));
        assert!(scored.reasons.contains(&"keyword:+10(login)".to_string()));
        assert!(scored.reasons.contains(&"keyword:+10(password)".to_string()));
        // 90 + 20 + 10 + 10 + 15 + 5 + 0 + 4
        assert_eq!(scored.final_priority, 154);
    }

    #[test]
    fn test_segment_boost_overrides_default() {
        let segment = AudioIntentSegment::new(0.0, 6.0, IntentKind::Explanation).with_boost(35);
        let face = candidate(CandidateKind::Face, 960.0, 540.0, 0.0, 1.0);
        let scored = score(&face, Some(&segment));
        assert!(scored.reasons.contains(&"audio:+35(explanation)".to_string()));
    }

    #[test]
    fn test_keywords_ignored_for_non_text_kinds() {
        let segment =
            AudioIntentSegment::new(0.0, 6.0, IntentKind::General).with_keywords(["logo"]);
        let object = candidate(CandidateKind::Object, 960.0, 540.0, 0.0, 1.0).with_text("logo");
        let scored = score(&object, Some(&segment));
        assert!(!scored.reasons.iter().any(|r| r.starts_with("keyword")));
    }

    #[test]
    fn test_fallback_scores_zero() {
        let fallback = FocusCandidate::frame_center(2.0, 1920, 1080);
        let scored = score(&fallback, None);
        assert_eq!(scored.final_priority, 0);
        assert_eq!(scored.reasons, vec![FALLBACK_REASON]);
    }

    #[test]
    fn test_score_is_pure() {
        let face = candidate(CandidateKind::Face, 300.0, 200.0, 120.0, 0.7);
        assert_eq!(score(&face, None), score(&face, None));
    }

    #[test]
    fn test_edge_candidate_gets_no_centrality() {
        let corner = candidate(CandidateKind::Motion, 0.0, 0.0, 0.0, 0.0);
        let scored = score(&corner, None);
        assert!(!scored.reasons.iter().any(|r| r.starts_with("centrality")));
        assert_eq!(scored.final_priority, 75 + 15);
    }

    #[test]
    fn test_tie_breaks() {
        let scored = |kind, confidence, size| {
            ScoredCandidate::new(candidate(kind, 0.0, 0.0, size, confidence), 100, Vec::new())
        };

        let high_conf = scored(CandidateKind::Motion, 0.9, 10.0);
        let low_conf = scored(CandidateKind::Face, 0.8, 10.0);
        assert_eq!(select_winner(&[low_conf.clone(), high_conf.clone()]), Some(&high_conf));

        let big = scored(CandidateKind::Motion, 0.8, 50.0);
        assert_eq!(select_winner(&[low_conf.clone(), big.clone()]), Some(&big));

        let text = scored(CandidateKind::Text, 0.8, 10.0);
        assert_eq!(select_winner(&[text.clone(), low_conf.clone()]), Some(&low_conf));
    }

    #[test]
    fn test_exact_tie_first_seen_wins() {
        let first = ScoredCandidate::new(
            candidate(CandidateKind::Face, 100.0, 100.0, 10.0, 0.8),
            100,
            Vec::new(),
        );
        let second = ScoredCandidate::new(
            candidate(CandidateKind::Face, 900.0, 100.0, 10.0, 0.8),
            100,
            Vec::new(),
        );
        let scored = [first.clone(), second];
        assert_eq!(select_winner(&scored), Some(&first));
        assert!(select_winner(&[]).is_none());
    }
}
