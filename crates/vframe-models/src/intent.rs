//! Time-ranged semantic annotations derived from the transcript.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::candidate::CandidateKind;
use crate::error::{ModelError, ModelResult};

/// Speech intent classified by the external transcript segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// "look at this", "here you can see"
    Demonstrative,
    /// Talking through source code
    Code,
    /// Clicking, typing, navigating an interface
    UiInteraction,
    /// Presenting a physical product
    ProductFocus,
    /// Speaker explaining to camera
    Explanation,
    #[default]
    General,
}

impl IntentKind {
    /// Candidate kinds that receive the audio boost while this intent is active.
    pub fn boosted_kinds(&self) -> &'static [CandidateKind] {
        match self {
            IntentKind::Demonstrative => {
                &[CandidateKind::Text, CandidateKind::Cursor, CandidateKind::Ui]
            }
            IntentKind::Code => &[CandidateKind::Text],
            IntentKind::UiInteraction => &[CandidateKind::Ui, CandidateKind::Cursor],
            IntentKind::ProductFocus => &[CandidateKind::Object, CandidateKind::Saliency],
            IntentKind::Explanation => &[CandidateKind::Face],
            IntentKind::General => &[],
        }
    }

    /// Whether a candidate kind matches this intent.
    pub fn matches(&self, kind: CandidateKind) -> bool {
        self.boosted_kinds().contains(&kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Demonstrative => "demonstrative",
            IntentKind::Code => "code",
            IntentKind::UiInteraction => "ui_interaction",
            IntentKind::ProductFocus => "product_focus",
            IntentKind::Explanation => "explanation",
            IntentKind::General => "general",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intent annotation covering `[start, end)` on the source timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AudioIntentSegment {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub intent: IntentKind,
    /// Keywords spoken in this segment, matched against on-screen text
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    /// Boost assigned by the segmenter; zero means "use the configured default"
    #[serde(default)]
    pub priority_boost: i32,
}

impl AudioIntentSegment {
    pub fn new(start: f64, end: f64, intent: IntentKind) -> Self {
        Self {
            start,
            end,
            intent,
            keywords: BTreeSet::new(),
            priority_boost: 0,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_boost(mut self, boost: i32) -> Self {
        self.priority_boost = boost;
        self
    }

    /// Whether `t` falls inside `[start, end)`.
    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() || self.end <= self.start {
            return Err(ModelError::InvalidTimeRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_affinity() {
        assert!(IntentKind::Demonstrative.matches(CandidateKind::Text));
        assert!(!IntentKind::Demonstrative.matches(CandidateKind::Motion));
        assert!(IntentKind::Explanation.matches(CandidateKind::Face));
        assert!(IntentKind::General.boosted_kinds().is_empty());
    }

    #[test]
    fn test_segment_contains_half_open() {
        let segment = AudioIntentSegment::new(2.0, 6.0, IntentKind::Code);
        assert!(segment.contains(2.0));
        assert!(segment.contains(5.999));
        assert!(!segment.contains(6.0));
        assert!(!segment.contains(1.999));
    }

    #[test]
    fn test_segment_validate() {
        assert!(AudioIntentSegment::new(1.0, 2.0, IntentKind::General).validate().is_ok());
        assert!(AudioIntentSegment::new(2.0, 2.0, IntentKind::General).validate().is_err());
        assert!(AudioIntentSegment::new(f64::NAN, 2.0, IntentKind::General)
            .validate()
            .is_err());
    }

    #[test]
    fn test_segment_deserialize() {
        let json = r#"{"start":0.0,"end":4.0,"intent":"ui_interaction","keywords":["save","login"]}"#;
        let segment: AudioIntentSegment = serde_json::from_str(json).unwrap();
        assert_eq!(segment.intent, IntentKind::UiInteraction);
        assert_eq!(segment.priority_boost, 0);
        assert!(segment.keywords.contains("login"));
    }
}
