//! Focus candidates produced by content detectors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{ModelError, ModelResult};

/// Kind of detected point of interest.
///
/// Declaration order is the tie-break order used when two candidates score
/// identically: earlier variants win.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    Face,
    Text,
    Cursor,
    Ui,
    Motion,
    Object,
    Saliency,
}

impl CandidateKind {
    /// All kinds in tie-break order.
    pub const ALL: [CandidateKind; 7] = [
        CandidateKind::Face,
        CandidateKind::Text,
        CandidateKind::Cursor,
        CandidateKind::Ui,
        CandidateKind::Motion,
        CandidateKind::Object,
        CandidateKind::Saliency,
    ];

    /// Fixed base priority for this kind.
    pub fn base_priority(&self) -> i32 {
        match self {
            CandidateKind::Face => 100,
            CandidateKind::Text => 90,
            CandidateKind::Cursor => 85,
            CandidateKind::Ui => 80,
            CandidateKind::Motion => 75,
            CandidateKind::Object => 65,
            CandidateKind::Saliency => 50,
        }
    }

    /// Position in the tie-break order (0 = strongest).
    pub fn tie_break_rank(&self) -> u8 {
        *self as u8
    }

    /// Whether candidates of this kind may carry `text_content`.
    pub fn is_textual(&self) -> bool {
        matches!(self, CandidateKind::Text | CandidateKind::Ui)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateKind::Face => "face",
            CandidateKind::Text => "text",
            CandidateKind::Cursor => "cursor",
            CandidateKind::Ui => "ui",
            CandidateKind::Motion => "motion",
            CandidateKind::Object => "object",
            CandidateKind::Saliency => "saliency",
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CandidateKind {
    type Err = CandidateKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CandidateKind::ALL
            .iter()
            .find(|kind| kind.as_str() == s.to_lowercase())
            .copied()
            .ok_or_else(|| CandidateKindParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown candidate kind: {0}")]
pub struct CandidateKindParseError(String);

/// A pixel position in source-frame space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Bounding size of a candidate. Zero for point-like candidates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Extent {
    pub w: f64,
    pub h: f64,
}

impl Extent {
    pub const ZERO: Extent = Extent { w: 0.0, h: 0.0 };

    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn is_point_like(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

/// A detected point of interest at a sampled time.
///
/// Created by a detector for one sampled frame and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FocusCandidate {
    /// Timestamp in seconds on the source timeline
    pub time: f64,
    pub kind: CandidateKind,
    /// Centre of the candidate in source pixels
    pub position: Point,
    #[serde(default)]
    pub extent: Extent,
    /// Detector confidence (0.0-1.0)
    pub confidence: f64,
    /// Explicit base priority; the kind's table value applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_priority: Option<i32>,
    /// Recognised text, only meaningful for text and UI kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    /// Set on the frame-centre fallback emitted when nothing was detected
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

impl FocusCandidate {
    /// Create a candidate with the kind's default base priority.
    pub fn new(
        time: f64,
        kind: CandidateKind,
        position: Point,
        extent: Extent,
        confidence: f64,
    ) -> Self {
        Self {
            time,
            kind,
            position,
            extent,
            confidence,
            base_priority: None,
            text_content: None,
            synthetic: false,
        }
    }

    /// Attach recognised text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Override the base priority.
    pub fn with_base_priority(mut self, priority: i32) -> Self {
        self.base_priority = Some(priority);
        self
    }

    /// Synthetic saliency candidate at the frame centre with zero base priority.
    pub fn frame_center(time: f64, frame_width: u32, frame_height: u32) -> Self {
        Self {
            time,
            kind: CandidateKind::Saliency,
            position: Point::new(frame_width as f64 / 2.0, frame_height as f64 / 2.0),
            extent: Extent::ZERO,
            confidence: 1.0,
            base_priority: Some(0),
            text_content: None,
            synthetic: true,
        }
    }

    /// Effective base priority.
    pub fn base_priority(&self) -> i32 {
        self.base_priority.unwrap_or_else(|| self.kind.base_priority())
    }

    /// Check that every numeric field is usable.
    pub fn validate(&self) -> ModelResult<()> {
        if !self.time.is_finite() {
            return Err(ModelError::non_finite("time"));
        }
        if !self.position.is_finite() {
            return Err(ModelError::non_finite("position"));
        }
        if !self.extent.w.is_finite() || !self.extent.h.is_finite() {
            return Err(ModelError::non_finite("extent"));
        }
        if self.extent.w < 0.0 || self.extent.h < 0.0 {
            return Err(ModelError::NegativeExtent {
                w: self.extent.w,
                h: self.extent.h,
            });
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ModelError::ConfidenceOutOfRange(self.confidence));
        }
        Ok(())
    }

    /// Whether two candidates denote the same on-screen target.
    pub fn same_target(&self, other: &FocusCandidate, match_radius: f64) -> bool {
        self.kind == other.kind
            && self.synthetic == other.synthetic
            && self.position.distance(&other.position) <= match_radius
    }
}

/// All candidates reported by the detectors for one sampled time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct CandidateSample {
    /// Sample timestamp in seconds
    pub time: f64,
    #[serde(default)]
    pub candidates: Vec<FocusCandidate>,
}

impl CandidateSample {
    pub fn new(time: f64, candidates: Vec<FocusCandidate>) -> Self {
        Self { time, candidates }
    }

    pub fn empty(time: f64) -> Self {
        Self {
            time,
            candidates: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(x: f64, y: f64) -> FocusCandidate {
        FocusCandidate::new(
            0.0,
            CandidateKind::Face,
            Point::new(x, y),
            Extent::new(200.0, 200.0),
            0.9,
        )
    }

    #[test]
    fn test_base_priority_table() {
        assert_eq!(CandidateKind::Face.base_priority(), 100);
        assert_eq!(CandidateKind::Text.base_priority(), 90);
        assert_eq!(CandidateKind::Motion.base_priority(), 75);
        assert_eq!(CandidateKind::Saliency.base_priority(), 50);

        let priorities: Vec<i32> = CandidateKind::ALL.iter().map(|k| k.base_priority()).collect();
        assert!(priorities.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_tie_break_rank_follows_declaration() {
        assert!(CandidateKind::Face.tie_break_rank() < CandidateKind::Text.tie_break_rank());
        assert!(CandidateKind::Cursor.tie_break_rank() < CandidateKind::Ui.tie_break_rank());
        assert!(CandidateKind::Object.tie_break_rank() < CandidateKind::Saliency.tie_break_rank());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("face".parse::<CandidateKind>().unwrap(), CandidateKind::Face);
        assert_eq!("UI".parse::<CandidateKind>().unwrap(), CandidateKind::Ui);
        assert!("speaker".parse::<CandidateKind>().is_err());
    }

    #[test]
    fn test_frame_center_fallback() {
        let fallback = FocusCandidate::frame_center(1.0, 1920, 1080);
        assert_eq!(fallback.base_priority(), 0);
        assert_eq!(fallback.kind, CandidateKind::Saliency);
        assert_eq!(fallback.position, Point::new(960.0, 540.0));
        assert!(fallback.synthetic);
        assert!(fallback.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed() {
        let mut bad = face(100.0, 100.0);
        bad.confidence = 1.2;
        assert!(matches!(bad.validate(), Err(ModelError::ConfidenceOutOfRange(_))));

        let mut bad = face(f64::NAN, 100.0);
        bad.confidence = 0.5;
        assert!(matches!(bad.validate(), Err(ModelError::NonFinite { .. })));

        let mut bad = face(100.0, 100.0);
        bad.extent = Extent::new(-1.0, 10.0);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_same_target() {
        let a = face(500.0, 400.0);
        let b = face(540.0, 420.0);
        let c = face(900.0, 400.0);

        assert!(a.same_target(&b, 80.0));
        assert!(!a.same_target(&c, 80.0));

        let mut text = b.clone();
        text.kind = CandidateKind::Text;
        assert!(!a.same_target(&text, 80.0));
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"time":1.5,"kind":"text","position":{"x":10.0,"y":20.0},"confidence":0.7}"#;
        let candidate: FocusCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.extent, Extent::ZERO);
        assert_eq!(candidate.base_priority(), 90);
        assert!(!candidate.synthetic);
        assert!(candidate.text_content.is_none());
    }
}
