//! Scored candidates and the focus selections chosen from them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::candidate::FocusCandidate;

/// A candidate together with its fused priority and the terms that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredCandidate {
    pub candidate: FocusCandidate,
    pub final_priority: i32,
    /// Human-readable score terms in evaluation order, e.g. `"audio:+20(demonstrative)"`
    pub reasons: Vec<String>,
}

impl ScoredCandidate {
    pub fn new(candidate: FocusCandidate, final_priority: i32, reasons: Vec<String>) -> Self {
        Self {
            candidate,
            final_priority,
            reasons,
        }
    }
}

/// The engine's chosen focus target for the window `[time, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FocusSelection {
    /// Time the target was selected
    pub time: f64,
    pub target: ScoredCandidate,
    /// Earliest time another target may replace this one without a priority margin
    pub hold_until: f64,
    /// End of the window this selection covers (start of the next one, or clip end)
    pub end: f64,
}

impl FocusSelection {
    pub fn new(time: f64, target: ScoredCandidate, hold_until: f64) -> Self {
        Self {
            time,
            target,
            hold_until,
            end: hold_until,
        }
    }

    /// Length of the covered window.
    pub fn span(&self) -> f64 {
        self.end - self.time
    }

    /// Whether this selection is the synthetic frame-centre fallback.
    pub fn is_fallback(&self) -> bool {
        self.target.candidate.synthetic
    }

    pub fn priority(&self) -> i32 {
        self.target.final_priority
    }
}
