//! Configuration for focus selection and camera planning.
//!
//! Centralizes all tunable parameters, avoiding magic numbers scattered
//! throughout the engine and planner. The hysteresis threshold and audio
//! boost were tuned empirically on screencasts and talking-head footage;
//! treat them as starting points, not constants.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::DirectorResult;

/// Configuration for the priority decision engine and camera path planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_config"))]
pub struct DirectorConfig {
    // === Hysteresis ===
    /// Minimum time a selection stays on screen (seconds).
    /// Default: 2.0
    #[validate(range(min = 0.0))]
    pub min_hold_duration: f64,

    /// Priority margin a challenger needs to replace a held focus.
    /// Default: 20
    #[validate(range(min = 0))]
    pub priority_change_threshold: i32,

    // === Camera Motion Constraints ===
    /// Maximum camera pan speed in pixels per second.
    /// Default: 400.0
    #[validate(range(exclusive_min = 0.0))]
    pub max_velocity: f64,

    /// Maximum zoom factor change per second.
    /// Default: 0.5
    #[validate(range(exclusive_min = 0.0))]
    pub max_zoom_speed: f64,

    /// Minimum zoom factor (1.0 = widest crop that fits the frame).
    /// Default: 1.0
    #[validate(range(min = 1.0))]
    pub min_zoom: f64,

    /// Maximum zoom factor.
    /// Default: 2.5
    #[validate(range(min = 1.0))]
    pub max_zoom: f64,

    // === Audio Boosts ===
    /// Boost for candidates whose kind matches the active intent when the
    /// segment carries no boost of its own.
    /// Default: 20
    #[validate(range(min = 0))]
    pub audio_boost_factor: i32,

    /// Boost per transcript keyword found in a text candidate.
    /// Default: 10
    #[validate(range(min = 0))]
    pub keyword_match_boost: i32,

    // === Scoring Terms ===
    /// Window in which a target counts as already seen (seconds).
    /// Default: 5.0
    #[validate(range(min = 0.0))]
    pub novelty_window: f64,

    /// Boost for targets not seen within `novelty_window`.
    /// Default: 15
    #[validate(range(min = 0))]
    pub novelty_boost: i32,

    /// Window after leaving a kind during which it is penalised (seconds).
    /// Default: 3.0
    #[validate(range(min = 0.0))]
    pub recency_window: f64,

    /// Penalty for kinds that were recently the focus target.
    /// Default: 10
    #[validate(range(min = 0))]
    pub recency_penalty: i32,

    /// Boost for candidates of the current focus kind.
    /// Default: 8
    #[validate(range(min = 0))]
    pub focus_inertia: i32,

    /// Maximum centre distance for two candidates to be the same target (pixels).
    /// Default: 80.0
    #[validate(range(min = 0.0))]
    pub target_match_radius: f64,

    // === Sampling & Output ===
    /// Interval between detector samples (seconds).
    /// Default: 1.0
    #[validate(range(exclusive_min = 0.0))]
    pub sample_interval: f64,

    /// Frame rate of the dense trajectory table.
    /// Default: 30.0
    #[validate(range(exclusive_min = 0.0, max = 240.0))]
    pub output_fps: f64,

    /// Clips shorter than this are framed with a single static keyframe (seconds).
    /// Default: 5.0
    #[validate(range(min = 0.0))]
    pub short_clip_threshold: f64,

    /// Fraction of the base crop width a target should fill after zooming.
    /// Default: 0.45
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub target_fill: f64,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            // Hysteresis
            min_hold_duration: 2.0,
            priority_change_threshold: 20,

            // Camera motion
            max_velocity: 400.0,
            max_zoom_speed: 0.5,
            min_zoom: 1.0,
            max_zoom: 2.5,

            // Audio
            audio_boost_factor: 20,
            keyword_match_boost: 10,

            // Scoring
            novelty_window: 5.0,
            novelty_boost: 15,
            recency_window: 3.0,
            recency_penalty: 10,
            focus_inertia: 8,
            target_match_radius: 80.0,

            // Sampling & output
            sample_interval: 1.0,
            output_fps: 30.0,
            short_clip_threshold: 5.0,
            target_fill: 0.45,
        }
    }
}

impl DirectorConfig {
    /// Configuration for screen recordings and tutorials.
    /// Calmer camera, stronger preference for spoken-about UI text.
    pub fn screencast() -> Self {
        Self {
            min_hold_duration: 2.5,
            max_velocity: 300.0,
            max_zoom_speed: 0.35,
            max_zoom: 2.0,
            keyword_match_boost: 15,
            sample_interval: 0.5,
            ..Default::default()
        }
    }

    /// Configuration for a person talking to camera.
    /// Long holds and slow pans; faces rarely need to be re-acquired.
    pub fn talking_head() -> Self {
        Self {
            min_hold_duration: 3.0,
            priority_change_threshold: 25,
            max_velocity: 250.0,
            max_zoom_speed: 0.25,
            focus_inertia: 12,
            ..Default::default()
        }
    }

    /// Validate all fields and cross-field constraints.
    pub fn validated(self) -> DirectorResult<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Clamp a zoom value into the configured range.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Time between two output samples.
    pub fn output_frame_interval(&self) -> f64 {
        1.0 / self.output_fps
    }
}

/// Range checks pass NaN through, so reject non-finite values up front.
fn validate_finite(config: &DirectorConfig) -> Result<(), ValidationError> {
    let fields = [
        config.min_hold_duration,
        config.max_velocity,
        config.max_zoom_speed,
        config.min_zoom,
        config.max_zoom,
        config.novelty_window,
        config.recency_window,
        config.target_match_radius,
        config.sample_interval,
        config.output_fps,
        config.short_clip_threshold,
        config.target_fill,
    ];
    if fields.iter().any(|v| !v.is_finite()) {
        return Err(ValidationError::new("non_finite_value"));
    }
    Ok(())
}

fn validate_config(config: &DirectorConfig) -> Result<(), ValidationError> {
    validate_finite(config)?;
    validate_zoom_range(config)
}

fn validate_zoom_range(config: &DirectorConfig) -> Result<(), ValidationError> {
    if config.min_zoom > config.max_zoom {
        return Err(ValidationError::new("min_zoom_exceeds_max_zoom"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DirectorConfig::default();
        assert_eq!(config.min_hold_duration, 2.0);
        assert_eq!(config.priority_change_threshold, 20);
        assert_eq!(config.audio_boost_factor, 20);
        assert_eq!(config.keyword_match_boost, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        assert!(DirectorConfig::screencast().validated().is_ok());
        assert!(DirectorConfig::talking_head().validated().is_ok());

        let screencast = DirectorConfig::screencast();
        let talking_head = DirectorConfig::talking_head();
        assert!(talking_head.min_hold_duration > screencast.min_hold_duration);
        assert!(talking_head.max_velocity < screencast.max_velocity);
    }

    #[test]
    fn test_rejects_inverted_zoom_range() {
        let config = DirectorConfig {
            min_zoom: 2.0,
            max_zoom: 1.5,
            ..Default::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_rejects_zoom_below_one() {
        let config = DirectorConfig {
            min_zoom: 0.8,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_velocity() {
        let config = DirectorConfig {
            max_velocity: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_values() {
        for config in [
            DirectorConfig {
                min_zoom: f64::NAN,
                ..Default::default()
            },
            DirectorConfig {
                max_velocity: f64::INFINITY,
                ..Default::default()
            },
            DirectorConfig {
                min_hold_duration: f64::NAN,
                ..Default::default()
            },
            DirectorConfig {
                output_fps: f64::NAN,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                config.validated(),
                Err(crate::error::DirectorError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: DirectorConfig =
            serde_json::from_str(r#"{"min_hold_duration": 1.5, "max_zoom": 3.0}"#).unwrap();
        assert_eq!(config.min_hold_duration, 1.5);
        assert_eq!(config.max_zoom, 3.0);
        assert_eq!(config.priority_change_threshold, 20);
    }

    #[test]
    fn test_clamp_zoom() {
        let config = DirectorConfig::default();
        assert_eq!(config.clamp_zoom(0.5), 1.0);
        assert_eq!(config.clamp_zoom(4.0), 2.5);
        assert_eq!(config.clamp_zoom(1.7), 1.7);
    }
}
