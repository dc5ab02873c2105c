//! Worker configuration.

use std::path::PathBuf;
use std::str::FromStr;

use serde_json::Value;
use vframe_director::DirectorConfig;
use vframe_models::AspectRatio;

use crate::error::{WorkerError, WorkerResult};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Director settings before per-job overrides
    pub director: DirectorConfig,
    /// Output aspect ratio for jobs that don't set one
    pub target_aspect: AspectRatio,
    /// Where to write the Prometheus exposition after a job, if anywhere
    pub metrics_path: Option<PathBuf>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            director: DirectorConfig::default(),
            target_aspect: AspectRatio::PORTRAIT,
            metrics_path: None,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    ///
    /// `VFRAME_PRESET` (`default`, `screencast`, `talking_head`) picks the
    /// starting point; `VFRAME_<FIELD>` variables override single fields.
    /// `VFRAME_TARGET_ASPECT` (`W:H`) sets the aspect for jobs without one.
    /// Unparseable values are ignored in favour of the preset value.
    pub fn from_env() -> WorkerResult<Self> {
        let preset = std::env::var("VFRAME_PRESET").unwrap_or_else(|_| "default".to_string());
        let mut director = preset_config(&preset)?;
        apply_env_overrides(&mut director);

        let target_aspect = match std::env::var("VFRAME_TARGET_ASPECT") {
            Ok(raw) if !raw.trim().is_empty() => parse_aspect(&raw)?,
            _ => AspectRatio::PORTRAIT,
        };

        Ok(Self {
            director,
            target_aspect,
            metrics_path: std::env::var("VFRAME_METRICS_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        })
    }

    /// Director config for one job: fields present in `overrides` replace the
    /// environment-derived values, everything else is kept.
    pub fn director_for(&self, overrides: Option<&Value>) -> WorkerResult<DirectorConfig> {
        let Some(overrides) = overrides else {
            return Ok(self.director.clone());
        };
        let Value::Object(overrides) = overrides else {
            return Err(WorkerError::invalid_job("config must be a JSON object"));
        };

        let mut merged = serde_json::to_value(&self.director)?;
        if let Value::Object(base) = &mut merged {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        }
        Ok(serde_json::from_value(merged)?)
    }
}

fn preset_config(name: &str) -> WorkerResult<DirectorConfig> {
    match name.to_lowercase().as_str() {
        "default" | "" => Ok(DirectorConfig::default()),
        "screencast" => Ok(DirectorConfig::screencast()),
        "talking_head" => Ok(DirectorConfig::talking_head()),
        other => Err(WorkerError::config_error(format!("unknown preset: {}", other))),
    }
}

fn parse_aspect(raw: &str) -> WorkerResult<AspectRatio> {
    raw.parse()
        .map_err(|e| WorkerError::config_error(format!("VFRAME_TARGET_ASPECT: {}", e)))
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn apply_env_overrides(config: &mut DirectorConfig) {
    macro_rules! override_field {
        ($field:ident, $key:literal) => {
            if let Some(value) = env_parse($key) {
                config.$field = value;
            }
        };
    }

    override_field!(min_hold_duration, "VFRAME_MIN_HOLD_DURATION");
    override_field!(priority_change_threshold, "VFRAME_PRIORITY_CHANGE_THRESHOLD");
    override_field!(max_velocity, "VFRAME_MAX_VELOCITY");
    override_field!(max_zoom_speed, "VFRAME_MAX_ZOOM_SPEED");
    override_field!(min_zoom, "VFRAME_MIN_ZOOM");
    override_field!(max_zoom, "VFRAME_MAX_ZOOM");
    override_field!(audio_boost_factor, "VFRAME_AUDIO_BOOST_FACTOR");
    override_field!(keyword_match_boost, "VFRAME_KEYWORD_MATCH_BOOST");
    override_field!(novelty_window, "VFRAME_NOVELTY_WINDOW");
    override_field!(novelty_boost, "VFRAME_NOVELTY_BOOST");
    override_field!(recency_window, "VFRAME_RECENCY_WINDOW");
    override_field!(recency_penalty, "VFRAME_RECENCY_PENALTY");
    override_field!(focus_inertia, "VFRAME_FOCUS_INERTIA");
    override_field!(target_match_radius, "VFRAME_TARGET_MATCH_RADIUS");
    override_field!(sample_interval, "VFRAME_SAMPLE_INTERVAL");
    override_field!(output_fps, "VFRAME_OUTPUT_FPS");
    override_field!(short_clip_threshold, "VFRAME_SHORT_CLIP_THRESHOLD");
    override_field!(target_fill, "VFRAME_TARGET_FILL");
}
