//! Configuration document.
//!
//! The file is JSON; the options this tool reads live under the
//! `mp3_generation` section and every one of them has a default, so a sparse
//! file is fine. Only a missing or unparseable file is an error.

use crate::error::ConfigError;
use crate::step_types::{Position, SaveMethod, StepSpec};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mp3_generation: GenerationConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub app_window_title: String,
    pub steps: Vec<StepSpec>,
    pub skip_existing: bool,
    pub delay_between_items: f64,
    pub startup_delay: f64,
    pub coordinate_offset: [i32; 2],
    pub coordinate_scale: f64,
    pub use_dpi_scaling: bool,
    pub save_method: SaveMethod,
    pub save_button_position: Option<Position>,
    pub wait_time_after_save: f64,
    pub save_verify_timeout: f64,
    pub manual_focus_delay: f64,
    // Used only by the built-in sequence when `steps` is empty.
    pub input_field_position: Option<Position>,
    pub generate_button_position: Option<Position>,
    pub wait_time_after_generate: f64,
    pub type_interval: f64,
    pub action_pause: f64,
    /// Abort when the pointer sits in a screen corner before an input.
    pub fail_safe: bool,
    pub stop_hotkey: String,
    pub catalog_dir: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            app_window_title: String::new(),
            steps: Vec::new(),
            skip_existing: false,
            delay_between_items: 1.0,
            startup_delay: 5.0,
            coordinate_offset: [0, 0],
            coordinate_scale: 1.0,
            use_dpi_scaling: false,
            save_method: SaveMethod::Button,
            save_button_position: None,
            wait_time_after_save: 1.0,
            save_verify_timeout: 0.5,
            manual_focus_delay: 5.0,
            input_field_position: None,
            generate_button_position: None,
            wait_time_after_generate: 3.0,
            type_interval: 0.1,
            action_pause: 0.5,
            fail_safe: true,
            stop_hotkey: "f3".to_string(),
            catalog_dir: "data".to_string(),
        }
    }
}

/// Converts a configured number of seconds into a `Duration`, treating
/// negative or non-finite values as zero and saturating values too large to
/// represent.
pub fn seconds(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
