//! Engine configuration.
//!
//! Every tunable constant of the turn engine lives in [`GameConfig`]. Values can be
//! loaded from JSON; keys that are missing take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Match count at which a candidate prefix is always accepted.
pub const DEFAULT_MAX_COUNT_FOR_FULL_PROBABILITY: u32 = 100;

/// Seconds per turn.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 15;

/// Seconds left at which the countdown is shown as a warning.
pub const DEFAULT_TIMER_WARNING_SECS: u32 = 5;

/// Difficulty gained per accepted word, and lost per rejected suffix draw.
pub const DEFAULT_DIFFICULTY_STEP: f64 = 0.2;

/// Countdown tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Consecutive mistakes that end the game.
pub const DEFAULT_MAX_FAILS: u32 = 5;

/// Tunable engine constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub max_count_for_full_probability: u32,
    pub time_limit_secs: u32,
    pub timer_warning_secs: u32,
    pub difficulty_step: f64,
    pub tick_interval_ms: u64,
    pub max_fails: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_count_for_full_probability: DEFAULT_MAX_COUNT_FOR_FULL_PROBABILITY,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            timer_warning_secs: DEFAULT_TIMER_WARNING_SECS,
            difficulty_step: DEFAULT_DIFFICULTY_STEP,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            max_fails: DEFAULT_MAX_FAILS,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigError::new(format!("invalid JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&contents)
    }

    /// Check that the values describe a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit_secs == 0 {
            return Err(ConfigError::new("time_limit_secs must be positive"));
        }
        if self.timer_warning_secs > self.time_limit_secs {
            return Err(ConfigError::new("timer_warning_secs cannot exceed time_limit_secs"));
        }
        if self.max_fails == 0 {
            return Err(ConfigError::new("max_fails must be positive"));
        }
        if !self.difficulty_step.is_finite() || self.difficulty_step <= 0.0 {
            return Err(ConfigError::new("difficulty_step must be a positive number"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::new("tick_interval_ms must be positive"));
        }
        if self.max_count_for_full_probability == 0 {
            return Err(ConfigError::new("max_count_for_full_probability must be positive"));
        }
        Ok(())
    }

    /// Tick interval as a `Duration`.
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }
}
