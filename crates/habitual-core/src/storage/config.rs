//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Location of the habit store
//! - Decay threshold and step
//! - Weight steps for completion and feedback
//! - Default report format and timezone
//!
//! Configuration is stored at `~/.config/habitual/config.toml`.

use chrono::{FixedOffset, Local, Offset};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::engine::EngineConfig;
use crate::error::{ConfigError, Result};
use crate::report::ReportFormat;

/// Habit store location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Defaults to `habits.json` in the data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Missed-deadline decay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayConfig {
    #[serde(default = "default_threshold_hours")]
    pub threshold_hours: u32,
    #[serde(default = "default_decay_step")]
    pub step: f64,
    /// Only decay habits that currently hold a streak.
    #[serde(default = "default_true")]
    pub require_streak: bool,
}

/// Weight adjustments per event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_completion_step")]
    pub completion_step: f64,
    #[serde(default = "default_positive_step")]
    pub positive_step: f64,
    #[serde(default = "default_negative_step")]
    pub negative_step: f64,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Minutes east of UTC used for "today" (`330` for UTC+5:30). Local
    /// offset when unset.
    #[serde(default)]
    pub timezone_offset_minutes: Option<i32>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/habitual/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub decay: DecayConfig,
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

// Default functions
fn default_threshold_hours() -> u32 {
    24
}
fn default_decay_step() -> f64 {
    0.05
}
fn default_true() -> bool {
    true
}
fn default_completion_step() -> f64 {
    0.10
}
fn default_positive_step() -> f64 {
    0.15
}
fn default_negative_step() -> f64 {
    0.10
}
fn default_format() -> String {
    "text".into()
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            threshold_hours: default_threshold_hours(),
            step: default_decay_step(),
            require_streak: true,
        }
    }
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            completion_step: default_completion_step(),
            positive_step: default_positive_step(),
            negative_step: default_negative_step(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            timezone_offset_minutes: None,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => {
                        return Err(invalid("cannot replace a whole section".into()));
                    }
                    // Unset optionals take numbers or `null` as JSON, anything else as text.
                    serde_json::Value::Null => serde_json::from_str(value)
                        .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or create the default config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    ///
    /// An existing file that cannot be read is reported, never replaced.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                tracing::info!(path = %path.display(), "wrote default config");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or fails validation. `self` is left unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.decay.threshold_hours == 0 {
            return Err(invalid("decay.threshold_hours", "must be at least 1"));
        }
        for (key, step) in [
            ("decay.step", self.decay.step),
            ("weights.completion_step", self.weights.completion_step),
            ("weights.positive_step", self.weights.positive_step),
            ("weights.negative_step", self.weights.negative_step),
        ] {
            if !step.is_finite() || step < 0.0 {
                return Err(invalid(key, "must be a non-negative number"));
            }
        }
        if self.display.default_format.parse::<ReportFormat>().is_err() {
            return Err(invalid(
                "display.default_format",
                "expected one of: text, markdown, json",
            ));
        }
        if let Some(minutes) = self.display.timezone_offset_minutes {
            if !(-720..=840).contains(&minutes) {
                return Err(invalid(
                    "display.timezone_offset_minutes",
                    "must be between -720 and 840",
                ));
            }
        }
        Ok(())
    }

    /// Configured store path, or `habits.json` in the data directory.
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("habits.json")),
        }
    }

    /// Configured default report format.
    pub fn report_format(&self) -> ReportFormat {
        self.display.default_format.parse().unwrap_or_default()
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.display
            .timezone_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
            .unwrap_or_else(|| Local::now().offset().fix())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            decay_threshold: chrono::Duration::hours(i64::from(self.decay.threshold_hours)),
            decay_step: self.decay.step,
            decay_requires_streak: self.decay.require_streak,
            completion_step: self.weights.completion_step,
            positive_feedback_step: self.weights.positive_step,
            negative_feedback_step: self.weights.negative_step,
            utc_offset: self.utc_offset(),
        }
    }
}
