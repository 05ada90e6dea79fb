//! Application and engine configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FocusError, FocusResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Classification and scheduling thresholds.
    pub engine: EngineConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Thresholds and timers for one focus session.
///
/// Every option has a default; a partially filled JSON object is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Eyelid gap (normalized image units) below which eyes count as closed.
    pub eye_closed_threshold: f64,

    /// Lower bound of the acceptable head-yaw ratio.
    pub yaw_low: f64,

    /// Upper bound of the acceptable head-yaw ratio.
    pub yaw_high: f64,

    /// Lower bound of the acceptable iris-offset ratio. Set together with
    /// `iris_high`; leaving both unset disables gaze checks.
    pub iris_low: Option<f64>,

    /// Upper bound of the acceptable iris-offset ratio.
    pub iris_high: Option<f64>,

    /// Fraction of not-focused samples in the window that flips the state
    /// to distracted.
    pub smoothing_ratio: f64,

    /// Number of raw samples kept in the smoothing window.
    pub buffer_size: usize,

    /// Minimum spacing between two distraction triggers (seconds).
    pub cooldown_seconds: f64,

    /// A streak milestone fires every this many focused seconds.
    pub praise_interval_seconds: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "focusguard_engine=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            eye_closed_threshold: 0.010,
            yaw_low: 0.20,
            yaw_high: 0.80,
            iris_low: None,
            iris_high: None,
            smoothing_ratio: 0.4,
            buffer_size: 8,
            cooldown_seconds: 12.0,
            praise_interval_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EngineConfig {
    /// Reduced-feature configuration: eyes and head yaw only.
    pub fn without_gaze(mut self) -> Self {
        self.iris_low = None;
        self.iris_high = None;
        self
    }

    /// Enable gaze checks with the given iris-offset bounds.
    pub fn with_gaze(mut self, low: f64, high: f64) -> Self {
        self.iris_low = Some(low);
        self.iris_high = Some(high);
        self
    }

    /// Iris bounds, if gaze checks are enabled.
    pub fn iris_bounds(&self) -> Option<(f64, f64)> {
        match (self.iris_low, self.iris_high) {
            (Some(low), Some(high)) => Some((low, high)),
            _ => None,
        }
    }

    /// Cooldown expressed in nanoseconds, the unit of session timestamps.
    pub fn cooldown_ns(&self) -> u64 {
        (self.cooldown_seconds * 1_000_000_000.0).round() as u64
    }

    /// Check every option. A session never starts with an invalid config.
    pub fn validate(&self) -> FocusResult<()> {
        ensure_finite("eye_closed_threshold", self.eye_closed_threshold)?;
        if self.eye_closed_threshold < 0.0 {
            return Err(FocusError::config(format!(
                "eye_closed_threshold must be non-negative, got {}",
                self.eye_closed_threshold
            )));
        }

        ensure_finite("yaw_low", self.yaw_low)?;
        ensure_finite("yaw_high", self.yaw_high)?;
        if self.yaw_low >= self.yaw_high {
            return Err(FocusError::config(format!(
                "yaw_low ({}) must be below yaw_high ({})",
                self.yaw_low, self.yaw_high
            )));
        }

        match (self.iris_low, self.iris_high) {
            (None, None) => {}
            (Some(low), Some(high)) => {
                ensure_finite("iris_low", low)?;
                ensure_finite("iris_high", high)?;
                if low >= high {
                    return Err(FocusError::config(format!(
                        "iris_low ({low}) must be below iris_high ({high})"
                    )));
                }
            }
            _ => {
                return Err(FocusError::config(
                    "iris_low and iris_high must be set together",
                ));
            }
        }

        // at 0 every window, even an all-focused one, would be distracted
        if !(self.smoothing_ratio > 0.0 && self.smoothing_ratio <= 1.0) {
            return Err(FocusError::config(format!(
                "smoothing_ratio must be within (0, 1], got {}",
                self.smoothing_ratio
            )));
        }

        if self.buffer_size == 0 {
            return Err(FocusError::config("buffer_size must be at least 1"));
        }

        ensure_finite("cooldown_seconds", self.cooldown_seconds)?;
        if self.cooldown_seconds < 0.0 {
            return Err(FocusError::config(format!(
                "cooldown_seconds must be non-negative, got {}",
                self.cooldown_seconds
            )));
        }

        if self.praise_interval_seconds == 0 {
            return Err(FocusError::config(
                "praise_interval_seconds must be at least 1",
            ));
        }

        Ok(())
    }
}

fn ensure_finite(name: &str, value: f64) -> FocusResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FocusError::config(format!(
            "{name} must be a finite number, got {value}"
        )))
    }
}

impl AppConfig {
    /// Load config from the standard location.
    ///
    /// Defaults apply only when no file exists there. A file that exists but
    /// does not parse or validate is an error.
    pub fn load() -> FocusResult<Self> {
        Self::load_or_default(config_file_path())
    }

    /// Strict load of `path`, or defaults if the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> FocusResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> FocusResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FocusError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> FocusResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> FocusResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("focusguard").join("config.json")
}
