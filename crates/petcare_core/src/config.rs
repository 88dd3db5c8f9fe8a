//! Core runtime configuration.
//!
//! # Invariants
//! - Missing fields fall back to defaults (7-day horizon, 30-day preview).
//! - `validate()` runs on every load path; out-of-range values and unknown
//!   log levels are rejected.

use crate::logging::{default_log_level, init_logging, normalize_level, LoggingError};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_UPCOMING_HORIZON_DAYS: u32 = 7;
const DEFAULT_PREVIEW_DAYS: u32 = 30;
const MAX_WINDOW_DAYS: u32 = 366;

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    OutOfRange { field: &'static str, value: u32 },
    LogLevel(LoggingError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::OutOfRange { field, value } => write!(
                f,
                "`{field}` must be between 1 and {MAX_WINDOW_DAYS}, got {value}"
            ),
            Self::LogLevel(err) => write!(f, "invalid `log_level`: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::LogLevel(err) => Some(err),
            Self::OutOfRange { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Length of the forward-looking window for follow-ups, refills and
    /// grooming dates.
    pub upcoming_horizon_days: u32,
    /// Days covered by a medication schedule preview.
    pub preview_days: u32,
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            upcoming_horizon_days: DEFAULT_UPCOMING_HORIZON_DAYS,
            preview_days: DEFAULT_PREVIEW_DAYS,
            log_level: default_log_level().to_string(),
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_days("upcoming_horizon_days", self.upcoming_horizon_days)?;
        check_days("preview_days", self.preview_days)?;
        normalize_level(&self.log_level).map_err(ConfigError::LogLevel)?;
        Ok(())
    }

    /// Starts core logging at the configured level under `log_dir`.
    pub fn init_logging(&self, log_dir: &str) -> Result<(), LoggingError> {
        init_logging(&self.log_level, log_dir)
    }

    pub fn upcoming_horizon(&self) -> Duration {
        Duration::days(i64::from(self.upcoming_horizon_days))
    }
}

fn check_days(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_WINDOW_DAYS {
        return Err(ConfigError::OutOfRange { field, value });
    }
    Ok(())
}
