//! Runtime configuration for a dashboard session.
//!
//! # Responsibility
//! - Collect tunables (overdue threshold, model settings, logging) in one
//!   value that is passed down explicitly.
//! - Parse environment overrides without touching process state in tests.
//!
//! # Invariants
//! - Missing variables fall back to defaults; malformed ones are errors.
//! - The overdue threshold lies in `1..=MAX_OVERDUE_THRESHOLD_HOURS`.
//! - An empty API key is treated as absent.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_OVERDUE_THRESHOLD_HOURS: i64 = 48;
/// Upper bound for `GRX_OVERDUE_HOURS`: one year.
pub const MAX_OVERDUE_THRESHOLD_HOURS: i64 = 24 * 366;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

const ENV_API_KEY: &str = "API_KEY";
const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
const ENV_GEMINI_MODEL: &str = "GRX_GEMINI_MODEL";
const ENV_OVERDUE_HOURS: &str = "GRX_OVERDUE_HOURS";
const ENV_TIMEOUT_SECS: &str = "GRX_REQUEST_TIMEOUT_SECS";
const ENV_LOG_LEVEL: &str = "GRX_LOG_LEVEL";
const ENV_LOG_DIR: &str = "GRX_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value for {key}: `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// File logging settings; `log_dir = None` leaves logging off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Pending memos older than this many hours raise an alert.
    pub overdue_threshold_hours: i64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub request_timeout_secs: u64,
    pub logging: LoggingConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            overdue_threshold_hours: DEFAULT_OVERDUE_THRESHOLD_HOURS,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            logging: LoggingConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Reads overrides from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`, which returns a variable's value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        config.gemini_api_key = non_empty(ENV_API_KEY).or_else(|| non_empty(ENV_GEMINI_API_KEY));
        if let Some(model) = non_empty(ENV_GEMINI_MODEL) {
            config.gemini_model = model.trim().to_string();
        }
        if let Some(value) = non_empty(ENV_OVERDUE_HOURS) {
            let hours: i64 = parse_number(ENV_OVERDUE_HOURS, &value)?;
            if !(1..=MAX_OVERDUE_THRESHOLD_HOURS).contains(&hours) {
                return Err(ConfigError::InvalidValue {
                    key: ENV_OVERDUE_HOURS,
                    value,
                });
            }
            config.overdue_threshold_hours = hours;
        }
        if let Some(value) = non_empty(ENV_TIMEOUT_SECS) {
            config.request_timeout_secs = parse_number(ENV_TIMEOUT_SECS, &value)?;
        }
        if let Some(level) = non_empty(ENV_LOG_LEVEL) {
            config.logging.level = level.trim().to_string();
        }
        config.logging.log_dir = non_empty(ENV_LOG_DIR).map(PathBuf::from);

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, CoreConfig, DEFAULT_GEMINI_MODEL, DEFAULT_OVERDUE_THRESHOLD_HOURS,
        MAX_OVERDUE_THRESHOLD_HOURS,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.overdue_threshold_hours, DEFAULT_OVERDUE_THRESHOLD_HOURS);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.logging.log_dir, None);
    }

    #[test]
    fn api_key_prefers_api_key_and_ignores_blank_values() {
        let config =
            CoreConfig::from_lookup(lookup(&[("API_KEY", "  "), ("GEMINI_API_KEY", "k-2")]))
                .unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("k-2"));

        let config =
            CoreConfig::from_lookup(lookup(&[("API_KEY", "k-1"), ("GEMINI_API_KEY", "k-2")]))
                .unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("k-1"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = CoreConfig::from_lookup(lookup(&[
            ("GRX_OVERDUE_HOURS", "72"),
            ("GRX_LOG_DIR", "/var/log/grx"),
            ("GRX_GEMINI_MODEL", "gemini-2.5-pro"),
        ]))
        .unwrap();
        assert_eq!(config.overdue_threshold_hours, 72);
        assert_eq!(config.logging.log_dir, Some(PathBuf::from("/var/log/grx")));
        assert_eq!(config.gemini_model, "gemini-2.5-pro");
    }

    #[test]
    fn malformed_threshold_is_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[("GRX_OVERDUE_HOURS", "two days")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "GRX_OVERDUE_HOURS",
                value: "two days".to_string()
            }
        );
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        for raw in ["0", "-100", "9223372036854775807", "8785"] {
            let err = CoreConfig::from_lookup(lookup(&[("GRX_OVERDUE_HOURS", raw)])).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidValue {
                    key: "GRX_OVERDUE_HOURS",
                    value: raw.to_string()
                }
            );
        }

        let config = CoreConfig::from_lookup(lookup(&[("GRX_OVERDUE_HOURS", "8784")])).unwrap();
        assert_eq!(config.overdue_threshold_hours, MAX_OVERDUE_THRESHOLD_HOURS);
    }
}
