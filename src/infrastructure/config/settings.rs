//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all worker settings.
//! Every section has defaults, so an empty file (or no file at all) is a valid
//! configuration.
//!
//! # Example
//!
//! ```no_run
//! use dispatch_optimizer::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::monte_carlo::MonteCarloConfig;
use super::worker::WorkerConfig;
use crate::domain::limits::MAX_SCENARIOS;
use crate::error::{ConfigError, Result};

/// Smallest frame limit that still fits a request header.
const MIN_FRAME_BYTES: usize = 64;

const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Binary worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,

    /// Scenario loop settings.
    #[serde(default)]
    pub monte_carlo: MonteCarloConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Check that every value is within range.
    fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "level" }.into());
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("must be one of {}", LOG_FORMATS.join(", ")),
            }
            .into());
        }
        if self.worker.max_frame_bytes < MIN_FRAME_BYTES {
            return Err(ConfigError::InvalidValue {
                field: "max_frame_bytes",
                reason: format!("must be at least {MIN_FRAME_BYTES}"),
            }
            .into());
        }
        if self.monte_carlo.min_scenarios_per_thread == 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_scenarios_per_thread",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.monte_carlo.max_scenarios as usize > MAX_SCENARIOS {
            return Err(ConfigError::InvalidValue {
                field: "max_scenarios",
                reason: format!("must be at most {MAX_SCENARIOS}"),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.worker.max_frame_bytes, 1024 * 1024);
        assert_eq!(config.monte_carlo.threads, 0);
        assert_eq!(config.monte_carlo.max_scenarios, 10_000);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = Config::parse_toml("[monte_carlo]\nthreads = 3\n").unwrap();
        assert_eq!(config.monte_carlo.threads, 3);
        assert_eq!(config.monte_carlo.min_scenarios_per_thread, 250);
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = Config::parse_toml("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "format",
                ..
            })
        ));
    }

    #[test]
    fn rejects_scenario_limit_above_protocol_maximum() {
        let err = Config::parse_toml("[monte_carlo]\nmax_scenarios = 20000\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "max_scenarios",
                ..
            })
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            Config::parse_toml("[worker"),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::parse_toml(&text).unwrap();
        assert_eq!(parsed.worker.max_frame_bytes, config.worker.max_frame_bytes);
    }
}
