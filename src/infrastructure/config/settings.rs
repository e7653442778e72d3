//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for secrets like `POLYGON_API_KEY`.
//!
//! # Example
//!
//! ```no_run
//! use tradelog::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("tradelog.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::journal::JournalConfig;
use super::logging::LoggingConfig;
use super::market_data::{MarketDataConfig, API_KEY_ENV};
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Path to SQLite database file.
    ///
    /// Defaults to "trading_journal.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub journal: JournalConfig,

    #[serde(default)]
    pub market_data: MarketDataConfig,
}

fn default_database_path() -> String {
    "trading_journal.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            logging: LoggingConfig::default(),
            journal: JournalConfig::default(),
            market_data: MarketDataConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Loads the market data API key from the `POLYGON_API_KEY` environment
    /// variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.market_data.api_key = std::env::var(API_KEY_ENV).ok();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` when it exists, otherwise start from defaults.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load) for an existing file.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: "must be \"pretty\" or \"json\"".to_string(),
            }
            .into());
        }
        if self.journal.history_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history_limit",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.journal.history_limit > self.journal.export_limit {
            return Err(ConfigError::InvalidValue {
                field: "history_limit",
                reason: "must be <= export_limit".to_string(),
            }
            .into());
        }
        let market = &self.market_data;
        if market.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "market_data.base_url",
            }
            .into());
        }
        if url::Url::parse(&market.base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "market_data.base_url",
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }
        if market.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if market.max_symbols == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_symbols",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize the global tracing subscriber.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
