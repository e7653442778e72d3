//! Market data provider configuration.
//!
//! The Polygon.io API key is read from the `POLYGON_API_KEY` environment
//! variable, never from the config file.

use serde::{Deserialize, Serialize};

/// Environment variable holding the Polygon.io API key.
pub const API_KEY_ENV: &str = "POLYGON_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketDataConfig {
    /// Set to false to skip every live lookup. Defaults to true.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Defaults to 10 seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Most symbols accepted by one multi-price request. Defaults to 10.
    #[serde(default = "default_max_symbols")]
    pub max_symbols: usize,

    /// Loaded from [`API_KEY_ENV`].
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.polygon.io".into()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_symbols() -> usize {
    10
}

impl MarketDataConfig {
    /// True when lookups should hit the provider.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_symbols: default_max_symbols(),
            api_key: None,
        }
    }
}
