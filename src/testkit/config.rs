//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use crate::infrastructure::config::Config;

/// Defaults with market data switched off, so nothing reaches the network.
pub fn offline() -> Config {
    let mut config = Config::default();
    config.market_data.enabled = false;
    config.market_data.api_key = None;
    config
}

/// [`offline`] with the database at `path`.
pub fn with_database(path: &str) -> Config {
    let mut config = offline();
    config.database = path.to_string();
    config
}

/// TOML for a valid config file pointing at `database`.
pub fn toml_for(database: &str) -> String {
    format!(
        r#"database = "{database}"

[logging]
level = "warn"

[market_data]
enabled = false
"#
    )
}
