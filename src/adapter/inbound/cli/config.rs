//! Handler for the `config` command group.

use std::path::Path;

use serde_json::json;

use super::output;
use crate::error::Result;
use crate::infrastructure::config::market_data::API_KEY_ENV;
use crate::infrastructure::config::Config;

/// Execute `config show`.
pub fn execute_show(config: &Config, path: &Path) -> Result<()> {
    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "path": path.display().to_string(),
            "config": config,
            "market_data_active": config.market_data.is_active(),
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("File", path.display());
    output::field("Database", &config.database);

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);

    output::section("Journal");
    output::field("History", config.journal.history_limit);
    output::field("Max list", config.journal.export_limit);

    output::section("Market data");
    output::field("Enabled", config.market_data.enabled);
    output::field("Base URL", &config.market_data.base_url);
    output::field("Timeout", format!("{}s", config.market_data.timeout_secs));
    output::field("Max symbols", config.market_data.max_symbols);
    output::field(
        "API key",
        if config.market_data.api_key.is_some() {
            output::positive("set")
        } else {
            output::muted(format!("not set ({API_KEY_ENV})"))
        },
    );
    Ok(())
}

/// Execute `config validate`. Loading already validated the file; this
/// reports the result.
pub fn execute_validate(config: &Config, path: &Path) -> Result<()> {
    config.validate()?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "path": path.display().to_string(),
            "valid": true,
        }));
        return Ok(());
    }

    output::success("Configuration is valid");
    output::field("File", path.display());
    if !config.market_data.is_active() {
        output::warning(&format!(
            "market data inactive: MARKET prices will be rejected (set {API_KEY_ENV})"
        ));
    }
    Ok(())
}
