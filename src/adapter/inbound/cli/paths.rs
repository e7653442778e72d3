//! Path utilities for tradelog.
//!
//! Per-user files live under `~/.tradelog/`:
//! - `~/.tradelog/config.toml` - main configuration

use std::path::PathBuf;

/// Returns the tradelog home directory (`~/.tradelog/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tradelog")
}

/// Returns the default config file path (`~/.tradelog/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
