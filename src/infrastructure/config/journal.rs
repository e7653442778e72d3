//! Journal listing limits.

use serde::{Deserialize, Serialize};

use crate::application::journal::DEFAULT_HISTORY_LIMIT;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JournalConfig {
    /// Records returned by a plain history listing. Defaults to 50.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Largest `--limit` a list request may ask for. Defaults to 1000.
    #[serde(default = "default_export_limit")]
    pub export_limit: usize,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_export_limit() -> usize {
    1000
}

impl JournalConfig {
    /// Clamp a requested list size to `export_limit`, falling back to
    /// `history_limit` when none was requested.
    #[must_use]
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.history_limit)
            .min(self.export_limit)
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            export_limit: default_export_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_limit_defaults_and_clamps() {
        let config = JournalConfig::default();
        assert_eq!(config.effective_limit(None), 50);
        assert_eq!(config.effective_limit(Some(10)), 10);
        assert_eq!(config.effective_limit(Some(5000)), 1000);
    }
}
