use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::id::TradeId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed numeric, enum or required-text input. The user resubmits.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// Unknown trade id, or a trade owned by someone else.
    #[error("trade not found: {trade_id}")]
    NotFound { trade_id: TradeId },

    #[error("trade already closed: {trade_id}")]
    AlreadyClosed { trade_id: TradeId },

    /// Trade id collision on insert; the caller may regenerate the id.
    #[error("trade id already exists: {trade_id}")]
    DuplicateKey { trade_id: TradeId },

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("market data unavailable: {0}")]
    MarketData(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`Error`] for callers that branch on failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    AlreadyClosed,
    DuplicateKey,
    Persistence,
    MarketData,
    Config,
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyClosed { .. } => ErrorKind::AlreadyClosed,
            Self::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            Self::Persistence(_) | Self::Io(_) => ErrorKind::Persistence,
            Self::MarketData(_) | Self::Http(_) | Self::Json(_) => ErrorKind::MarketData,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        let id = TradeId::from("SPY_20250101_093000");
        assert_eq!(
            Error::NotFound { trade_id: id.clone() }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::AlreadyClosed { trade_id: id.clone() }.kind(),
            ErrorKind::AlreadyClosed
        );
        assert_eq!(
            Error::DuplicateKey { trade_id: id }.kind(),
            ErrorKind::DuplicateKey
        );
        assert_eq!(
            Error::from(DomainError::EmptyField { field: "reason" }).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            Error::Persistence("disk full".into()).kind(),
            ErrorKind::Persistence
        );
    }

    #[test]
    fn not_found_message_names_the_trade() {
        let err = Error::NotFound {
            trade_id: TradeId::from("AAPL_20250625_143022"),
        };
        assert_eq!(err.to_string(), "trade not found: AAPL_20250625_143022");
    }
}
