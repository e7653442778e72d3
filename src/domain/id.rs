//! Domain identifier types with proper encapsulation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Trade identifier - newtype for type safety.
///
/// Generated ids follow `{SYMBOL}_{YYYYMMDD}_{HHMMSS}`. The inner String is
/// private to ensure all construction goes through the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeId(String);

impl TradeId {
    /// Create a `TradeId` from an existing identifier (lookups, persistence).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate the identifier for a trade in `symbol` opened at `at`.
    ///
    /// Second granularity: two opens of the same symbol within one second
    /// produce the same id, and the store rejects the second insert.
    #[must_use]
    pub fn generate(symbol: &Symbol, at: DateTime<Utc>) -> Self {
        Self(format!("{}_{}", symbol, at.format("%Y%m%d_%H%M%S")))
    }

    /// Get the trade ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TradeId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for TradeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Opaque identifier of the user who owns a trade.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create a new `OwnerId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the owner ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OwnerId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<u64> for OwnerId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Uppercase ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Normalize user input into a ticker: trimmed and uppercased.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyField`] when nothing is left after trimming.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(DomainError::EmptyField { field: "symbol" });
        }
        Ok(Self(symbol))
    }

    /// Get the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
