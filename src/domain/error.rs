//! Domain validation errors for trade input.
//!
//! These errors are returned when raw input (numbers, directions, required
//! text) fails to satisfy the trade invariants. They are recoverable: the
//! caller asks the user to resubmit.
//!
//! # Examples
//!
//! ```
//! use tradelog::domain::error::DomainError;
//! use tradelog::domain::direction::Direction;
//!
//! let result: Result<Direction, DomainError> = "sideways".parse();
//! assert!(matches!(result, Err(DomainError::InvalidDirection(_))));
//! ```

use thiserror::Error;

/// Errors that occur when trade input violates domain invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A numeric field could not be parsed.
    #[error("{field} is not a valid number: {value:?}")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// The raw input.
        value: String,
    },

    /// A field that must be strictly positive was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// The parsed value, as text.
        value: String,
    },

    /// A field that may be zero (commission) was negative.
    #[error("{field} cannot be negative, got {value}")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// The parsed value, as text.
        value: String,
    },

    /// A value outside the supported price range or precision.
    #[error("{field} is out of range: {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The parsed value, as text.
        value: String,
    },

    /// Arithmetic on otherwise valid values left the decimal range.
    #[error("{field} overflows the decimal range")]
    Overflow {
        /// Name of the quantity being computed.
        field: &'static str,
    },

    /// A stored status token is not OPEN or CLOSED.
    #[error("status must be OPEN or CLOSED, got {0:?}")]
    InvalidStatus(String),

    /// The direction token is not one of LONG, SHORT, CALL, PUT.
    #[error("direction must be one of LONG, SHORT, CALL, PUT, got {0:?}")]
    InvalidDirection(String),

    /// The `MARKET` sentinel reached the core without being resolved.
    #[error("{field} is MARKET; resolve it to a live quote before submitting")]
    UnresolvedMarketPrice {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A required text field was empty.
    #[error("{field} is required")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },
}
