//! Raw trade forms as submitted by a front end, and their validation.
//!
//! Front ends deliver text: prices, quantities and directions typed by a
//! user. Validation turns a form into typed values or a [`DomainError`]
//! naming the offending field. The `MARKET` token is never accepted here;
//! callers resolve it to a live quote first.

use rust_decimal::Decimal;

use super::direction::Direction;
use super::error::DomainError;
use super::id::{OwnerId, Symbol, TradeId};

/// Token a user types instead of a number to request the live price.
pub const MARKET_TOKEN: &str = "MARKET";

/// Returns true if `raw` is the `MARKET` sentinel (case-insensitive).
#[must_use]
pub fn is_market_token(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(MARKET_TOKEN)
}

/// Largest accepted price or commission, in currency units.
pub const MAX_PRICE_UNITS: i64 = 1_000_000_000_000;

/// Most decimal places accepted on a price or commission.
pub const MAX_PRICE_SCALE: u32 = 8;

/// Keep prices inside a range where `price * quantity` and the P&L ratios
/// stay representable.
fn within_price_range(field: &'static str, value: Decimal) -> Result<Decimal, DomainError> {
    if value > Decimal::from(MAX_PRICE_UNITS) || value.normalize().scale() > MAX_PRICE_SCALE {
        return Err(DomainError::OutOfRange {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn parse_decimal(field: &'static str, raw: &str) -> Result<Decimal, DomainError> {
    let trimmed = raw.trim();
    if is_market_token(trimmed) {
        return Err(DomainError::UnresolvedMarketPrice { field });
    }
    trimmed
        .parse::<Decimal>()
        .map_err(|_| DomainError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Parse a strictly positive price.
///
/// # Errors
///
/// Returns an error for the `MARKET` token, malformed numbers, values that
/// are zero or negative, and values above [`MAX_PRICE_UNITS`] or with more
/// than [`MAX_PRICE_SCALE`] decimal places.
pub fn parse_price(field: &'static str, raw: &str) -> Result<Decimal, DomainError> {
    let value = parse_decimal(field, raw)?;
    if value <= Decimal::ZERO {
        return Err(DomainError::NonPositive {
            field,
            value: value.to_string(),
        });
    }
    within_price_range(field, value)
}

/// Parse an optional positive price; blank input means "not provided".
///
/// # Errors
///
/// Same as [`parse_price`] for non-blank input.
pub fn parse_optional_price(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<Decimal>, DomainError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_price(field, value).map(Some),
    }
}

/// Parse a strictly positive whole quantity.
///
/// # Errors
///
/// Returns an error for non-integers and for zero or negative values.
pub fn parse_quantity(raw: &str) -> Result<u32, DomainError> {
    let trimmed = raw.trim();
    let value: i64 = trimmed.parse().map_err(|_| DomainError::InvalidNumber {
        field: "quantity",
        value: raw.to_string(),
    })?;
    if value <= 0 {
        return Err(DomainError::NonPositive {
            field: "quantity",
            value: value.to_string(),
        });
    }
    u32::try_from(value).map_err(|_| DomainError::InvalidNumber {
        field: "quantity",
        value: raw.to_string(),
    })
}

/// Parse a commission; blank input means zero.
///
/// # Errors
///
/// Returns an error for malformed, negative or out-of-range values.
pub fn parse_commission(raw: Option<&str>) -> Result<Decimal, DomainError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Decimal::ZERO),
        Some(value) => {
            let commission = parse_decimal("commission", value)?;
            if commission < Decimal::ZERO {
                return Err(DomainError::Negative {
                    field: "commission",
                    value: commission.to_string(),
                });
            }
            within_price_range("commission", commission)
        }
    }
}

fn required_text(field: &'static str, raw: &str) -> Result<String, DomainError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(DomainError::EmptyField { field });
    }
    Ok(text.to_string())
}

fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Form for logging a new trade.
#[derive(Debug, Clone)]
pub struct OpenTradeForm {
    pub owner_id: OwnerId,
    pub owner_name: String,
    pub symbol: String,
    pub direction: String,
    pub entry_price: String,
    pub quantity: String,
    pub reason: String,
    pub stop_loss: Option<String>,
    pub take_profit: Option<String>,
    pub setup_type: Option<String>,
    pub risk_amount: Option<String>,
    /// Live quote observed when the trade was logged. Informational only.
    pub market_price_at_entry: Option<Decimal>,
}

impl OpenTradeForm {
    /// Create a form with the required fields; optional fields start empty.
    pub fn new(
        owner_id: impl Into<OwnerId>,
        owner_name: impl Into<String>,
        symbol: impl Into<String>,
        direction: impl Into<String>,
        entry_price: impl Into<String>,
        quantity: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            owner_name: owner_name.into(),
            symbol: symbol.into(),
            direction: direction.into(),
            entry_price: entry_price.into(),
            quantity: quantity.into(),
            reason: reason.into(),
            stop_loss: None,
            take_profit: None,
            setup_type: None,
            risk_amount: None,
            market_price_at_entry: None,
        }
    }

    #[must_use]
    pub fn with_stop_loss(mut self, value: impl Into<String>) -> Self {
        self.stop_loss = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_take_profit(mut self, value: impl Into<String>) -> Self {
        self.take_profit = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_setup_type(mut self, value: impl Into<String>) -> Self {
        self.setup_type = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_risk_amount(mut self, value: impl Into<String>) -> Self {
        self.risk_amount = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_market_price(mut self, price: Option<Decimal>) -> Self {
        self.market_price_at_entry = price;
        self
    }

    /// Validate every field and produce typed values.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails validation.
    pub fn validate(&self) -> Result<ValidatedOpen, DomainError> {
        Ok(ValidatedOpen {
            owner_id: self.owner_id.clone(),
            owner_name: self.owner_name.trim().to_string(),
            symbol: Symbol::parse(&self.symbol)?,
            direction: self.direction.parse()?,
            entry_price: parse_price("entry_price", &self.entry_price)?,
            quantity: parse_quantity(&self.quantity)?,
            reason: required_text("reason", &self.reason)?,
            stop_loss: parse_optional_price("stop_loss", self.stop_loss.as_deref())?,
            take_profit: parse_optional_price("take_profit", self.take_profit.as_deref())?,
            setup_type: optional_text(self.setup_type.as_deref()),
            risk_amount: parse_optional_price("risk_amount", self.risk_amount.as_deref())?,
            market_price_at_entry: self.market_price_at_entry,
        })
    }
}

/// Typed, validated contents of an [`OpenTradeForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOpen {
    pub owner_id: OwnerId,
    pub owner_name: String,
    pub symbol: Symbol,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub quantity: u32,
    pub reason: String,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub setup_type: Option<String>,
    pub risk_amount: Option<Decimal>,
    pub market_price_at_entry: Option<Decimal>,
}

/// Form for closing an open trade.
#[derive(Debug, Clone)]
pub struct CloseTradeForm {
    pub trade_id: TradeId,
    pub owner_id: OwnerId,
    pub exit_price: String,
    pub exit_reason: String,
    /// Blank or absent means zero.
    pub commission: Option<String>,
    /// Live quote observed at close. Informational only.
    pub market_price_at_exit: Option<Decimal>,
}

impl CloseTradeForm {
    /// Create a close form with zero commission.
    pub fn new(
        trade_id: impl Into<TradeId>,
        owner_id: impl Into<OwnerId>,
        exit_price: impl Into<String>,
        exit_reason: impl Into<String>,
    ) -> Self {
        Self {
            trade_id: trade_id.into(),
            owner_id: owner_id.into(),
            exit_price: exit_price.into(),
            exit_reason: exit_reason.into(),
            commission: None,
            market_price_at_exit: None,
        }
    }

    #[must_use]
    pub fn with_commission(mut self, value: impl Into<String>) -> Self {
        self.commission = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_market_price(mut self, price: Option<Decimal>) -> Self {
        self.market_price_at_exit = price;
        self
    }

    /// Validate the exit fields.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails validation.
    pub fn validate(&self) -> Result<ValidatedClose, DomainError> {
        Ok(ValidatedClose {
            exit_price: parse_price("exit_price", &self.exit_price)?,
            exit_reason: required_text("exit_reason", &self.exit_reason)?,
            commission: parse_commission(self.commission.as_deref())?,
            market_price_at_exit: self.market_price_at_exit,
        })
    }
}

/// Typed, validated exit fields of a [`CloseTradeForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedClose {
    pub exit_price: Decimal,
    pub exit_reason: String,
    pub commission: Decimal,
    pub market_price_at_exit: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn form() -> OpenTradeForm {
        OpenTradeForm::new("42", "alex", " aapl ", "long", "150.50", "100", "Breakout above range")
    }

    #[test]
    fn open_form_validates_and_normalizes() {
        let valid = form()
            .with_stop_loss("145")
            .with_take_profit("")
            .with_setup_type("  Breakout ")
            .validate()
            .unwrap();

        assert_eq!(valid.symbol.as_str(), "AAPL");
        assert_eq!(valid.direction, Direction::Long);
        assert_eq!(valid.entry_price, dec!(150.50));
        assert_eq!(valid.quantity, 100);
        assert_eq!(valid.stop_loss, Some(dec!(145)));
        assert_eq!(valid.take_profit, None);
        assert_eq!(valid.setup_type.as_deref(), Some("Breakout"));
        assert_eq!(valid.risk_amount, None);
    }

    #[test]
    fn open_form_rejects_fractional_quantity() {
        let mut bad = form();
        bad.quantity = "1.5".into();
        assert!(matches!(
            bad.validate(),
            Err(DomainError::InvalidNumber { field: "quantity", .. })
        ));
    }

    #[test]
    fn open_form_rejects_zero_quantity() {
        let mut bad = form();
        bad.quantity = "0".into();
        assert!(matches!(
            bad.validate(),
            Err(DomainError::NonPositive { field: "quantity", .. })
        ));
    }

    #[test]
    fn open_form_rejects_non_positive_price() {
        let mut bad = form();
        bad.entry_price = "-3".into();
        assert!(matches!(
            bad.validate(),
            Err(DomainError::NonPositive { field: "entry_price", .. })
        ));
    }

    #[test]
    fn prices_outside_supported_range_are_rejected() {
        let mut huge = form();
        huge.entry_price = "79228162514264337593543950".into();
        assert!(matches!(
            huge.validate(),
            Err(DomainError::OutOfRange { field: "entry_price", .. })
        ));

        let mut tiny = form();
        tiny.entry_price = "0.0000000000000000000000000001".into();
        assert!(matches!(
            tiny.validate(),
            Err(DomainError::OutOfRange { field: "entry_price", .. })
        ));

        let mut edge = form();
        edge.entry_price = "0.00000001".into();
        assert_eq!(edge.validate().unwrap().entry_price, dec!(0.00000001));
        assert_eq!(parse_price("exit_price", "1000000000000").unwrap(), dec!(1000000000000));
        assert_eq!(parse_price("exit_price", "1.50000000000").unwrap(), dec!(1.5));
    }

    #[test]
    fn commission_outside_supported_range_is_rejected() {
        assert!(matches!(
            parse_commission(Some("10000000000000")),
            Err(DomainError::OutOfRange { field: "commission", .. })
        ));
    }

    #[test]
    fn open_form_rejects_unresolved_market_token() {
        let mut bad = form();
        bad.entry_price = "market".into();
        assert_eq!(
            bad.validate(),
            Err(DomainError::UnresolvedMarketPrice { field: "entry_price" })
        );
    }

    #[test]
    fn open_form_rejects_unknown_direction() {
        let mut bad = form();
        bad.direction = "BUY".into();
        assert!(matches!(bad.validate(), Err(DomainError::InvalidDirection(_))));
    }

    #[test]
    fn open_form_requires_reason() {
        let mut bad = form();
        bad.reason = "   ".into();
        assert_eq!(
            bad.validate(),
            Err(DomainError::EmptyField { field: "reason" })
        );
    }

    #[test]
    fn close_form_defaults_commission_to_zero() {
        let valid = CloseTradeForm::new("AAPL_20250625_143022", "42", "155.75", "Target hit")
            .validate()
            .unwrap();

        assert_eq!(valid.commission, Decimal::ZERO);
        assert_eq!(valid.exit_price, dec!(155.75));
    }

    #[test]
    fn close_form_rejects_negative_commission() {
        let result = CloseTradeForm::new("X_1", "42", "10", "stop")
            .with_commission("-1")
            .validate();
        assert!(matches!(
            result,
            Err(DomainError::Negative { field: "commission", .. })
        ));
    }

    #[test]
    fn close_form_requires_exit_reason() {
        let result = CloseTradeForm::new("X_1", "42", "10", "").validate();
        assert_eq!(
            result,
            Err(DomainError::EmptyField { field: "exit_reason" })
        );
    }

    #[test]
    fn market_token_detection() {
        assert!(is_market_token("MARKET"));
        assert!(is_market_token(" market "));
        assert!(!is_market_token("150"));
    }
}
