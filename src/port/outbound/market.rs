//! Market data port.
//!
//! Live quotes are optional enrichment. The trade lifecycle never calls this
//! port; front ends use it to resolve the `MARKET` token and to mark open
//! positions. Implementations do not retry or cache.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::Symbol;
use crate::error::Result;

/// Best bid and offer for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
}

impl Quote {
    /// `ask - bid`, with a missing side counted as zero.
    #[must_use]
    pub fn spread(&self) -> Decimal {
        self.ask.unwrap_or_default() - self.bid.unwrap_or_default()
    }
}

/// Source of live prices.
///
/// `Ok(None)` means "no price available", which includes the case where
/// market data is not configured.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Return the provider name for logging.
    fn name(&self) -> &'static str;

    /// Last traded price.
    async fn current_price(&self, symbol: &Symbol) -> Result<Option<Decimal>>;

    /// Current best bid and offer.
    async fn quote(&self, symbol: &Symbol) -> Result<Option<Quote>>;

    /// Previous session's closing price.
    async fn previous_close(&self, symbol: &Symbol) -> Result<Option<Decimal>>;

    /// Whether the provider knows this symbol.
    async fn validate_symbol(&self, symbol: &Symbol) -> Result<bool>;
}

/// A [`PriceSource`] that never has a price. Used when market data is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrices;

#[async_trait]
impl PriceSource for NoPrices {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn current_price(&self, _symbol: &Symbol) -> Result<Option<Decimal>> {
        Ok(None)
    }

    async fn quote(&self, _symbol: &Symbol) -> Result<Option<Quote>> {
        Ok(None)
    }

    async fn previous_close(&self, _symbol: &Symbol) -> Result<Option<Decimal>> {
        Ok(None)
    }

    /// Every symbol is accepted when nothing can be checked.
    async fn validate_symbol(&self, _symbol: &Symbol) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn spread_treats_missing_side_as_zero() {
        let full = Quote {
            bid: Some(dec!(10.00)),
            ask: Some(dec!(10.05)),
        };
        assert_eq!(full.spread(), dec!(0.05));

        let ask_only = Quote {
            bid: None,
            ask: Some(dec!(3)),
        };
        assert_eq!(ask_only.spread(), dec!(3));
    }

    #[tokio::test]
    async fn no_prices_accepts_symbols_but_has_no_quotes() {
        let source = NoPrices;
        let spy = Symbol::parse("SPY").unwrap();

        assert!(source.validate_symbol(&spy).await.unwrap());
        assert!(source.current_price(&spy).await.unwrap().is_none());
        assert!(source.quote(&spy).await.unwrap().is_none());
    }
}
