//! Resolution of user-entered prices against live market data.
//!
//! Front ends run forms through [`PriceResolver`] before handing them to
//! [`TradeJournal`]. The `MARKET` token is replaced by a live quote here or
//! the operation fails; it never reaches the lifecycle.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::application::TradeJournal;
use crate::domain::form::{is_market_token, parse_price, MAX_PRICE_SCALE};
use crate::domain::{
    CloseTradeForm, LivePosition, OpenTradeForm, OwnerId, Symbol, TradeId, TradeRecord,
};
use crate::error::{Error, Result};
use crate::port::PriceSource;

/// A price chosen for a trade plus the quote observed at the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPrice {
    pub price: Decimal,
    pub market_price: Option<Decimal>,
}

/// Looks up live prices on behalf of front ends.
pub struct PriceResolver {
    source: Arc<dyn PriceSource>,
}

impl PriceResolver {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self { source }
    }

    #[must_use]
    pub fn source(&self) -> &dyn PriceSource {
        self.source.as_ref()
    }

    /// Turn a raw price field into a concrete price.
    ///
    /// `MARKET` resolves to the live price and fails with
    /// [`Error::MarketData`] when none is available. Any other input is
    /// parsed as a positive decimal; the live price is then fetched on a
    /// best-effort basis and only recorded for reference.
    pub async fn resolve(
        &self,
        field: &'static str,
        symbol: &Symbol,
        raw: &str,
    ) -> Result<ResolvedPrice> {
        if is_market_token(raw) {
            return match self.source.current_price(symbol).await {
                Ok(Some(quote)) => {
                    let price = quote.round_dp(MAX_PRICE_SCALE);
                    debug!(symbol = %symbol, price = %price, "Resolved MARKET price");
                    Ok(ResolvedPrice {
                        price,
                        market_price: Some(price),
                    })
                }
                Ok(None) => Err(Error::MarketData(format!(
                    "no live price for {symbol}; enter a price manually"
                ))),
                Err(e) => Err(Error::MarketData(format!("{symbol}: {e}"))),
            };
        }

        let price = parse_price(field, raw)?;
        let market_price = self.observe(symbol).await;
        Ok(ResolvedPrice {
            price,
            market_price,
        })
    }

    /// Live price or `None`, logging failures instead of returning them.
    pub async fn observe(&self, symbol: &Symbol) -> Option<Decimal> {
        match self.source.current_price(symbol).await {
            Ok(price) => price,
            Err(e) => {
                warn!(symbol = %symbol, source = self.source.name(), error = %e, "Price lookup failed");
                None
            }
        }
    }

    /// Resolve the entry price and record the quote seen at entry.
    ///
    /// Symbols the provider reports as unknown are rejected. A failed
    /// symbol check is logged and the symbol accepted.
    pub async fn prepare_open(&self, mut form: OpenTradeForm) -> Result<OpenTradeForm> {
        let symbol = Symbol::parse(&form.symbol)?;
        match self.source.validate_symbol(&symbol).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(Error::MarketData(format!("unknown symbol {symbol}")));
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Symbol check failed, accepting symbol");
            }
        }

        let resolved = self.resolve("entry_price", &symbol, &form.entry_price).await?;
        form.entry_price = resolved.price.to_string();
        Ok(form.with_market_price(resolved.market_price))
    }

    /// Resolve the exit price and record the quote seen at exit.
    pub async fn prepare_close(
        &self,
        symbol: &Symbol,
        mut form: CloseTradeForm,
    ) -> Result<CloseTradeForm> {
        let resolved = self.resolve("exit_price", symbol, &form.exit_price).await?;
        form.exit_price = resolved.price.to_string();
        Ok(form.with_market_price(resolved.market_price))
    }

    /// Mark the caller's OPEN trade against the live price.
    pub async fn live_position(
        &self,
        journal: &TradeJournal,
        trade_id: &TradeId,
        owner_id: &OwnerId,
    ) -> Result<(TradeRecord, LivePosition)> {
        let record = journal.get_owned(trade_id, owner_id)?;
        if !record.is_open() {
            return Err(Error::AlreadyClosed {
                trade_id: record.trade_id,
            });
        }
        let price = self
            .source
            .current_price(&record.symbol)
            .await?
            .ok_or_else(|| Error::MarketData(format!("no live price for {}", record.symbol)))?;
        journal.mark_to_market(trade_id, owner_id, price)
    }

    /// Current price for each symbol, in input order. Lookups that fail
    /// yield `None`.
    pub async fn prices(&self, symbols: &[Symbol]) -> Vec<(Symbol, Option<Decimal>)> {
        let mut out = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            out.push((symbol.clone(), self.observe(symbol).await));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::InMemoryTradeStore;
    use crate::error::ErrorKind;
    use crate::port::{Clock, NoPrices};
    use crate::testkit::domain::{close_form, open_form, FixedClock, StaticPrices};
    use rust_decimal_macros::dec;

    fn spy() -> Symbol {
        Symbol::parse("SPY").unwrap()
    }

    #[tokio::test]
    async fn market_token_uses_live_price() {
        let resolver = PriceResolver::new(Arc::new(StaticPrices::new().with("SPY", dec!(512.34))));

        let resolved = resolver.resolve("entry_price", &spy(), "market").await.unwrap();
        assert_eq!(resolved.price, dec!(512.34));
        assert_eq!(resolved.market_price, Some(dec!(512.34)));
    }

    #[tokio::test]
    async fn market_token_without_price_fails_closed() {
        let resolver = PriceResolver::new(Arc::new(NoPrices));

        let err = resolver.resolve("entry_price", &spy(), "MARKET").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MarketData);
    }

    #[tokio::test]
    async fn market_token_with_failing_source_fails_closed() {
        let resolver = PriceResolver::new(Arc::new(StaticPrices::failing()));

        let err = resolver.resolve("exit_price", &spy(), "MARKET").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MarketData);
    }

    #[tokio::test]
    async fn manual_price_keeps_quote_for_reference() {
        let resolver = PriceResolver::new(Arc::new(StaticPrices::new().with("SPY", dec!(500))));

        let resolved = resolver.resolve("entry_price", &spy(), "499.50").await.unwrap();
        assert_eq!(resolved.price, dec!(499.50));
        assert_eq!(resolved.market_price, Some(dec!(500)));
    }

    #[tokio::test]
    async fn manual_price_survives_source_failure() {
        let resolver = PriceResolver::new(Arc::new(StaticPrices::failing()));

        let resolved = resolver.resolve("entry_price", &spy(), "499.50").await.unwrap();
        assert_eq!(resolved.market_price, None);
    }

    #[tokio::test]
    async fn prepare_open_rejects_unknown_symbol() {
        let resolver = PriceResolver::new(Arc::new(StaticPrices::new().with("SPY", dec!(500))));

        let err = resolver
            .prepare_open(open_form("42", "ZZZZ", "LONG"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MarketData);
    }

    #[tokio::test]
    async fn prepared_forms_flow_through_the_journal() {
        let prices = Arc::new(StaticPrices::new().with("AAPL", dec!(150.00)));
        let resolver = PriceResolver::new(prices.clone());
        let journal = TradeJournal::with_clock(
            Arc::new(InMemoryTradeStore::new()),
            Arc::new(FixedClock::at("2025-06-25T14:30:22Z")) as Arc<dyn Clock>,
        );

        let form = resolver
            .prepare_open(open_form("42", "AAPL", "LONG"))
            .await
            .unwrap();
        let opened = journal.open(&form).unwrap();
        assert_eq!(opened.market_price_at_entry, Some(dec!(150.00)));
        assert_eq!(opened.entry_slippage().unwrap().diff, dec!(0.50));

        prices.set("AAPL", dec!(155.75));
        let (_, live) = resolver
            .live_position(&journal, &opened.trade_id, &OwnerId::from("42"))
            .await
            .unwrap();
        assert_eq!(live.pnl.pnl, dec!(525.00));

        let mut close = close_form(&opened.trade_id, "42", "x");
        close.exit_price = "MARKET".into();
        let close = resolver.prepare_close(&opened.symbol, close).await.unwrap();
        let closed = journal.close(&close).unwrap();
        let exit = closed.exit.unwrap();
        assert_eq!(exit.exit_price, dec!(155.75));
        assert_eq!(exit.market_price_at_exit, Some(dec!(155.75)));
    }

    #[tokio::test]
    async fn prices_preserve_input_order() {
        let resolver = PriceResolver::new(Arc::new(StaticPrices::new().with("SPY", dec!(1))));
        let symbols = vec![Symbol::parse("QQQ").unwrap(), spy()];

        let prices = resolver.prices(&symbols).await;
        assert_eq!(prices[0], (symbols[0].clone(), None));
        assert_eq!(prices[1], (spy(), Some(dec!(1))));
    }
}
