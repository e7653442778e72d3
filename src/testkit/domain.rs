//! Builders for domain values used across tests.
//!
//! Every form built here uses LONG-friendly defaults: entry 150.50, quantity
//! 100, so closing at 155.75 with 2.50 commission realizes 522.50.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{
    CloseTradeForm, OpenTradeForm, Symbol, TradeClose, TradeId, TradeRecord,
};
use crate::error::{Error, Result};
use crate::port::{Clock, PriceSource, Quote};

/// Instant used by [`open_record`].
pub const FIXED_NOW: &str = "2025-06-25T14:30:22Z";

fn parse_instant(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid RFC3339 instant")
        .with_timezone(&Utc)
}

/// A [`Clock`] that only moves when told to.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Start at an RFC3339 instant. Panics on malformed input.
    pub fn at(rfc3339: &str) -> Self {
        Self {
            now: Mutex::new(parse_instant(rfc3339)),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        *self.now.lock() += Duration::seconds(secs);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// A [`PriceSource`] serving prices from a map.
///
/// Symbols in the map are valid, all others unknown. A failing source
/// returns [`Error::MarketData`] from every call.
#[derive(Default)]
pub struct StaticPrices {
    prices: Mutex<HashMap<String, Decimal>>,
    failing: bool,
}

impl StaticPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            prices: Mutex::default(),
            failing: true,
        }
    }

    #[must_use]
    pub fn with(self, symbol: &str, price: Decimal) -> Self {
        self.set(symbol, price);
        self
    }

    pub fn set(&self, symbol: &str, price: Decimal) {
        self.prices.lock().insert(symbol.to_uppercase(), price);
    }

    fn lookup(&self, symbol: &Symbol) -> Result<Option<Decimal>> {
        if self.failing {
            return Err(Error::MarketData("scripted failure".into()));
        }
        Ok(self.prices.lock().get(symbol.as_str()).copied())
    }
}

#[async_trait]
impl PriceSource for StaticPrices {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn current_price(&self, symbol: &Symbol) -> Result<Option<Decimal>> {
        self.lookup(symbol)
    }

    async fn quote(&self, symbol: &Symbol) -> Result<Option<Quote>> {
        Ok(self.lookup(symbol)?.map(|p| Quote {
            bid: Some(p),
            ask: Some(p),
        }))
    }

    async fn previous_close(&self, symbol: &Symbol) -> Result<Option<Decimal>> {
        self.lookup(symbol)
    }

    async fn validate_symbol(&self, symbol: &Symbol) -> Result<bool> {
        Ok(self.lookup(symbol)?.is_some())
    }
}

/// Open form: entry 150.50, quantity 100, reason "Breakout".
pub fn open_form(owner: &str, symbol: &str, direction: &str) -> OpenTradeForm {
    OpenTradeForm::new(owner, "trader", symbol, direction, "150.50", "100", "Breakout")
}

/// Close form with reason "Target" and no commission.
pub fn close_form(trade_id: &TradeId, owner: &str, exit_price: &str) -> CloseTradeForm {
    CloseTradeForm::new(trade_id.clone(), owner, exit_price, "Target")
}

/// OPEN record from [`open_form`] created at [`FIXED_NOW`].
pub fn open_record(owner: &str, symbol: &str) -> TradeRecord {
    open_record_at(owner, symbol, "LONG", parse_instant(FIXED_NOW))
}

pub fn open_record_at(
    owner: &str,
    symbol: &str,
    direction: &str,
    at: DateTime<Utc>,
) -> TradeRecord {
    let input = open_form(owner, symbol, direction)
        .validate()
        .expect("valid open form");
    TradeRecord::open(TradeId::generate(&input.symbol, at), input, at)
}

/// Close patch for `record` at `exit_price`, one hour after entry.
pub fn close_patch(record: &TradeRecord, exit_price: &str) -> TradeClose {
    let close = close_form(&record.trade_id, record.owner_id.as_str(), exit_price)
        .validate()
        .expect("valid close form");
    record
        .settle(&close, record.entry_timestamp + Duration::hours(1))
        .expect("representable close")
}

/// `record` closed at `exit_price`.
pub fn closed_record(record: &TradeRecord, exit_price: &str) -> TradeRecord {
    let mut closed = record.clone();
    closed.apply_close(close_patch(record, exit_price));
    closed
}
