//! Polygon.io REST response bodies. Only the fields we read are modelled.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Status string Polygon sets on successful responses.
pub const STATUS_OK: &str = "OK";

/// `GET /v2/last/trade/{ticker}`
#[derive(Debug, Deserialize)]
pub struct LastTradeResponse {
    #[serde(default)]
    pub status: String,
    pub results: Option<LastTrade>,
}

#[derive(Debug, Deserialize)]
pub struct LastTrade {
    /// Trade price.
    pub p: Option<f64>,
}

/// `GET /v2/last/nbbo/{ticker}`
#[derive(Debug, Deserialize)]
pub struct LastQuoteResponse {
    #[serde(default)]
    pub status: String,
    pub results: Option<LastQuote>,
}

#[derive(Debug, Deserialize)]
pub struct LastQuote {
    /// Ask price.
    #[serde(rename = "P")]
    pub ask: Option<f64>,
    /// Bid price.
    #[serde(rename = "p")]
    pub bid: Option<f64>,
}

/// `GET /v2/aggs/ticker/{ticker}/prev`
#[derive(Debug, Deserialize)]
pub struct PreviousCloseResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub results: Vec<Aggregate>,
}

#[derive(Debug, Deserialize)]
pub struct Aggregate {
    /// Close price.
    pub c: Option<f64>,
}

/// `GET /v3/reference/tickers/{ticker}`
#[derive(Debug, Deserialize)]
pub struct TickerDetailsResponse {
    #[serde(default)]
    pub status: String,
}

/// Convert a JSON float to a decimal, dropping non-finite values.
pub fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(Decimal::from_f64)
}

impl LastTradeResponse {
    pub fn price(&self) -> Option<Decimal> {
        if self.status != STATUS_OK {
            return None;
        }
        to_decimal(self.results.as_ref()?.p)
    }
}

impl PreviousCloseResponse {
    pub fn close(&self) -> Option<Decimal> {
        if self.status != STATUS_OK {
            return None;
        }
        to_decimal(self.results.first()?.c)
    }
}
