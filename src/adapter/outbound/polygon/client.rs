//! Polygon.io REST client.
//!
//! Implements [`PriceSource`] against the Polygon.io v2/v3 REST API. Each
//! call is a single GET with the configured timeout; there is no retry or
//! caching.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::dto::{
    to_decimal, LastQuoteResponse, LastTradeResponse, PreviousCloseResponse,
    TickerDetailsResponse, STATUS_OK,
};
use crate::domain::Symbol;
use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::config::market_data::{MarketDataConfig, API_KEY_ENV};
use crate::port::{PriceSource, Quote};

/// Polygon.io API client.
#[derive(Debug)]
pub struct Polygon {
    /// HTTP client for API requests.
    client: Client,
    base_url: Url,
    /// Sent as the `apikey` query parameter.
    api_key: String,
}

impl Polygon {
    /// Create a client with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            field: "market_data.base_url",
            reason: e.to_string(),
        })?;
        // Url::join drops the last path segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Create a client from market data settings.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key was loaded from `POLYGON_API_KEY`.
    pub fn from_config(config: &MarketDataConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingField { field: API_KEY_ENV })?;
        Self::new(
            &config.base_url,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::MarketData(format!("bad endpoint {path}: {e}")))
    }

    /// GET `path` and decode the body. A 404 is `Ok(None)`; any other
    /// non-success status is an error.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .get(url)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(path, "Polygon returned 404");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::MarketData(format!("polygon {path}: HTTP {status}")));
        }
        Ok(Some(response.json::<T>().await?))
    }
}

#[async_trait]
impl PriceSource for Polygon {
    fn name(&self) -> &'static str {
        "polygon"
    }

    async fn current_price(&self, symbol: &Symbol) -> Result<Option<Decimal>> {
        let body: Option<LastTradeResponse> = self
            .get_json(&format!("/v2/last/trade/{symbol}"))
            .await?;
        Ok(body.and_then(|b| b.price()))
    }

    async fn quote(&self, symbol: &Symbol) -> Result<Option<Quote>> {
        let body: Option<LastQuoteResponse> = self
            .get_json(&format!("/v2/last/nbbo/{symbol}"))
            .await?;
        Ok(body
            .filter(|b| b.status == STATUS_OK)
            .and_then(|b| b.results)
            .map(|q| Quote {
                bid: to_decimal(q.bid),
                ask: to_decimal(q.ask),
            }))
    }

    async fn previous_close(&self, symbol: &Symbol) -> Result<Option<Decimal>> {
        let body: Option<PreviousCloseResponse> = self
            .get_json(&format!("/v2/aggs/ticker/{symbol}/prev"))
            .await?;
        Ok(body.and_then(|b| b.close()))
    }

    async fn validate_symbol(&self, symbol: &Symbol) -> Result<bool> {
        let body: Option<TickerDetailsResponse> = self
            .get_json(&format!("/v3/reference/tickers/{symbol}"))
            .await?;
        Ok(body.is_some_and(|b| b.status == STATUS_OK))
    }
}
