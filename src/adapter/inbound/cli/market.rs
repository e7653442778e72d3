//! Handlers for `price` and `quote`.

use serde_json::json;

use super::context::Context;
use super::output;
use crate::domain::Symbol;
use crate::error::{ConfigError, Error, Result};

fn parse_symbols(raw: &[String]) -> Result<Vec<Symbol>> {
    raw.iter()
        .map(|s| Symbol::parse(s).map_err(Error::from))
        .collect()
}

/// Execute `price`.
pub async fn execute_price(ctx: &Context, raw: &[String]) -> Result<()> {
    let max = ctx.config.market_data.max_symbols;
    if raw.len() > max {
        return Err(ConfigError::InvalidValue {
            field: "symbols",
            reason: format!("at most {max} symbols per request"),
        }
        .into());
    }
    let symbols = parse_symbols(raw)?;
    let prices = ctx.prices.prices(&symbols).await;

    if output::is_json() {
        let rows: Vec<_> = prices
            .iter()
            .map(|(symbol, price)| json!({ "symbol": symbol, "price": price }))
            .collect();
        output::json_output(json!({
            "command": "market.price",
            "source": ctx.prices.source().name(),
            "prices": rows,
        }));
        return Ok(());
    }

    output::section("Prices");
    for (symbol, price) in &prices {
        match price {
            Some(price) => output::field(symbol.as_str(), format!("${price}")),
            None => output::field(symbol.as_str(), output::muted("unavailable")),
        }
    }
    if prices.iter().all(|(_, p)| p.is_none()) {
        output::hint("set POLYGON_API_KEY to enable live prices");
    }
    Ok(())
}

/// Execute `quote`.
pub async fn execute_quote(ctx: &Context, raw: &str) -> Result<()> {
    let symbol = Symbol::parse(raw)?;
    let source = ctx.prices.source();
    let quote = source.quote(&symbol).await?;
    let previous_close = source.previous_close(&symbol).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "market.quote",
            "symbol": symbol,
            "quote": quote,
            "spread": quote.map(|q| q.spread()),
            "previous_close": previous_close,
        }));
        return Ok(());
    }

    output::section(&format!("Quote {symbol}"));
    match quote {
        Some(quote) => {
            let side = |v: Option<rust_decimal::Decimal>| {
                v.map_or_else(|| output::muted("-"), |p| format!("${p}"))
            };
            output::field("Bid", side(quote.bid));
            output::field("Ask", side(quote.ask));
            output::field("Spread", format!("${}", quote.spread()));
        }
        None => output::field("Quote", output::muted("unavailable")),
    }
    if let Some(close) = previous_close {
        output::field("Prev close", format!("${close}"));
    }
    Ok(())
}
