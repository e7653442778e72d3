//! Database model types for Diesel ORM.
//!
//! Decimals are stored as their canonical string form and timestamps as
//! RFC 3339 text with microsecond precision, so both round-trip exactly.

use diesel::prelude::*;

use super::schema::trades;

/// Database row for a trade (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = trades)]
pub struct NewTradeRow {
    pub trade_id: String,
    pub owner_id: String,
    pub owner_name: String,
    pub symbol: String,
    pub direction: String,
    pub entry_price: String,
    pub quantity: i64,
    pub entry_timestamp: String,
    pub stop_loss: Option<String>,
    pub take_profit: Option<String>,
    pub reason: String,
    pub setup_type: Option<String>,
    pub risk_amount: Option<String>,
    pub commission: String,
    pub market_price_at_entry: Option<String>,
    pub status: String,
    pub created_at: String,
}

/// Database row for a trade (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = trades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TradeRow {
    pub id: Option<i32>,
    pub trade_id: String,
    pub owner_id: String,
    pub owner_name: String,
    pub symbol: String,
    pub direction: String,
    pub entry_price: String,
    pub quantity: i64,
    pub entry_timestamp: String,
    pub stop_loss: Option<String>,
    pub take_profit: Option<String>,
    pub reason: String,
    pub setup_type: Option<String>,
    pub risk_amount: Option<String>,
    pub commission: String,
    pub market_price_at_entry: Option<String>,
    pub status: String,
    pub exit_price: Option<String>,
    pub exit_timestamp: Option<String>,
    pub exit_reason: Option<String>,
    pub pnl: Option<String>,
    pub pnl_percent: Option<String>,
    pub market_price_at_exit: Option<String>,
    pub created_at: String,
}

/// Columns written when a trade is closed.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = trades)]
#[diesel(treat_none_as_null = true)]
pub struct CloseTradeRow {
    pub status: String,
    pub commission: String,
    pub exit_price: Option<String>,
    pub exit_timestamp: Option<String>,
    pub exit_reason: Option<String>,
    pub pnl: Option<String>,
    pub pnl_percent: Option<String>,
    pub market_price_at_exit: Option<String>,
}
