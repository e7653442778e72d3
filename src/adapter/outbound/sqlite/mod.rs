//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed [`TradeStore`](crate::port::TradeStore) using
//! Diesel ORM with embedded migrations.

pub mod database;
pub mod store;

pub use store::SqliteTradeStore;
