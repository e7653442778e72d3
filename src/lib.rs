//! Tradelog - trade journal with P&L tracking and performance analytics.
//!
//! Records discretionary trades (stocks and options), computes realized P&L
//! on close, and aggregates a trader's closed trades into performance
//! statistics.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Trade records, P&L arithmetic, analytics. No I/O.
//! - [`port`] - Traits the application depends on: trade store, price
//!   source, clock.
//! - [`application`] - Use cases: the open/close lifecycle, analytics, and
//!   live price resolution.
//! - [`adapter`] - SQLite and in-memory stores, the Polygon.io price source,
//!   and the CLI.
//! - [`infrastructure`] - Configuration and logging.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tradelog::adapter::outbound::memory::InMemoryTradeStore;
//! use tradelog::application::TradeJournal;
//! use tradelog::domain::{CloseTradeForm, OpenTradeForm};
//!
//! let journal = TradeJournal::new(Arc::new(InMemoryTradeStore::new()));
//! let opened = journal
//!     .open(&OpenTradeForm::new("42", "alex", "AAPL", "LONG", "150.50", "100", "Breakout"))
//!     .unwrap();
//! let closed = journal
//!     .close(&CloseTradeForm::new(opened.trade_id, "42", "155.75", "Target").with_commission("2.50"))
//!     .unwrap();
//! assert_eq!(closed.pnl().unwrap().to_string(), "522.50");
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
