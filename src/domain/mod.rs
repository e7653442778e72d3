//! Storage-agnostic domain logic: trade records, P&L arithmetic, analytics.

pub mod analytics;
pub mod direction;
pub mod error;
pub mod form;
pub mod id;
pub mod pnl;
pub mod trade;

// Core domain types
pub use analytics::{AnalyticsSummary, Assessment, JournalSummary, ProfitFactor};
pub use direction::{Direction, TradeStatus};
pub use error::DomainError;
pub use form::{CloseTradeForm, OpenTradeForm, ValidatedClose, ValidatedOpen};
pub use id::{OwnerId, Symbol, TradeId};
pub use pnl::{compute_live_pnl, compute_pnl, LivePnl, Pnl};
pub use trade::{LivePosition, Slippage, TradeClose, TradeExit, TradeRecord};
