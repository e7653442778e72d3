//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  TradeJournal/Analytics │
//!                    └────────────┬────────────┘
//!                 ┌───────────────┼───────────────┐
//!                 ▼               ▼               ▼
//!           ┌───────────┐  ┌─────────────┐  ┌─────────┐
//!           │TradeStore │  │ PriceSource │  │  Clock  │
//!           └───────────┘  └─────────────┘  └─────────┘
//! ```

pub mod outbound;

pub use outbound::clock::{Clock, SystemClock};
pub use outbound::market::{NoPrices, PriceSource, Quote};
pub use outbound::store::{TradeQuery, TradeStore};
