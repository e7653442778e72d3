//! Application services (use cases).
//!
//! These services orchestrate domain logic over the outbound ports. The
//! lifecycle and analytics services are synchronous; only price resolution
//! touches the network.

pub mod analytics;
pub mod journal;
pub mod pricing;

pub use analytics::Analytics;
pub use journal::TradeJournal;
pub use pricing::{PriceResolver, ResolvedPrice};
