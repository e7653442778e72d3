//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: trade storage,
//! market data, and the clock.

pub mod clock;
pub mod market;
pub mod store;
