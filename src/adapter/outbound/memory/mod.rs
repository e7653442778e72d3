//! In-process adapters for tests and ephemeral runs.

mod store;

pub use store::InMemoryTradeStore;
