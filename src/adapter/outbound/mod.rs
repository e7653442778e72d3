//! Outbound adapters (driven side).

pub mod memory;
pub mod polygon;
pub mod sqlite;
