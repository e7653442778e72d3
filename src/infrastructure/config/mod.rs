//! Infrastructure configuration modules.

pub mod journal;
pub mod logging;
pub mod market_data;
pub mod settings;

pub use settings::Config;
