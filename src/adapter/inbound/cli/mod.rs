//! Command-line interface for the trade journal.

pub mod command;
pub mod config;
pub mod context;
pub mod market;
pub mod output;
pub mod paths;
pub mod run;
pub mod stats;
pub mod trade;

pub use run::execute;
