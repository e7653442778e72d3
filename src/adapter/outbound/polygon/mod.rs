//! Polygon.io market data adapter.

mod client;
mod dto;

pub use client::Polygon;
