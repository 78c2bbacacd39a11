//! Upbit REST market data.

pub mod messages;
pub mod provider;

pub use provider::UpbitPriceProvider;
