//! Shared data models spanning the engine layers.

pub mod market;
pub mod signal;

pub use market::{PricePoint, PriceSeries};
pub use signal::{AlertRecord, BreakoutDirection, IndicatorSnapshot};
