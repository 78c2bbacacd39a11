//! Market data provider interface consumed by the instrument scanner.

use crate::error::ProviderError;
use crate::models::market::PriceSeries;

#[async_trait::async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetch the price series for one instrument, sorted oldest first.
    async fn fetch_series(&self, instrument: &str) -> Result<PriceSeries, ProviderError>;
}
