//! Upbit market data provider implementation

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, warn};

use super::messages::MinuteCandle;
use crate::config::UpbitSettings;
use crate::error::ProviderError;
use crate::models::market::{PricePoint, PriceSeries};
use crate::services::market_data::PriceProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct UpbitPriceProvider {
    client: reqwest::Client,
    settings: UpbitSettings,
}

impl UpbitPriceProvider {
    pub fn new(settings: UpbitSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(settings, client))
    }

    pub fn with_client(settings: UpbitSettings, client: reqwest::Client) -> Self {
        Self { client, settings }
    }

    fn candles_url(&self) -> String {
        format!(
            "{}/candles/minutes/{}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.candle_unit_minutes
        )
    }

    async fn fetch_once(&self, instrument: &str) -> Result<PriceSeries, ProviderError> {
        let count = self.settings.candle_count.to_string();
        let response = self
            .client
            .get(self.candles_url())
            .query(&[("market", instrument), ("count", count.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let candles: Vec<MinuteCandle> = serde_json::from_str(&body)?;
        if candles.is_empty() {
            return Err(ProviderError::Empty(instrument.to_string()));
        }

        // Upbit returns newest first.
        let mut points = candles
            .iter()
            .map(MinuteCandle::to_price_point)
            .collect::<Result<Vec<PricePoint>, _>>()?;
        points.sort_by_key(|p| p.timestamp);

        debug!(
            instrument = %instrument,
            count = points.len(),
            "Upbit: fetched {} candles for {}",
            points.len(),
            instrument
        );

        Ok(PriceSeries::new(instrument, points))
    }
}

#[async_trait::async_trait]
impl PriceProvider for UpbitPriceProvider {
    async fn fetch_series(&self, instrument: &str) -> Result<PriceSeries, ProviderError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.settings.retry_min_delay)
            .with_max_times(self.settings.max_retries);

        (|| async { self.fetch_once(instrument).await })
            .retry(backoff)
            .when(|e: &ProviderError| e.is_transient())
            .notify(|e: &ProviderError, delay: Duration| {
                warn!(
                    instrument = %instrument,
                    error = %e,
                    retry_in_ms = delay.as_millis() as u64,
                    "Upbit: transient failure for {}, retrying",
                    instrument
                );
            })
            .await
    }
}
