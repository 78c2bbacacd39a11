//! Upbit REST payloads.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::ProviderError;
use crate::models::market::PricePoint;

const CANDLE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One entry of `GET /candles/minutes/{unit}`. Unused fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MinuteCandle {
    pub candle_date_time_utc: String,
    pub trade_price: f64,
}

impl MinuteCandle {
    pub fn opened_at(&self) -> Result<DateTime<Utc>, ProviderError> {
        NaiveDateTime::parse_from_str(&self.candle_date_time_utc, CANDLE_TIME_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|_| ProviderError::InvalidTimestamp(self.candle_date_time_utc.clone()))
    }

    pub fn to_price_point(&self) -> Result<PricePoint, ProviderError> {
        Ok(PricePoint::new(self.opened_at()?, self.trade_price))
    }
}
