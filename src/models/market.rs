use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One closing price sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self { timestamp, close }
    }
}

/// Price history for a single instrument, ordered oldest to newest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub instrument: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(instrument: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            instrument: instrument.into(),
            points,
        }
    }

    /// Build a series from bare closes spaced `step` apart, ending at `end`.
    pub fn from_closes(
        instrument: impl Into<String>,
        closes: &[f64],
        end: DateTime<Utc>,
        step: chrono::Duration,
    ) -> Self {
        let count = closes.len() as i32;
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(end - step * (count - 1 - i as i32), close))
            .collect();
        Self::new(instrument, points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}
