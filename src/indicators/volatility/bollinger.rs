//! Bollinger Bands indicator

use crate::common::math::{finite, RollingWindow};

pub const DEFAULT_BOLLINGER_PERIOD: usize = 20;
pub const DEFAULT_STD_DEV_MULTIPLIER: f64 = 2.0;

/// Band series aligned index-for-index with the input closes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    /// `(upper - lower) / middle * 100`
    pub band_width_pct: Vec<Option<f64>>,
}

impl BollingerSeries {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            upper: Vec::with_capacity(capacity),
            middle: Vec::with_capacity(capacity),
            lower: Vec::with_capacity(capacity),
            band_width_pct: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.middle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }
}

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev_multiplier * sample standard deviation)
/// Lower Band = Middle - (std_dev_multiplier * sample standard deviation)
///
/// Entries stay `None` until `period` closes are available. Band width is
/// also `None` when the middle band is zero.
pub fn compute_bollinger_bands(
    closes: &[f64],
    period: usize,
    std_dev_multiplier: f64,
) -> BollingerSeries {
    let mut series = BollingerSeries::with_capacity(closes.len());
    let mut window = RollingWindow::new(period);

    for &close in closes {
        window.push(close);

        let bands = match (window.mean(), window.sample_std_dev()) {
            (Some(middle), Some(std)) => {
                let upper = middle + std_dev_multiplier * std;
                let lower = middle - std_dev_multiplier * std;
                Some((finite(upper), finite(middle), finite(lower)))
            }
            _ => None,
        };

        let (upper, middle, lower) = bands.unwrap_or((None, None, None));
        let width = match (upper, middle, lower) {
            (Some(u), Some(m), Some(l)) if m != 0.0 => finite((u - l) / m * 100.0),
            _ => None,
        };

        series.upper.push(upper);
        series.middle.push(middle);
        series.lower.push(lower);
        series.band_width_pct.push(width);
    }

    series
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn compute_bollinger_bands_default(closes: &[f64]) -> BollingerSeries {
    compute_bollinger_bands(closes, DEFAULT_BOLLINGER_PERIOD, DEFAULT_STD_DEV_MULTIPLIER)
}
