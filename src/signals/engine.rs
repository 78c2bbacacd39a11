//! Main signal evaluation engine: indicator snapshot plus rule policy.

use crate::error::InsufficientData;
use crate::indicators::{compute_bollinger_bands, compute_rsi};
use crate::models::market::PriceSeries;
use crate::models::signal::{AlertRecord, IndicatorSnapshot};
use crate::signals::policy::{IndicatorParams, RulePolicy};

pub const MIN_SERIES_LEN: usize = 50;

/// Evaluates one instrument's series against a [`RulePolicy`].
#[derive(Debug, Clone)]
pub struct SignalEvaluator {
    params: IndicatorParams,
    policy: RulePolicy,
    min_series_len: usize,
}

impl Default for SignalEvaluator {
    fn default() -> Self {
        Self::new(IndicatorParams::default(), RulePolicy::default())
    }
}

impl SignalEvaluator {
    pub fn new(params: IndicatorParams, policy: RulePolicy) -> Self {
        Self {
            params,
            policy,
            min_series_len: MIN_SERIES_LEN,
        }
    }

    /// Override the minimum series length (never below the indicator warm-up).
    pub fn with_min_series_len(mut self, min_series_len: usize) -> Self {
        self.min_series_len = min_series_len;
        self
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    pub fn policy(&self) -> &RulePolicy {
        &self.policy
    }

    pub fn min_series_len(&self) -> usize {
        self.min_series_len.max(self.params.warm_up_len())
    }

    /// Evaluate the series, collapsing insufficient data into `None`.
    pub fn evaluate(&self, series: &PriceSeries) -> Option<AlertRecord> {
        self.assess(series).ok().flatten()
    }

    /// Evaluate the series, keeping "insufficient data" apart from "rule did not fire".
    pub fn assess(&self, series: &PriceSeries) -> Result<Option<AlertRecord>, InsufficientData> {
        let snapshot = self.snapshot(series)?;
        let Some(latest) = series.latest() else {
            return Err(InsufficientData::TooShort {
                len: 0,
                min: self.min_series_len(),
            });
        };

        let rsi_ok = snapshot.rsi <= self.policy.rsi_max;
        let band_width_ok = snapshot.band_width_pct <= self.policy.band_width_max_pct;
        let breakout = snapshot.breakout();

        let fires =
            rsi_ok && band_width_ok && (breakout.is_some() || !self.policy.require_breakout);
        if !fires {
            return Ok(None);
        }

        Ok(Some(AlertRecord {
            instrument: series.instrument.clone(),
            snapshot,
            breakout,
            triggered_at: latest.timestamp,
        }))
    }

    /// Compute the latest indicator readings for the series.
    pub fn snapshot(&self, series: &PriceSeries) -> Result<IndicatorSnapshot, InsufficientData> {
        let min = self.min_series_len();
        if series.len() < min {
            return Err(InsufficientData::TooShort {
                len: series.len(),
                min,
            });
        }

        let closes = series.closes();
        let rsi = compute_rsi(&closes, self.params.rsi_period);
        let bands = compute_bollinger_bands(
            &closes,
            self.params.bollinger_period,
            self.params.std_dev_multiplier,
        );

        let price = last_defined(Some(closes.last().copied()), "price")?;
        let rsi = last_defined(rsi.last().copied(), "rsi")?;
        let upper_band = last_defined(bands.upper.last().copied(), "upper band")?;
        let middle_band = last_defined(bands.middle.last().copied(), "middle band")?;
        let lower_band = last_defined(bands.lower.last().copied(), "lower band")?;
        let band_width_pct = last_defined(bands.band_width_pct.last().copied(), "band width")?;

        Ok(IndicatorSnapshot {
            rsi,
            upper_band,
            middle_band,
            lower_band,
            band_width_pct,
            price,
        })
    }
}

fn last_defined(
    value: Option<Option<f64>>,
    indicator: &'static str,
) -> Result<f64, InsufficientData> {
    value
        .flatten()
        .filter(|v| v.is_finite())
        .ok_or(InsufficientData::Undefined { indicator })
}
