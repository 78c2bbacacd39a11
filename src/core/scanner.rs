//! Instrument scanner: fetch, evaluate, collect, one instrument at a time.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::InsufficientData;
use crate::models::signal::AlertRecord;
use crate::services::market_data::PriceProvider;
use crate::signals::engine::SignalEvaluator;

/// Default pause between consecutive price fetches.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    ProviderError,
    InsufficientData,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::ProviderError => "provider_error",
            SkipReason::InsufficientData => "insufficient_data",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedInstrument {
    pub instrument: String,
    pub reason: SkipReason,
    pub detail: String,
}

/// Outcome of one pass over the instrument list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Fired alerts, in instrument configuration order.
    pub alerts: Vec<AlertRecord>,
    pub skipped: Vec<SkippedInstrument>,
    /// Instruments that reached the rule check, fired or not.
    pub evaluated: usize,
}

#[derive(Debug, Clone)]
pub struct InstrumentScanner {
    evaluator: SignalEvaluator,
    fetch_delay: Duration,
}

impl InstrumentScanner {
    pub fn new(evaluator: SignalEvaluator) -> Self {
        Self {
            evaluator,
            fetch_delay: DEFAULT_FETCH_DELAY,
        }
    }

    pub fn with_fetch_delay(mut self, fetch_delay: Duration) -> Self {
        self.fetch_delay = fetch_delay;
        self
    }

    pub fn evaluator(&self) -> &SignalEvaluator {
        &self.evaluator
    }

    /// Scan every instrument and return the alerts that fired, in input order.
    pub async fn scan<P>(&self, instruments: &[String], provider: &P) -> Vec<AlertRecord>
    where
        P: PriceProvider + ?Sized,
    {
        self.scan_report(instruments, provider).await.alerts
    }

    /// Scan every instrument, keeping a record of the ones that were skipped.
    ///
    /// Fetches are issued serially with `fetch_delay` between them. A failure
    /// for one instrument is logged and recorded; it never stops the scan.
    pub async fn scan_report<P>(&self, instruments: &[String], provider: &P) -> ScanReport
    where
        P: PriceProvider + ?Sized,
    {
        let mut report = ScanReport::default();

        for (index, instrument) in instruments.iter().enumerate() {
            if index > 0 && !self.fetch_delay.is_zero() {
                tokio::time::sleep(self.fetch_delay).await;
            }

            let series = match provider.fetch_series(instrument).await {
                Ok(series) => series,
                Err(e) => {
                    warn!(
                        instrument = %instrument,
                        error = %e,
                        "Scanner: skipping {}, price fetch failed",
                        instrument
                    );
                    report.skipped.push(SkippedInstrument {
                        instrument: instrument.clone(),
                        reason: SkipReason::ProviderError,
                        detail: e.to_string(),
                    });
                    continue;
                }
            };

            match self.evaluator.assess(&series) {
                Ok(Some(alert)) => {
                    report.evaluated += 1;
                    info!(
                        instrument = %instrument,
                        rsi = alert.snapshot.rsi,
                        band_width_pct = alert.snapshot.band_width_pct,
                        breakout = ?alert.breakout,
                        "Scanner: rule fired for {} (RSI {:.2}, band width {:.3}%)",
                        instrument,
                        alert.snapshot.rsi,
                        alert.snapshot.band_width_pct
                    );
                    report.alerts.push(alert);
                }
                Ok(None) => {
                    report.evaluated += 1;
                    debug!(instrument = %instrument, "Scanner: no signal for {}", instrument);
                }
                Err(e) => {
                    log_insufficient(instrument, &e);
                    report.skipped.push(SkippedInstrument {
                        instrument: instrument.clone(),
                        reason: SkipReason::InsufficientData,
                        detail: e.to_string(),
                    });
                }
            }
        }

        report
    }
}

fn log_insufficient(instrument: &str, error: &InsufficientData) {
    warn!(
        instrument = %instrument,
        error = %error,
        "Scanner: skipping {}, insufficient data",
        instrument
    );
}
