//! Wiring of configuration into a runnable scan cycle.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::core::runtime::{RuntimeConfig, ScanCycle};
use crate::core::scanner::InstrumentScanner;
use crate::services::market_data::PriceProvider;
use crate::services::notifier::{AlertFormatter, LogNotifier, Notifier, TelegramNotifier};
use crate::services::upbit::UpbitPriceProvider;
use crate::signals::engine::SignalEvaluator;

pub fn build_scanner(config: &AppConfig) -> InstrumentScanner {
    let evaluator = SignalEvaluator::new(config.indicators, config.policy)
        .with_min_series_len(config.min_series_len);
    InstrumentScanner::new(evaluator).with_fetch_delay(config.fetch_delay)
}

pub fn build_notifier(
    config: &AppConfig,
) -> Result<Arc<dyn Notifier>, Box<dyn std::error::Error + Send + Sync>> {
    let formatter = AlertFormatter::new(config.policy);
    match (&config.telegram, config.dry_run) {
        (Some(telegram), false) => {
            info!(chat_id = %telegram.chat_id, "Alerts will be sent to Telegram");
            Ok(Arc::new(TelegramNotifier::new(telegram.clone(), formatter)?))
        }
        (_, true) => {
            warn!("DRY_RUN enabled, alerts will only be logged");
            Ok(Arc::new(LogNotifier::new(formatter)))
        }
        (None, false) => Err("Telegram credentials are required unless DRY_RUN is set".into()),
    }
}

/// Build the scan cycle described by `config`.
pub fn build_scan_cycle(
    config: &AppConfig,
) -> Result<ScanCycle, Box<dyn std::error::Error + Send + Sync>> {
    let provider: Arc<dyn PriceProvider> = Arc::new(UpbitPriceProvider::new(config.upbit.clone())?);
    let notifier = build_notifier(config)?;

    info!(
        instruments = ?config.instruments,
        rsi_max = config.policy.rsi_max,
        band_width_max_pct = config.policy.band_width_max_pct,
        require_breakout = config.policy.require_breakout,
        "Monitoring {} instruments",
        config.instruments.len()
    );

    Ok(ScanCycle::new(
        RuntimeConfig::from_app_config(config),
        build_scanner(config),
        provider,
        notifier,
    ))
}
