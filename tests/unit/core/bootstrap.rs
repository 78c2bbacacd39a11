//! Unit tests for startup wiring

use std::collections::HashMap;
use std::time::Duration;

use bandwatch::config::AppConfig;
use bandwatch::core::bootstrap::{build_notifier, build_scan_cycle, build_scanner};
use bandwatch::signals::engine::SignalEvaluator;

use crate::fixtures::{series, upper_breakout_closes};

fn config(pairs: &[(&str, &str)]) -> AppConfig {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap()
}

#[test]
fn test_scanner_uses_configured_thresholds() {
    let config = config(&[
        ("DRY_RUN", "1"),
        ("RSI_THRESHOLD", "40"),
        ("MIN_SERIES_LEN", "30"),
        ("FETCH_DELAY_MS", "0"),
    ]);
    let scanner = build_scanner(&config);

    assert_eq!(scanner.evaluator().policy().rsi_max, 40.0);
    assert_eq!(scanner.evaluator().min_series_len(), 30);
    assert_eq!(config.fetch_delay, Duration::ZERO);

    // RSI 45 no longer passes a 40 ceiling
    let input = series("KRW-BTC", &upper_breakout_closes());
    assert!(SignalEvaluator::default().evaluate(&input).is_some());
    assert!(scanner.evaluator().evaluate(&input).is_none());
}

#[tokio::test]
async fn test_dry_run_notifier_only_logs() {
    let config = config(&[("DRY_RUN", "true")]);
    let notifier = build_notifier(&config).unwrap();

    let alert = SignalEvaluator::default()
        .evaluate(&series("KRW-BTC", &upper_breakout_closes()))
        .unwrap();
    assert!(notifier.deliver(&[alert]).await.is_ok());
}

#[test]
fn test_scan_cycle_builds_from_config() {
    let config = config(&[("TELEGRAM_BOT_TOKEN", "123:abc"), ("TELEGRAM_CHAT_ID", "42")]);
    assert!(build_notifier(&config).is_ok());
    assert!(build_scan_cycle(&config).is_ok());
}
