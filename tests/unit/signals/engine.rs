//! Unit tests for the signal evaluator

use bandwatch::error::InsufficientData;
use bandwatch::models::signal::BreakoutDirection;
use bandwatch::signals::engine::{SignalEvaluator, MIN_SERIES_LEN};
use bandwatch::signals::policy::{IndicatorParams, RulePolicy};

use crate::fixtures::{
    assert_close, constant_closes, linear_closes, series, series_end, spike_then_close,
    upper_breakout_closes,
};

#[test]
fn test_min_series_len_defaults_to_50() {
    let evaluator = SignalEvaluator::default();
    assert_eq!(MIN_SERIES_LEN, 50);
    assert_eq!(evaluator.min_series_len(), 50);
}

#[test]
fn test_min_series_len_never_below_warm_up() {
    let evaluator = SignalEvaluator::default().with_min_series_len(5);
    assert_eq!(evaluator.min_series_len(), 20);
}

#[test]
fn test_evaluate_insufficient_data() {
    let evaluator = SignalEvaluator::default();
    let short = series("KRW-BTC", &linear_closes(10, 100.0, 1.0));
    assert!(evaluator.evaluate(&short).is_none());
    assert_eq!(
        evaluator.assess(&short),
        Err(InsufficientData::TooShort { len: 10, min: 50 })
    );
}

#[test]
fn test_empty_series_is_too_short() {
    let evaluator = SignalEvaluator::default();
    let empty = series("KRW-BTC", &[]);
    assert_eq!(
        evaluator.assess(&empty),
        Err(InsufficientData::TooShort { len: 0, min: 50 })
    );
}

#[test]
fn test_one_point_short_of_minimum() {
    let closes = upper_breakout_closes();
    let trimmed = series("KRW-BTC", &closes[11..]);
    assert_eq!(trimmed.len(), 49);

    let evaluator = SignalEvaluator::default();
    assert_eq!(
        evaluator.assess(&trimmed),
        Err(InsufficientData::TooShort { len: 49, min: 50 })
    );

    let relaxed = SignalEvaluator::default().with_min_series_len(40);
    assert!(relaxed.evaluate(&trimmed).is_some());
}

#[test]
fn test_snapshot_values() {
    let evaluator = SignalEvaluator::default();
    let snapshot = evaluator
        .snapshot(&series("KRW-BTC", &upper_breakout_closes()))
        .unwrap();

    assert_close(snapshot.rsi, 45.0, 1e-6);
    assert_close(snapshot.middle_band, 100.02, 1e-9);
    assert_close(snapshot.upper_band, 100.14379949834097, 1e-6);
    assert_close(snapshot.lower_band, 99.89620050165905, 1e-6);
    assert_close(snapshot.band_width_pct, 0.2475494867845587, 1e-6);
    assert_close(snapshot.price, 100.18, 1e-9);
    assert_eq!(snapshot.breakout(), Some(BreakoutDirection::Upper));
}

#[test]
fn test_alert_carries_instrument_and_latest_timestamp() {
    let evaluator = SignalEvaluator::default();
    let alert = evaluator
        .evaluate(&series("KRW-ETH", &upper_breakout_closes()))
        .expect("rule should fire");

    assert_eq!(alert.instrument, "KRW-ETH");
    assert_eq!(alert.triggered_at, series_end());
    assert_eq!(alert.breakout, Some(BreakoutDirection::Upper));
}

#[test]
fn test_flat_series_does_not_fire() {
    // RSI 100 and zero width: squeezed, but not oversold and no breakout
    let evaluator = SignalEvaluator::default();
    let flat = series("KRW-BTC", &constant_closes(60, 100.0));
    let snapshot = evaluator.snapshot(&flat).unwrap();
    assert_eq!(snapshot.rsi, 100.0);
    assert_eq!(snapshot.band_width_pct, 0.0);
    assert_eq!(evaluator.assess(&flat), Ok(None));
}

#[test]
fn test_zero_prices_report_undefined_band_width() {
    let evaluator = SignalEvaluator::default();
    let zeros = series("KRW-BTC", &constant_closes(60, 0.0));
    assert_eq!(
        evaluator.assess(&zeros),
        Err(InsufficientData::Undefined {
            indicator: "band width"
        })
    );
}

#[test]
fn test_rsi_threshold_blocks_alert() {
    // RSI ~64.3 with an upper breakout inside a tight band
    let closes = spike_then_close(0.10, 0.18);
    let evaluator = SignalEvaluator::default();
    let snapshot = evaluator.snapshot(&series("KRW-BTC", &closes)).unwrap();
    assert_close(snapshot.rsi, 450.0 / 7.0, 1e-6);
    assert!(snapshot.upper_breakout());
    assert!(evaluator.evaluate(&series("KRW-BTC", &closes)).is_none());

    let lenient = SignalEvaluator::new(
        IndicatorParams::default(),
        RulePolicy::squeeze_breakout().with_rsi_max(70.0),
    );
    assert!(lenient.evaluate(&series("KRW-BTC", &closes)).is_some());
}

#[test]
fn test_thresholds_are_inclusive() {
    let closes = upper_breakout_closes();
    let evaluator = SignalEvaluator::default();
    let snapshot = evaluator.snapshot(&series("KRW-BTC", &closes)).unwrap();

    let exact = SignalEvaluator::new(
        IndicatorParams::default(),
        RulePolicy::squeeze_breakout()
            .with_rsi_max(snapshot.rsi)
            .with_band_width_max_pct(snapshot.band_width_pct),
    );
    assert!(exact.evaluate(&series("KRW-BTC", &closes)).is_some());
}

#[test]
fn test_custom_params_are_used() {
    let params = IndicatorParams {
        rsi_period: 5,
        bollinger_period: 10,
        std_dev_multiplier: 1.0,
    };
    let evaluator = SignalEvaluator::new(params, RulePolicy::default()).with_min_series_len(10);
    assert_eq!(evaluator.params(), &params);
    assert_eq!(evaluator.min_series_len(), 10);

    let snapshot = evaluator
        .snapshot(&series("KRW-BTC", &linear_closes(10, 1.0, 1.0)))
        .unwrap();
    assert_eq!(snapshot.rsi, 100.0);
    assert_close(snapshot.middle_band, 5.5, 1e-12);
}
