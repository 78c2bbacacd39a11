//! Integration tests for the Upbit price provider

use bandwatch::error::ProviderError;
use bandwatch::services::market_data::PriceProvider;
use bandwatch::services::upbit::UpbitPriceProvider;
use chrono::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::test_utils::{candles_end, candles_json, mock_candles, upbit_settings, CANDLES_PATH};

fn provider(server: &MockServer) -> UpbitPriceProvider {
    UpbitPriceProvider::new(upbit_settings(server)).expect("build provider")
}

#[tokio::test]
async fn fetch_series_returns_oldest_first() {
    let server = MockServer::start().await;
    mock_candles(&server, "KRW-BTC", &[1.0, 2.0, 3.0]).await;

    let series = provider(&server)
        .fetch_series("KRW-BTC")
        .await
        .expect("series");

    assert_eq!(series.instrument, "KRW-BTC");
    assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    assert_eq!(series.latest().unwrap().timestamp, candles_end());
    assert_eq!(
        series.points[0].timestamp,
        candles_end() - Duration::hours(2)
    );
}

#[tokio::test]
async fn fetch_series_sends_market_and_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .and(query_param("market", "KRW-ETH"))
        .and(query_param("count", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candles_json("KRW-ETH", &[5.0])))
        .expect(1)
        .mount(&server)
        .await;

    let series = provider(&server).fetch_series("KRW-ETH").await;
    assert!(series.is_ok());
}

#[tokio::test]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&server)
        .await;

    let result = provider(&server).fetch_series("KRW-BTC").await;
    match result {
        Err(ProviderError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {:?}", other.map(|s| s.len())),
    }
}

#[tokio::test]
async fn transient_failure_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mock_candles(&server, "KRW-BTC", &[10.0, 11.0]).await;

    let series = provider(&server)
        .fetch_series("KRW-BTC")
        .await
        .expect("second attempt succeeds");
    assert_eq!(series.closes(), vec![10.0, 11.0]);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("Code not found"))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider(&server).fetch_series("KRW-NOPE").await;
    assert!(matches!(result, Err(ProviderError::Status { status: 404, .. })));
}

#[tokio::test]
async fn empty_payload_is_an_error() {
    let server = MockServer::start().await;
    mock_candles(&server, "KRW-BTC", &[]).await;

    let result = provider(&server).fetch_series("KRW-BTC").await;
    assert!(matches!(result, Err(ProviderError::Empty(ref m)) if m == "KRW-BTC"));
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"error\":"))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider(&server).fetch_series("KRW-BTC").await;
    assert!(matches!(result, Err(ProviderError::Decode(_))));
}

#[tokio::test]
async fn bad_timestamp_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "candle_date_time_utc": "yesterday", "trade_price": 1.0 }
        ])))
        .mount(&server)
        .await;

    let result = provider(&server).fetch_series("KRW-BTC").await;
    assert!(matches!(result, Err(ProviderError::InvalidTimestamp(ref t)) if t == "yesterday"));
}
