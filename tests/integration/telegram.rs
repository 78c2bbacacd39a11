//! Integration tests for Telegram delivery

use bandwatch::error::DeliveryError;
use bandwatch::models::signal::{AlertRecord, BreakoutDirection, IndicatorSnapshot};
use bandwatch::services::notifier::{AlertFormatter, Notifier, TelegramNotifier};
use bandwatch::signals::policy::RulePolicy;
use chrono::Utc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::test_utils::{send_message_path, telegram_settings, CHAT_ID};

fn notifier(server: &MockServer) -> TelegramNotifier {
    TelegramNotifier::new(
        telegram_settings(server),
        AlertFormatter::new(RulePolicy::squeeze_breakout()),
    )
    .expect("build notifier")
}

fn sample_alert() -> AlertRecord {
    AlertRecord {
        instrument: "KRW-XRP".to_string(),
        snapshot: IndicatorSnapshot {
            rsi: 44.1,
            upper_band: 812.0,
            middle_band: 810.0,
            lower_band: 808.0,
            band_width_pct: 0.49,
            price: 806.0,
        },
        breakout: Some(BreakoutDirection::Lower),
        triggered_at: Utc::now(),
    }
}

#[tokio::test]
async fn send_text_posts_html_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .and(body_string_contains(format!("chat_id={}", CHAT_ID)))
        .and(body_string_contains("parse_mode=HTML"))
        .and(body_string_contains("text=hello"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    notifier(&server)
        .send_text("hello")
        .await
        .expect("message accepted");
}

#[tokio::test]
async fn deliver_renders_every_alert() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    notifier(&server)
        .deliver(&[sample_alert()])
        .await
        .expect("delivered");

    let requests = server.received_requests().await.expect("recorded requests");
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("XRP"));
    assert!(body.contains("parse_mode=HTML"));
}

#[tokio::test]
async fn rejected_message_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"ok":false,"description":"Unauthorized"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = notifier(&server).deliver(&[sample_alert()]).await;
    match result {
        Err(DeliveryError::Rejected { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("Unauthorized"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn oversized_batch_is_sent_in_several_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(3)
        .mount(&server)
        .await;

    // room for the header, footer and one alert block per message
    let notifier = notifier(&server).with_max_message_chars(400);
    let alerts = vec![sample_alert(), sample_alert(), sample_alert()];
    notifier.deliver(&alerts).await.expect("delivered");

    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 3);
    for request in &requests {
        assert!(String::from_utf8_lossy(&request.body).contains("XRP"));
    }
}
