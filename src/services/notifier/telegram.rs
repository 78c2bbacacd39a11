//! Telegram Bot API delivery.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use super::{AlertFormatter, Notifier};
use crate::config::TelegramSettings;
use crate::error::DeliveryError;
use crate::models::signal::AlertRecord;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// `sendMessage` refuses longer texts.
pub const MAX_MESSAGE_CHARS: usize = 4096;

pub struct TelegramNotifier {
    client: reqwest::Client,
    settings: TelegramSettings,
    formatter: AlertFormatter,
    max_message_chars: usize,
}

impl TelegramNotifier {
    pub fn new(
        settings: TelegramSettings,
        formatter: AlertFormatter,
    ) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(settings, formatter, client))
    }

    pub fn with_client(
        settings: TelegramSettings,
        formatter: AlertFormatter,
        client: reqwest::Client,
    ) -> Self {
        Self {
            client,
            settings,
            formatter,
            max_message_chars: MAX_MESSAGE_CHARS,
        }
    }

    pub fn with_max_message_chars(mut self, max_message_chars: usize) -> Self {
        self.max_message_chars = max_message_chars;
        self
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.bot_token
        )
    }

    /// Send a pre-rendered HTML message.
    pub async fn send_text(&self, text: &str) -> Result<(), DeliveryError> {
        let form = [
            ("chat_id", self.settings.chat_id.as_str()),
            ("text", text),
            ("parse_mode", "HTML"),
        ];

        let response = self
            .client
            .post(self.send_message_url())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(chat_id = %self.settings.chat_id, "Telegram: message accepted");
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn deliver(&self, alerts: &[AlertRecord]) -> Result<(), DeliveryError> {
        let parts = self
            .formatter
            .render_parts(alerts, Utc::now(), self.max_message_chars);
        for part in &parts {
            self.send_text(part).await?;
        }
        info!(
            alert_count = alerts.len(),
            message_count = parts.len(),
            "Telegram: alert message delivered"
        );
        Ok(())
    }
}
