//! Dry-run notifier that writes the rendered message to the log.

use chrono::Utc;
use tracing::info;

use super::{AlertFormatter, Notifier};
use crate::error::DeliveryError;
use crate::models::signal::AlertRecord;

pub struct LogNotifier {
    formatter: AlertFormatter,
}

impl LogNotifier {
    pub fn new(formatter: AlertFormatter) -> Self {
        Self { formatter }
    }
}

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, alerts: &[AlertRecord]) -> Result<(), DeliveryError> {
        let message = self.formatter.render(alerts, Utc::now());
        info!(alert_count = alerts.len(), "Dry run, message not sent:\n{}", message);
        Ok(())
    }
}
