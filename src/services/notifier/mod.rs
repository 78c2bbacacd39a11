//! Alert delivery to a messaging sink.

pub mod format;
pub mod log;
pub mod telegram;

use crate::error::DeliveryError;
use crate::models::signal::AlertRecord;

pub use format::AlertFormatter;
pub use log::LogNotifier;
pub use telegram::TelegramNotifier;

/// Renders and delivers one cycle's alerts.
///
/// Implementations own their failure handling: a failed delivery is reported
/// to the caller once and never retried by the scan cycle.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, alerts: &[AlertRecord]) -> Result<(), DeliveryError>;
}
