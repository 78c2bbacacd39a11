//! One scan-and-notify pass, with metrics and health bookkeeping.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::config::{AppConfig, DEFAULT_INSTRUMENTS};
use crate::core::http::HealthStatus;
use crate::core::scanner::InstrumentScanner;
use crate::metrics::Metrics;
use crate::services::market_data::PriceProvider;
use crate::services::notifier::Notifier;

/// Configuration for the scan cycle
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub instruments: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            instruments: DEFAULT_INSTRUMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            instruments: config.instruments.clone(),
        }
    }
}

/// What happened to the alerts of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    NothingToSend,
    Delivered,
    Failed,
}

/// Summary of one completed cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub instruments: usize,
    pub evaluated: usize,
    pub skipped: usize,
    pub alerts: Vec<String>,
    pub delivery: DeliveryOutcome,
}

/// Scan the configured instruments and hand any alerts to the notifier.
pub struct ScanCycle {
    config: RuntimeConfig,
    scanner: InstrumentScanner,
    provider: Arc<dyn PriceProvider>,
    notifier: Arc<dyn Notifier>,
    metrics: Option<Arc<Metrics>>,
    health: Option<Arc<RwLock<HealthStatus>>>,
}

impl ScanCycle {
    pub fn new(
        config: RuntimeConfig,
        scanner: InstrumentScanner,
        provider: Arc<dyn PriceProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            scanner,
            provider,
            notifier,
            metrics: None,
            health: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_health(mut self, health: Arc<RwLock<HealthStatus>>) -> Self {
        self.health = Some(health);
        self
    }

    /// Run one cycle to completion. Per-instrument and delivery failures are
    /// absorbed here and show up only in the report, logs and metrics.
    pub async fn run(&self) -> CycleReport {
        let started_at = Utc::now();
        let start = Instant::now();

        info!(
            instrument_count = self.config.instruments.len(),
            "ScanCycle: starting scan of {} instruments",
            self.config.instruments.len()
        );

        let report = self
            .scanner
            .scan_report(&self.config.instruments, self.provider.as_ref())
            .await;

        let delivery = if report.alerts.is_empty() {
            info!("ScanCycle: no instrument met the alert conditions");
            DeliveryOutcome::NothingToSend
        } else {
            match self.notifier.deliver(&report.alerts).await {
                Ok(()) => {
                    info!(
                        alert_count = report.alerts.len(),
                        "ScanCycle: delivered {} alerts",
                        report.alerts.len()
                    );
                    DeliveryOutcome::Delivered
                }
                Err(e) => {
                    error!(error = %e, "ScanCycle: alert delivery failed");
                    DeliveryOutcome::Failed
                }
            }
        };

        let elapsed = start.elapsed();
        let cycle = CycleReport {
            started_at,
            duration_ms: elapsed.as_millis() as u64,
            instruments: self.config.instruments.len(),
            evaluated: report.evaluated,
            skipped: report.skipped.len(),
            alerts: report.alerts.iter().map(|a| a.instrument.clone()).collect(),
            delivery,
        };

        if let Some(ref metrics) = self.metrics {
            metrics.scan_cycles_total.inc();
            metrics.scan_cycle_duration_seconds.observe(elapsed.as_secs_f64());
            metrics.alerts_fired_total.inc_by(report.alerts.len() as u64);
            for skipped in &report.skipped {
                metrics
                    .instruments_skipped_total
                    .with_label_values(&[skipped.reason.as_str()])
                    .inc();
            }
            match delivery {
                DeliveryOutcome::Delivered => metrics.notifications_sent_total.inc(),
                DeliveryOutcome::Failed => metrics.notifications_failed_total.inc(),
                DeliveryOutcome::NothingToSend => {}
            }
        }

        if let Some(ref health) = self.health {
            let mut health = health.write().await;
            health.last_cycle = Some(cycle.clone());
        }

        info!(
            duration_ms = cycle.duration_ms,
            evaluated = cycle.evaluated,
            skipped = cycle.skipped,
            alerts = cycle.alerts.len(),
            "ScanCycle: finished"
        );

        cycle
    }

    /// Record a cycle that never produced a report.
    pub fn record_failure(&self) {
        if let Some(ref metrics) = self.metrics {
            metrics.scan_cycle_failures_total.inc();
        }
    }
}
