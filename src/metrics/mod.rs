//! Prometheus metrics for scan cycles and notifications.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub scan_cycles_total: IntCounter,
    pub scan_cycle_failures_total: IntCounter,
    pub alerts_fired_total: IntCounter,
    pub instruments_skipped_total: IntCounterVec,
    pub notifications_sent_total: IntCounter,
    pub notifications_failed_total: IntCounter,
    pub scan_cycle_duration_seconds: Histogram,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let scan_cycles_total = IntCounter::new("scan_cycles_total", "Completed scan cycles")?;
        let scan_cycle_failures_total = IntCounter::new(
            "scan_cycle_failures_total",
            "Scan cycles that aborted before completing",
        )?;
        let alerts_fired_total =
            IntCounter::new("alerts_fired_total", "Alerts produced by the signal evaluator")?;
        let instruments_skipped_total = IntCounterVec::new(
            Opts::new(
                "instruments_skipped_total",
                "Instruments skipped during a scan, by reason",
            ),
            &["reason"],
        )?;
        let notifications_sent_total =
            IntCounter::new("notifications_sent_total", "Alert messages delivered")?;
        let notifications_failed_total =
            IntCounter::new("notifications_failed_total", "Alert messages that failed to deliver")?;
        let scan_cycle_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "scan_cycle_duration_seconds",
            "Wall-clock duration of a scan cycle",
        ))?;

        let http_requests_total = IntCounter::new("http_requests_total", "HTTP requests served")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;

        registry.register(Box::new(scan_cycles_total.clone()))?;
        registry.register(Box::new(scan_cycle_failures_total.clone()))?;
        registry.register(Box::new(alerts_fired_total.clone()))?;
        registry.register(Box::new(instruments_skipped_total.clone()))?;
        registry.register(Box::new(notifications_sent_total.clone()))?;
        registry.register(Box::new(notifications_failed_total.clone()))?;
        registry.register(Box::new(scan_cycle_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            scan_cycles_total,
            scan_cycle_failures_total,
            alerts_fired_total,
            instruments_skipped_total,
            notifications_sent_total,
            notifications_failed_total,
            scan_cycle_duration_seconds,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
        })
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
