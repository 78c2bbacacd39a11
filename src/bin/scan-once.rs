//! Bandwatch single scan
//!
//! Runs exactly one scan cycle and exits. Suited to external schedulers
//! such as CI cron jobs.

use bandwatch::config::AppConfig;
use bandwatch::core::bootstrap::build_scan_cycle;
use bandwatch::core::runtime::DeliveryOutcome;
use bandwatch::logging::{self, LoggingConfig};
use dotenvy::dotenv;
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    logging::init_logging(&LoggingConfig::from_app_config(&config))?;

    info!(environment = %config.environment, "Starting single Bandwatch scan");

    let cycle = build_scan_cycle(&config)?;
    let report = cycle.run().await;

    if report.delivery == DeliveryOutcome::Failed {
        warn!("Alerts fired but could not be delivered");
    }
    info!(
        alerts = report.alerts.len(),
        skipped = report.skipped,
        "Single scan complete"
    );

    Ok(())
}
