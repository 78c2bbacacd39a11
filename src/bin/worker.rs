//! Bandwatch Worker
//!
//! Runs a scan cycle on a cron schedule (hourly by default) until Ctrl-C.
//! Optionally serves /health and /metrics when HTTP_PORT is set.

use bandwatch::config::AppConfig;
use bandwatch::core::bootstrap::build_scan_cycle;
use bandwatch::core::http::{start_server, AppState, HealthStatus};
use bandwatch::core::scheduler::CycleScheduler;
use bandwatch::logging::{self, LoggingConfig};
use bandwatch::metrics::Metrics;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let config = AppConfig::from_env()?;
    logging::init_logging(&LoggingConfig::from_app_config(&config))?;

    info!("Starting Bandwatch Worker");
    info!(environment = %config.environment, "Environment");

    let metrics = Arc::new(Metrics::new()?);
    let health = Arc::new(RwLock::new(HealthStatus::default()));

    let cycle = build_scan_cycle(&config)?
        .with_metrics(metrics.clone())
        .with_health(health.clone());

    if let Some(port) = config.http_port {
        let state = AppState::new(health.clone(), metrics.clone());
        tokio::spawn(async move {
            if let Err(e) = start_server(port, state).await {
                error!(error = %e, "HTTP server error");
            }
        });
    }

    let scheduler = CycleScheduler::new(
        Arc::new(cycle),
        &config.scheduler.cron,
        config.scheduler.run_on_start,
    )?;
    scheduler.start().await;

    // Graceful shutdown
    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;
    info!("Shutting down worker...");
    scheduler.stop().await;
    info!("Worker stopped");

    Ok(())
}
