//! Cron-based scheduler that drives scan cycles

use crate::core::runtime::ScanCycle;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Runs a [`ScanCycle`] on every cron tick.
///
/// Cycles never overlap: the next tick is computed only after the previous
/// cycle has finished, so a slow cycle simply skips the ticks it overran.
pub struct CycleScheduler {
    cycle: Arc<ScanCycle>,
    schedule: Schedule,
    run_on_start: bool,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl CycleScheduler {
    /// Create a new scheduler
    ///
    /// # Arguments
    /// * `cycle` - The scan cycle to run on each tick
    /// * `cron_expr` - Six-field cron expression (second minute hour day month weekday)
    /// * `run_on_start` - Run one cycle immediately before waiting for the first tick
    pub fn new(
        cycle: Arc<ScanCycle>,
        cron_expr: &str,
        run_on_start: bool,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let schedule = Schedule::from_str(cron_expr).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid cron expression '{}': {}", cron_expr, e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        info!(
            cron = %cron_expr,
            run_on_start = run_on_start,
            "CycleScheduler: created (cron: {})",
            cron_expr
        );

        Ok(Self {
            cycle,
            schedule,
            run_on_start,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler
    pub async fn start(&self) {
        let cycle = self.cycle.clone();
        let schedule = self.schedule.clone();
        let run_on_start = self.run_on_start;

        let handle = tokio::spawn(async move {
            if run_on_start {
                info!("CycleScheduler: running initial cycle");
                run_guarded(&cycle).await;
            }

            info!("CycleScheduler: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    // No more scheduled times, wait a bit and check again
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                info!("CycleScheduler: cron tick");
                run_guarded(&cycle).await;
            }
        });

        let mut h = self.handle.write().await;
        *h = Some(handle);
        info!("CycleScheduler: started successfully");
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("CycleScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

/// Run one cycle in its own task so a panic ends the cycle, not the loop.
pub async fn run_guarded(cycle: &Arc<ScanCycle>) {
    let task_cycle = cycle.clone();
    match tokio::spawn(async move { task_cycle.run().await }).await {
        Ok(report) => {
            if report.skipped == report.instruments && report.instruments > 0 {
                warn!("CycleScheduler: every instrument was skipped this cycle");
            }
        }
        Err(e) => {
            cycle.record_failure();
            error!(error = %e, "CycleScheduler: scan cycle aborted");
        }
    }
}
