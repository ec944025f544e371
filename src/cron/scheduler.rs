//! Cron scheduler for periodic background tasks.
//!
//! Runs jobs like:
//! - Refetching per-exchange snapshots and the combined snapshot
//! - Refetching per-exchange daily series and the combined chart

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use log::{error, info};
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;

use crate::{config::RefreshSettings, store::Dashboard};

use super::jobs;

/// Cron scheduler that keeps the dashboard cache fresh.
pub struct CronScheduler {
    dashboard: Arc<Dashboard>,
    settings: Arc<RefreshSettings>,
}

impl CronScheduler {
    pub fn new(dashboard: Arc<Dashboard>, settings: RefreshSettings) -> Self {
        Self {
            dashboard,
            settings: Arc::new(settings),
        }
    }

    /// Starts the cron scheduler and runs until cancellation.
    pub async fn run(&self, cancellation_token: CancellationToken) -> Result<()> {
        let mut scheduler = JobScheduler::new().await?;

        // Register all jobs
        self.register_refresh_snapshots_job(&scheduler).await?;
        self.register_refresh_charts_job(&scheduler).await?;

        // Start the scheduler
        scheduler.start().await?;
        info!("Cron scheduler started with {} jobs", 2);

        // Wait for cancellation
        cancellation_token.cancelled().await;
        info!("Cron scheduler shutting down...");

        scheduler.shutdown().await?;
        Ok(())
    }

    async fn register_refresh_snapshots_job(&self, scheduler: &JobScheduler) -> Result<()> {
        let dashboard = self.dashboard.clone();
        let interval = self.settings.snapshot_interval_secs;

        let job = Job::new_repeated_async(Duration::from_secs(interval), move |_uuid, _lock| {
            let dashboard = dashboard.clone();
            Box::pin(async move {
                if let Err(e) = jobs::refresh_snapshots::run(&dashboard, jobs::unix_now()).await {
                    error!("Failed to refresh snapshots: {:#}", e);
                }
            })
        })?;

        scheduler.add(job).await?;
        info!("Registered refresh_snapshots job (every {}s)", interval);
        Ok(())
    }

    async fn register_refresh_charts_job(&self, scheduler: &JobScheduler) -> Result<()> {
        let dashboard = self.dashboard.clone();
        let interval = self.settings.chart_interval_secs;

        let job = Job::new_repeated_async(Duration::from_secs(interval), move |_uuid, _lock| {
            let dashboard = dashboard.clone();
            Box::pin(async move {
                if let Err(e) = jobs::refresh_charts::run(&dashboard, jobs::unix_now()).await {
                    error!("Failed to refresh charts: {:#}", e);
                }
            })
        })?;

        scheduler.add(job).await?;
        info!("Registered refresh_charts job (every {}s)", interval);
        Ok(())
    }
}
