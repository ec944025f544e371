use std::sync::Arc;

use anyhow::Context;
use jemallocator::Jemalloc;
use log::{error, info};
use simple_logger::SimpleLogger;
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use stableboard::{CronScheduler, Dashboard, DashboardReport, Settings};

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;

    SimpleLogger::new()
        .with_level(settings.log_level())
        .init()
        .context("Failed to initialize logger")?;

    let dashboard = Arc::new(
        Dashboard::from_settings(&settings).context("Failed to build dashboard")?,
    );

    info!(
        "Loading {} ({}) across {:?}",
        settings.token.symbol,
        dashboard.token_address(),
        dashboard.exchanges()
    );

    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    let report = DashboardReport::build(&dashboard, &settings.token, now).await;

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    if !settings.refresh.enabled {
        return Ok(());
    }

    run_refresh(settings, dashboard).await
}

async fn run_refresh(settings: Settings, dashboard: Arc<Dashboard>) -> anyhow::Result<()> {
    let cancellation_token = CancellationToken::new();

    let cron_scheduler = CronScheduler::new(dashboard, settings.refresh.clone());

    let cron_token = cancellation_token.child_token();
    let cron_handle = tokio::spawn(async move {
        if let Err(e) = cron_scheduler.run(cron_token).await {
            error!("Cron scheduler failed: {:#}", e);
        }
    });

    info!("Cron scheduler started - dashboard will refresh periodically");

    #[cfg(unix)]
    let mut sigterm_stream = {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?
    };

    // Set up graceful shutdown signal handler
    info!("Dashboard running. Press Ctrl+C to stop.");

    #[cfg(unix)]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
            _ = sigterm_stream.recv() => {
                info!("Received SIGTERM, exiting gracefully...");
            },
        };
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
        };
    }

    cancellation_token.cancel();

    // Wait for cron scheduler to stop
    info!("Waiting for cron scheduler to stop...");
    let _ = cron_handle.await;

    info!("Dashboard stopped");
    Ok(())
}
