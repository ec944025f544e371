//! Job to refetch the daily series of every exchange and rebuild the combined chart.

use anyhow::{bail, Result};
use log::info;

use crate::store::Dashboard;

/// Replaces every cached daily series.
///
/// Fails when the combined chart comes back empty.
pub async fn run(dashboard: &Dashboard, now: i64) -> Result<()> {
    info!("Starting refresh_charts job...");

    let start = std::time::Instant::now();

    let combined = dashboard.refresh_series(now).await;

    let Some(last) = combined.last() else {
        bail!("combined chart is empty");
    };

    info!(
        "Completed refresh_charts job in {:?} ({} days, last volume ${:.2})",
        start.elapsed(),
        combined.len(),
        last.daily_volume_usd
    );
    Ok(())
}
