//! Job to refetch the per-exchange snapshots and rebuild the combined one.

use anyhow::{bail, Result};
use log::info;

use crate::store::Dashboard;

/// Replaces every cached snapshot with fresh subgraph figures.
///
/// Fails when no exchange produced a priced snapshot, so the scheduler logs it.
pub async fn run(dashboard: &Dashboard, now: i64) -> Result<()> {
    info!("Starting refresh_snapshots job...");

    let start = std::time::Instant::now();

    let combined = dashboard.refresh_snapshots(now).await;

    if combined.price_usd == 0.0 {
        bail!("no exchange reported a price");
    }

    info!(
        "Completed refresh_snapshots job in {:?} (price ${:.6}, liquidity ${:.2}, 24h volume ${:.2})",
        start.elapsed(),
        combined.price_usd,
        combined.total_liquidity_usd,
        combined.one_day_volume_usd
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fails_without_priced_exchange() {
        let dashboard =
            Dashboard::new("0x6ae7dfc73e0dde2aa99ac063dcf7e8a63265108c", Vec::new(), None).unwrap();

        let err = run(&dashboard, 1_700_000_000).await.unwrap_err();
        assert!(err.to_string().contains("no exchange reported a price"));
    }
}
