use log::warn;

use super::CombineError;
use crate::{
    models::{CombinedSnapshotMetric, SnapshotMetric},
    utils::{finite_or_zero, safe_div},
};

/// Each snapshot's share of the total liquidity.
///
/// The weights sum to 1.0 (within float tolerance) whenever they exist.
pub fn liquidity_weights(snapshots: &[SnapshotMetric]) -> Result<Vec<f64>, CombineError> {
    if snapshots.is_empty() {
        return Err(CombineError::NoSnapshots);
    }

    let total_liquidity_usd: f64 = snapshots.iter().map(|s| s.total_liquidity_usd).sum();
    if total_liquidity_usd == 0.0 || !total_liquidity_usd.is_finite() {
        return Err(CombineError::ZeroLiquidity);
    }

    Ok(snapshots
        .iter()
        .map(|s| safe_div(s.total_liquidity_usd, total_liquidity_usd))
        .collect())
}

/// Liquidity-weighted blend of per-exchange snapshots.
///
/// Falls back to an all-zero snapshot when no weights exist.
pub fn combine_snapshots(snapshots: &[SnapshotMetric]) -> CombinedSnapshotMetric {
    match try_combine_snapshots(snapshots) {
        Ok(combined) => combined,
        Err(e) => {
            warn!("Returning zero combined snapshot: {}", e);
            CombinedSnapshotMetric::default()
        },
    }
}

/// Liquidity-weighted blend of per-exchange snapshots.
///
/// Liquidity and both 24h volumes are summed. Price and every change field
/// are weighted by each snapshot's share of total liquidity.
pub fn try_combine_snapshots(
    snapshots: &[SnapshotMetric],
) -> Result<CombinedSnapshotMetric, CombineError> {
    let weights = liquidity_weights(snapshots)?;

    let mut combined = CombinedSnapshotMetric::default();

    for (snapshot, weight) in snapshots.iter().zip(weights) {
        combined.total_liquidity_usd += snapshot.total_liquidity_usd;
        combined.one_day_volume_usd += snapshot.one_day_volume_usd;
        combined.one_day_volume_untracked += snapshot.one_day_volume_untracked;

        combined.price_usd += finite_or_zero(weight * snapshot.price_usd);
        combined.price_change_usd += finite_or_zero(weight * snapshot.price_change_usd);
        combined.price_change_local += finite_or_zero(weight * snapshot.price_change_local);
        combined.volume_change_usd += finite_or_zero(weight * snapshot.volume_change_usd);
        combined.volume_change_untracked +=
            finite_or_zero(weight * snapshot.volume_change_untracked);
        combined.liquidity_change_usd += finite_or_zero(weight * snapshot.liquidity_change_usd);
    }

    Ok(combined)
}
