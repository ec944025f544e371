use serde::Serialize;

/// Current state of the token on one exchange.
///
/// Absolute USD fields are never negative. Change fields are percentages and
/// are always finite (zero when they cannot be computed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SnapshotMetric {
    // Price
    pub price_usd: f64,
    pub price_change_usd: f64,
    /// Change of the inverse quote (1 / price_usd) over 24h
    pub price_change_local: f64,

    // Liquidity
    pub total_liquidity_usd: f64,
    pub liquidity_change_usd: f64,

    // Rolling 24h volume
    pub one_day_volume_usd: f64,
    pub volume_change_usd: f64,
    pub one_day_volume_untracked: f64,
    pub volume_change_untracked: f64,
}

impl SnapshotMetric {
    /// Price of one USD expressed in the token (the inverse quote).
    pub fn inverse_price(&self) -> f64 {
        crate::utils::safe_div(1.0, self.price_usd)
    }
}

/// Liquidity-weighted blend of several [`SnapshotMetric`]s.
pub type CombinedSnapshotMetric = SnapshotMetric;
