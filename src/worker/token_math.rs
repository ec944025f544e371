use crate::{
    models::{SnapshotMetric, TokenState},
    utils::{
        percent_change, two_day_percent_change, validate_usd_price, validate_usd_tvl,
        validate_usd_volume,
    },
};

/// Derives the current snapshot from cumulative counters sampled at the head
/// (`current`), 24h ago (`one_day`) and 48h ago (`two_day`).
///
/// - 24h volumes are counter deltas; their change compares against the
///   previous 24h delta
/// - USD price is `derived_eth * eth_price` at each point in time
/// - the local change tracks the inverse quote (`1 / price`)
/// - liquidity beyond `max_liquidity_usd` is reported as zero (its change is
///   still computed from the raw figures)
pub fn compute_snapshot(
    eth_price: f64,
    eth_price_one_day: f64,
    current: &TokenState,
    one_day: &TokenState,
    two_day: &TokenState,
    max_liquidity_usd: f64,
) -> SnapshotMetric {
    let (one_day_volume_usd, volume_change_usd) =
        two_day_percent_change(current.volume_usd, one_day.volume_usd, two_day.volume_usd);

    let (one_day_volume_untracked, volume_change_untracked) = two_day_percent_change(
        current.untracked_volume_usd,
        one_day.untracked_volume_usd,
        two_day.untracked_volume_usd,
    );

    let price_usd = current.derived_eth * eth_price;
    let price_usd_one_day = one_day.derived_eth * eth_price_one_day;

    let price_change_usd = percent_change(price_usd, price_usd_one_day);
    let price_change_local = if price_usd > 0.0 && price_usd_one_day > 0.0 {
        percent_change(1.0 / price_usd, 1.0 / price_usd_one_day)
    } else {
        0.0
    };

    let liquidity_usd = current.total_liquidity * eth_price * current.derived_eth;
    let liquidity_usd_one_day = one_day.total_liquidity * eth_price_one_day * one_day.derived_eth;
    let liquidity_change_usd = percent_change(liquidity_usd, liquidity_usd_one_day);

    SnapshotMetric {
        price_usd: validate_usd_price(price_usd),
        price_change_usd,
        price_change_local,
        total_liquidity_usd: validate_usd_tvl(liquidity_usd, max_liquidity_usd),
        liquidity_change_usd,
        one_day_volume_usd: validate_usd_volume(one_day_volume_usd),
        volume_change_usd,
        one_day_volume_untracked: validate_usd_volume(one_day_volume_untracked),
        volume_change_untracked,
    }
}
