use std::collections::BTreeMap;

use crate::{
    models::DailyMetric,
    utils::{day_index, ONE_DAY_SECS},
};

/// Turns a sparse daily series into one record per day.
///
/// Subgraphs only emit a day record when something traded. Starting at the
/// earliest record and walking forward one day at a time until the day before
/// `end`, every missing day gets a synthetic record with zero volume, zero
/// price and the last seen liquidity.
///
/// Records are keyed by their rounded day index; a later record for the same
/// day replaces an earlier one. Output is sorted by day. Empty input stays empty.
pub fn fill_daily_gaps(records: Vec<DailyMetric>, end: i64) -> Vec<DailyMetric> {
    let mut by_day: BTreeMap<i64, DailyMetric> = BTreeMap::new();
    for record in records {
        by_day.insert(day_index(record.date), record);
    }

    let Some(first) = by_day.values().next().copied() else {
        return Vec::new();
    };

    let mut timestamp = first.date;
    let mut latest_liquidity = first.total_liquidity_usd;

    while timestamp < end - ONE_DAY_SECS {
        let next_day = timestamp + ONE_DAY_SECS;
        match by_day.get(&day_index(next_day)) {
            Some(existing) => latest_liquidity = existing.total_liquidity_usd,
            None => {
                by_day.insert(
                    day_index(next_day),
                    DailyMetric::new(next_day, 0.0, latest_liquidity, 0.0),
                );
            },
        }
        timestamp = next_day;
    }

    by_day.into_values().collect()
}
