use log::warn;
use rustc_hash::FxHashMap;

use super::CombineError;
use crate::{
    models::{CombinedDailyMetric, DailyMetric},
    utils::{finite_or_zero, safe_div, ONE_DAY_SECS},
};

/// Merges per-exchange daily series into one combined daily series.
///
/// Falls back to an empty series when there is nothing to combine.
/// See [`try_combine_series`] for the rules.
pub fn combine_series(series: &[Vec<DailyMetric>]) -> Vec<CombinedDailyMetric> {
    match try_combine_series(series) {
        Ok(combined) => combined,
        Err(e) => {
            warn!("Returning empty combined series: {}", e);
            Vec::new()
        },
    }
}

/// Merges per-exchange daily series into one combined daily series.
///
/// Each input must be sorted ascending with one entry per day (gap filled).
///
/// - The longest input (first one on ties) is the base; its first and last
///   dates bound the output.
/// - A source without a record for a day contributes a zero record that day.
/// - Volume and liquidity are summed; non-finite inputs count as zero.
/// - Price is the liquidity-weighted average over priced sources; a day whose
///   combined price comes out zero repeats the previous day's price.
/// - The first combined day is dropped: it is the base series' partial first
///   day.
///
/// A base whose window spans more days than it has records is rejected with
/// [`CombineError::SparseBaseSeries`].
pub fn try_combine_series(
    series: &[Vec<DailyMetric>],
) -> Result<Vec<CombinedDailyMetric>, CombineError> {
    let base = base_series(series).ok_or(CombineError::MissingBaseSeries)?;

    let (start, end) = match (base.first(), base.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return Err(CombineError::MissingBaseSeries),
    };

    if start > end {
        return Err(CombineError::UnorderedBaseSeries { start, end });
    }

    // Exact-date lookup per source; the first record wins on duplicate dates
    let lookups: Vec<FxHashMap<i64, &DailyMetric>> = series
        .iter()
        .map(|source| {
            let mut by_date = FxHashMap::default();
            for metric in source {
                by_date.entry(metric.date).or_insert(metric);
            }
            by_date
        })
        .collect();

    // A gap-filled base holds exactly one record per day of its window
    let days = end
        .checked_sub(start)
        .and_then(|span| (span / ONE_DAY_SECS).checked_add(1))
        .filter(|&days| days <= base.len() as i64)
        .ok_or(CombineError::SparseBaseSeries {
            start,
            end,
            len: base.len(),
        })?;

    let mut combined = Vec::with_capacity(days as usize);
    let mut prev_price = 0.0;

    for offset in 0..days {
        let date = start + offset * ONE_DAY_SECS;
        let raw_data: Vec<DailyMetric> = lookups
            .iter()
            .map(|by_date| {
                by_date
                    .get(&date)
                    .map(|metric| **metric)
                    .unwrap_or_else(|| DailyMetric::zero(date))
            })
            .collect();

        let day = combine_day(date, raw_data, prev_price);
        prev_price = day.price_usd;
        combined.push(day);
    }

    if !combined.is_empty() {
        combined.remove(0);
    }

    Ok(combined)
}

/// Longest non-empty series; ties go to the earliest in input order.
fn base_series(series: &[Vec<DailyMetric>]) -> Option<&Vec<DailyMetric>> {
    let max_len = series.iter().map(Vec::len).max()?;
    if max_len == 0 {
        return None;
    }
    series.iter().find(|source| source.len() == max_len)
}

fn combine_day(date: i64, raw_data: Vec<DailyMetric>, prev_price: f64) -> CombinedDailyMetric {
    let mut daily_volume_usd = 0.0;
    let mut total_liquidity_usd = 0.0;
    let mut priced_liquidity_usd = 0.0;

    for metric in &raw_data {
        let liquidity = finite_or_zero(metric.total_liquidity_usd);
        daily_volume_usd += finite_or_zero(metric.daily_volume_usd);
        total_liquidity_usd += liquidity;
        if metric.price_usd != 0.0 {
            priced_liquidity_usd += liquidity;
        }
    }

    let weight_base = if priced_liquidity_usd != 0.0 {
        priced_liquidity_usd
    } else {
        total_liquidity_usd
    };

    let mut price_usd = 0.0;
    for metric in &raw_data {
        let liquidity = finite_or_zero(metric.total_liquidity_usd);
        if liquidity == 0.0 || metric.price_usd == 0.0 {
            continue;
        }
        let weight = safe_div(liquidity, weight_base);
        if weight != 0.0 {
            price_usd += finite_or_zero(weight * metric.price_usd);
        }
    }

    if price_usd == 0.0 {
        price_usd = prev_price;
    }

    CombinedDailyMetric {
        date,
        daily_volume_usd,
        total_liquidity_usd,
        price_usd,
        raw_data,
    }
}
