use serde::Serialize;

/// One exchange's figures for one calendar day.
///
/// Population: Normalized from a subgraph `tokenDayDatas` record, or synthesized
/// by gap filling for days without trades.
///
/// Query Patterns:
///   - "Get liquidity/volume/price history for token X on exchange Y"
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyMetric {
    /// Unix timestamp aligned to the start of the day (UTC)
    pub date: i64,
    pub daily_volume_usd: f64,
    pub total_liquidity_usd: f64,
    /// Zero when unknown or when nothing traded that day
    pub price_usd: f64,
}

impl DailyMetric {
    pub fn new(date: i64, daily_volume_usd: f64, total_liquidity_usd: f64, price_usd: f64) -> Self {
        Self {
            date,
            daily_volume_usd,
            total_liquidity_usd,
            price_usd,
        }
    }

    /// Placeholder for a source with no record on `date`.
    pub fn zero(date: i64) -> Self {
        Self::new(date, 0.0, 0.0, 0.0)
    }
}

/// Cross-exchange figures for one day, with the per-source records it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedDailyMetric {
    pub date: i64,
    pub daily_volume_usd: f64,
    pub total_liquidity_usd: f64,
    pub price_usd: f64,
    /// Per-source records in input order (zero placeholders included)
    pub raw_data: Vec<DailyMetric>,
}
