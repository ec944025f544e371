//! JSON view of everything the dashboard shows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    config::TokenSettings,
    models::{CombinedDailyMetric, SnapshotMetric},
    store::Dashboard,
    subgraph::Exchange,
    utils::{percent_change, shorten_address},
};

/// Characters kept on each side of the shortened token address.
const SHORT_ADDRESS_CHARS: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub token: TokenInfo,
    /// USD value of one unit of the local currency, from the price feed
    pub local_rate_usd: Option<f64>,
    /// How far the combined USD price sits from the local-currency rate, in percent
    pub peg_deviation_percent: Option<f64>,
    pub combined: SnapshotView,
    pub exchanges: Vec<ExchangeView>,
    pub chart: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    pub address: String,
    pub short_address: String,
    pub symbol: String,
    pub name: String,
    pub local_currency: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SnapshotView {
    #[serde(flatten)]
    pub metric: SnapshotMetric,
    /// Tokens per USD
    pub inverse_price: f64,
}

impl From<SnapshotMetric> for SnapshotView {
    fn from(metric: SnapshotMetric) -> Self {
        Self {
            metric,
            inverse_price: metric.inverse_price(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExchangeView {
    pub exchange: Exchange,
    pub analytics_url: String,
    pub swap_url: String,
    /// `None` when the exchange could not be read
    pub snapshot: Option<SnapshotView>,
    pub chart_days: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub timestamp: i64,
    pub daily_volume_usd: f64,
    pub total_liquidity_usd: f64,
    pub price_usd: f64,
}

impl ChartPoint {
    fn from_metric(metric: &CombinedDailyMetric) -> Option<Self> {
        let date = DateTime::from_timestamp(metric.date, 0)?.date_naive();

        Some(Self {
            date,
            timestamp: metric.date,
            daily_volume_usd: metric.daily_volume_usd,
            total_liquidity_usd: metric.total_liquidity_usd,
            price_usd: metric.price_usd,
        })
    }
}

impl DashboardReport {
    /// Loads (or reads from cache) every dashboard figure as of `now`.
    pub async fn build(dashboard: &Dashboard, token: &TokenSettings, now: i64) -> Self {
        let address = dashboard.token_address();

        let (combined, snapshots, series, chart, local_rate_usd) = tokio::join!(
            dashboard.combined_snapshot(now),
            dashboard.source_snapshots(now),
            dashboard.source_series_all(now),
            dashboard.combined_series(now),
            dashboard.local_rate(),
        );

        let exchanges = snapshots
            .into_iter()
            .zip(series)
            .map(|((exchange, snapshot), (_, series))| ExchangeView {
                exchange,
                analytics_url: exchange.analytics_url(address),
                swap_url: exchange.swap_url(address),
                snapshot: snapshot.map(SnapshotView::from),
                chart_days: series.len(),
            })
            .collect();

        let peg_deviation_percent = local_rate_usd
            .filter(|_| combined.price_usd > 0.0)
            .map(|rate| percent_change(combined.price_usd, rate));

        Self {
            generated_at: DateTime::from_timestamp(now, 0).unwrap_or_default(),
            token: TokenInfo {
                address: address.to_string(),
                short_address: shorten_address(address, SHORT_ADDRESS_CHARS)
                    .unwrap_or_else(|| address.to_string()),
                symbol: token.symbol.clone(),
                name: token.name.clone(),
                local_currency: token.local_currency.clone(),
            },
            local_rate_usd,
            peg_deviation_percent,
            combined: combined.into(),
            exchanges,
            chart: chart.iter().filter_map(ChartPoint::from_metric).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        models::DailyMetric,
        store::fake::FakeSource,
        utils::ONE_DAY_SECS,
        worker::MetricSource,
    };

    const NOW: i64 = 1_640_995_200; // 2022-01-01

    fn dashboard(sources: Vec<Arc<FakeSource>>) -> Dashboard {
        let sources = sources
            .into_iter()
            .map(|source| source as Arc<dyn MetricSource>)
            .collect();
        Dashboard::new(&TokenSettings::default().address, sources, None).unwrap()
    }

    #[tokio::test]
    async fn test_report_with_two_exchanges() {
        let start = NOW - 3 * ONE_DAY_SECS;
        let series = vec![
            DailyMetric::new(start, 10.0, 100.0, 0.0087),
            DailyMetric::new(start + ONE_DAY_SECS, 20.0, 100.0, 0.0088),
        ];
        let v3 = FakeSource::new(
            Exchange::UniswapV3,
            Some(series),
            Some(SnapshotMetric {
                price_usd: 0.008,
                total_liquidity_usd: 100.0,
                ..SnapshotMetric::default()
            }),
        );
        let quick = FakeSource::new(Exchange::Quickswap, None, None);

        let report = DashboardReport::build(
            &dashboard(vec![v3, quick]),
            &TokenSettings::default(),
            NOW,
        )
        .await;

        assert_eq!(report.generated_at.timestamp(), NOW);
        assert_eq!(report.token.symbol, "JPYC");
        assert_eq!(report.token.short_address.to_lowercase(), "0x6ae7...108c");
        assert_eq!(report.local_rate_usd, None);
        assert_eq!(report.peg_deviation_percent, None);

        assert_eq!(report.combined.metric.price_usd, 0.008);
        assert!((report.combined.inverse_price - 125.0).abs() < 1e-9);

        assert_eq!(report.exchanges.len(), 2);
        assert_eq!(report.exchanges[0].exchange, Exchange::UniswapV3);
        assert_eq!(report.exchanges[0].chart_days, 2);
        assert!(report.exchanges[0].swap_url.ends_with(report.token.address.as_str()));
        assert!(report.exchanges[1].snapshot.is_none());
        assert_eq!(report.exchanges[1].chart_days, 0);

        assert_eq!(report.chart.len(), 1);
        assert_eq!(report.chart[0].date, NaiveDate::from_ymd_opt(2021, 12, 30).unwrap());
        assert_eq!(report.chart[0].daily_volume_usd, 20.0);
    }

    #[tokio::test]
    async fn test_report_serializes_flat_snapshot() {
        let report =
            DashboardReport::build(&dashboard(Vec::new()), &TokenSettings::default(), NOW).await;

        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["combined"]["price_usd"], 0.0);
        assert_eq!(value["combined"]["inverse_price"], 0.0);
        assert_eq!(value["chart"], serde_json::json!([]));
        assert_eq!(value["generated_at"], "2022-01-01T00:00:00Z");
    }
}
