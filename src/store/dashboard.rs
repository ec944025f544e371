use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use futures::future::join_all;
use log::{info, warn};
use url::Url;

use super::cache::{CacheKey, DashboardCache};
use crate::{
    combine::{try_combine_series, try_combine_snapshots},
    config::Settings,
    models::{CombinedDailyMetric, DailyMetric, SnapshotMetric},
    subgraph::{Exchange, SubgraphClient},
    utils::{normalize_address, parse_address},
    worker::{MetricSource, RateOracle, SubgraphSource},
};

/// Read side of the dashboard: per-exchange figures, their blend, and the
/// local-currency rate, all served from [`DashboardCache`].
///
/// A source that fails to load is shown as empty (series) or absent
/// (snapshot) and left out of the blend. Failed loads are never cached, so
/// the next read retries them.
pub struct Dashboard {
    token_address: String,
    sources: Vec<Arc<dyn MetricSource>>,
    cache: DashboardCache,
    oracle: Option<RateOracle>,
}

impl Dashboard {
    pub fn new(
        token_address: &str,
        sources: Vec<Arc<dyn MetricSource>>,
        oracle: Option<RateOracle>,
    ) -> Result<Self> {
        let token_address = normalize_address(token_address)
            .with_context(|| format!("Invalid token address: {}", token_address))?;

        Ok(Self {
            token_address,
            sources,
            cache: DashboardCache::default(),
            oracle,
        })
    }

    /// Wires one [`SubgraphSource`] per configured exchange and the optional rate oracle.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.subgraph.request_timeout_secs);

        let blocks_url = Url::parse(&settings.subgraph.blocks_url).with_context(|| {
            format!("Invalid blocks subgraph url: {}", settings.subgraph.blocks_url)
        })?;
        let blocks = SubgraphClient::new(blocks_url, timeout);

        let mut sources: Vec<Arc<dyn MetricSource>> = Vec::with_capacity(settings.exchanges.len());

        for exchange in &settings.exchanges {
            let url = Url::parse(exchange.subgraph_url()).with_context(|| {
                format!("Invalid {} subgraph url: {}", exchange.exchange, exchange.subgraph_url())
            })?;

            let price_pool = match &exchange.price_pool {
                Some(pool) => Some(normalize_address(pool).with_context(|| {
                    format!("Invalid {} price pool: {}", exchange.exchange, pool)
                })?),
                None => None,
            };

            sources.push(Arc::new(SubgraphSource::new(
                exchange.exchange,
                SubgraphClient::new(url, timeout),
                blocks.clone(),
                price_pool,
                settings.subgraph.max_liquidity_usd,
            )));
        }

        let oracle = match &settings.oracle {
            Some(oracle) => {
                let rpc_url = Url::parse(&oracle.rpc_url)
                    .with_context(|| format!("Invalid oracle rpc url: {}", oracle.rpc_url))?;
                let feed = parse_address(&oracle.feed_address).with_context(|| {
                    format!("Invalid oracle feed address: {}", oracle.feed_address)
                })?;
                Some(RateOracle::new(rpc_url, feed))
            }
            None => None,
        };

        Self::new(&settings.token.address, sources, oracle)
    }

    pub fn token_address(&self) -> &str {
        &self.token_address
    }

    /// Configured exchanges, in configuration order.
    pub fn exchanges(&self) -> Vec<Exchange> {
        self.sources.iter().map(|source| source.exchange()).collect()
    }

    pub fn cache(&self) -> &DashboardCache {
        &self.cache
    }

    // ============================================================================
    // Per-source reads
    // ============================================================================

    /// Daily series of one source; empty when it cannot be loaded.
    pub async fn source_series(&self, source: &dyn MetricSource, now: i64) -> Arc<Vec<DailyMetric>> {
        self.load_source_series(source, now).await.unwrap_or_default()
    }

    /// Snapshot of one source; `None` when it cannot be loaded.
    pub async fn source_snapshot(&self, source: &dyn MetricSource, now: i64) -> Option<SnapshotMetric> {
        let exchange = source.exchange();
        let key = CacheKey::source(exchange, &self.token_address);

        self.cache
            .snapshots
            .try_get_with(key, async {
                let snapshot = source.snapshot(&self.token_address, now).await?;
                info!(
                    "{}: price ${:.6}, liquidity ${:.2}",
                    exchange, snapshot.price_usd, snapshot.total_liquidity_usd
                );
                Ok::<_, anyhow::Error>(snapshot)
            })
            .await
            .map_err(|e| warn!("{}: snapshot unavailable: {:#}", exchange, e))
            .ok()
    }

    /// Daily series of every source, fetched concurrently.
    pub async fn source_series_all(&self, now: i64) -> Vec<(Exchange, Arc<Vec<DailyMetric>>)> {
        self.load_all_series(now)
            .await
            .into_iter()
            .map(|(exchange, series)| (exchange, series.unwrap_or_default()))
            .collect()
    }

    /// Snapshot of every source, fetched concurrently.
    pub async fn source_snapshots(&self, now: i64) -> Vec<(Exchange, Option<SnapshotMetric>)> {
        let loads = self.sources.iter().map(|source| async move {
            (source.exchange(), self.source_snapshot(source.as_ref(), now).await)
        });

        join_all(loads).await
    }

    /// `None` when the source failed; the failure is logged and not cached.
    async fn load_source_series(
        &self,
        source: &dyn MetricSource,
        now: i64,
    ) -> Option<Arc<Vec<DailyMetric>>> {
        let exchange = source.exchange();
        let key = CacheKey::source(exchange, &self.token_address);

        self.cache
            .source_series
            .try_get_with(key, async {
                let series = source.daily_series(&self.token_address, now).await?;
                info!("{}: loaded {} days", exchange, series.len());
                Ok::<_, anyhow::Error>(Arc::new(series))
            })
            .await
            .map_err(|e| warn!("{}: daily series unavailable: {:#}", exchange, e))
            .ok()
    }

    async fn load_all_series(&self, now: i64) -> Vec<(Exchange, Option<Arc<Vec<DailyMetric>>>)> {
        let loads = self.sources.iter().map(|source| async move {
            (source.exchange(), self.load_source_series(source.as_ref(), now).await)
        });

        join_all(loads).await
    }

    // ============================================================================
    // Combined reads
    // ============================================================================

    /// Cross-exchange daily series; empty when nothing could be combined.
    ///
    /// Only a blend of every source is cached. One built around a failed
    /// source is returned as is, and the next read retries that source.
    pub async fn combined_series(&self, now: i64) -> Arc<Vec<CombinedDailyMetric>> {
        if let Some(cached) = self.cache.combined_series().await {
            return cached;
        }

        let loads = self.load_all_series(now).await;
        let failed = loads.iter().filter(|(_, series)| series.is_none()).count();

        let series: Vec<Vec<DailyMetric>> = loads
            .into_iter()
            .map(|(_, series)| series.map(|s| s.as_ref().clone()).unwrap_or_default())
            .collect();

        let combined = match try_combine_series(&series) {
            Ok(combined) => Arc::new(combined),
            Err(e) => {
                warn!("Combined series unavailable: {}", e);
                return Arc::new(Vec::new());
            },
        };

        info!("Combined {} series into {} days", series.len(), combined.len());

        if failed == 0 {
            self.cache
                .combined_series
                .insert(CacheKey::Combined, combined.clone())
                .await;
        } else {
            warn!("Combined series is missing {} source(s), not caching it", failed);
        }

        combined
    }

    /// Liquidity-weighted blend of every source that reports a price.
    ///
    /// All zero when no source is priced or their liquidity sums to zero.
    /// Cached only when every source answered.
    pub async fn combined_snapshot(&self, now: i64) -> SnapshotMetric {
        if let Some(cached) = self.cache.snapshot(&CacheKey::Combined).await {
            return cached;
        }

        let snapshots = self.source_snapshots(now).await;
        let failed = snapshots.iter().filter(|(_, snapshot)| snapshot.is_none()).count();

        let priced: Vec<SnapshotMetric> = snapshots
            .into_iter()
            .filter_map(|(_, snapshot)| snapshot)
            .filter(|snapshot| snapshot.price_usd > 0.0)
            .collect();

        let combined = match try_combine_snapshots(&priced) {
            Ok(combined) => combined,
            Err(e) => {
                warn!("Combined snapshot unavailable: {}", e);
                return SnapshotMetric::default();
            },
        };

        if failed == 0 {
            self.cache
                .snapshots
                .insert(CacheKey::Combined, combined)
                .await;
        } else {
            warn!("Combined snapshot is missing {} source(s), not caching it", failed);
        }

        combined
    }

    /// Local-currency/USD rate from the price feed, if one is configured and answers.
    pub async fn local_rate(&self) -> Option<f64> {
        let oracle = self.oracle.as_ref()?;

        oracle
            .latest_rate()
            .await
            .map_err(|e| warn!("Local currency rate unavailable: {:#}", e))
            .ok()
    }

    // ============================================================================
    // Refresh
    // ============================================================================

    /// Drops every cached value for one exchange and the blends built from it.
    pub async fn invalidate(&self, exchange: Exchange) {
        self.cache
            .invalidate(&CacheKey::source(exchange, &self.token_address))
            .await;
        self.cache.invalidate(&CacheKey::Combined).await;
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Refetches all series and rebuilds the combined series.
    pub async fn refresh_series(&self, now: i64) -> Arc<Vec<CombinedDailyMetric>> {
        self.cache.invalidate_series();
        self.combined_series(now).await
    }

    /// Refetches all snapshots and rebuilds the combined snapshot.
    pub async fn refresh_snapshots(&self, now: i64) -> SnapshotMetric {
        self.cache.invalidate_snapshots();
        self.combined_snapshot(now).await
    }

    /// Refetches everything.
    pub async fn refresh(&self, now: i64) {
        tokio::join!(self.refresh_series(now), self.refresh_snapshots(now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{store::fake::FakeSource, utils::ONE_DAY_SECS};

    const TOKEN: &str = "0x6AE7dfc73e0dde2aa99ac063dcf7e8a63265108c";
    const NOW: i64 = 10 * ONE_DAY_SECS;

    fn days(values: &[(f64, f64, f64)]) -> Vec<DailyMetric> {
        values
            .iter()
            .enumerate()
            .map(|(i, &(volume, liquidity, price))| {
                DailyMetric::new(i as i64 * ONE_DAY_SECS, volume, liquidity, price)
            })
            .collect()
    }

    fn snapshot(price: f64, liquidity: f64) -> SnapshotMetric {
        SnapshotMetric {
            price_usd: price,
            total_liquidity_usd: liquidity,
            ..SnapshotMetric::default()
        }
    }

    fn dashboard(sources: &[Arc<FakeSource>]) -> Dashboard {
        let sources = sources
            .iter()
            .map(|source| source.clone() as Arc<dyn MetricSource>)
            .collect();
        Dashboard::new(TOKEN, sources, None).unwrap()
    }

    #[test]
    fn test_token_address_is_normalized() {
        let dashboard = dashboard(&[]);
        assert_eq!(
            dashboard.token_address(),
            "0x6ae7dfc73e0dde2aa99ac063dcf7e8a63265108c"
        );
    }

    #[test]
    fn test_invalid_token_address_is_rejected() {
        assert!(Dashboard::new("not-an-address", Vec::new(), None).is_err());
    }

    #[test]
    fn test_from_default_settings() {
        let dashboard = Dashboard::from_settings(&Settings::default()).unwrap();
        assert_eq!(
            dashboard.exchanges(),
            vec![Exchange::UniswapV3, Exchange::Quickswap]
        );
    }

    #[tokio::test]
    async fn test_combined_series_is_cached() {
        let v3 = FakeSource::new(
            Exchange::UniswapV3,
            Some(days(&[(1.0, 10.0, 1.0), (2.0, 10.0, 1.0), (3.0, 10.0, 1.0)])),
            None,
        );
        let quick = FakeSource::new(
            Exchange::Quickswap,
            Some(days(&[(4.0, 30.0, 2.0), (5.0, 30.0, 2.0)])),
            None,
        );
        let dashboard = dashboard(&[v3.clone(), quick.clone()]);

        let first = dashboard.combined_series(NOW).await;
        let second = dashboard.combined_series(NOW).await;

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(v3.series_calls(), 1);
        assert_eq!(quick.series_calls(), 1);

        // Day 1 blends both sources: 10/40 * 1.0 + 30/40 * 2.0
        assert_eq!(first[0].daily_volume_usd, 7.0);
        assert_eq!(first[0].total_liquidity_usd, 40.0);
        assert!((first[0].price_usd - 1.75).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_refresh_series_refetches() {
        let v3 = FakeSource::new(
            Exchange::UniswapV3,
            Some(days(&[(1.0, 10.0, 1.0), (2.0, 10.0, 1.0)])),
            None,
        );
        let dashboard = dashboard(&[v3.clone()]);

        dashboard.combined_series(NOW).await;
        dashboard.refresh_series(NOW).await;

        assert_eq!(v3.series_calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_source_is_empty_and_not_cached() {
        let v3 = FakeSource::new(
            Exchange::UniswapV3,
            Some(days(&[(1.0, 10.0, 1.0), (2.0, 10.0, 1.0)])),
            None,
        );
        let quick = FakeSource::new(Exchange::Quickswap, None, None);
        let dashboard = dashboard(&[v3.clone(), quick.clone()]);

        let series = dashboard.source_series(quick.as_ref(), NOW).await;
        assert!(series.is_empty());
        dashboard.source_series(quick.as_ref(), NOW).await;
        assert_eq!(quick.series_calls(), 2);

        let combined = dashboard.combined_series(NOW).await;
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].raw_data.len(), 2);
        assert_eq!(combined[0].raw_data[1], DailyMetric::zero(ONE_DAY_SECS));

        // The partial blend is served but not stored, so the failed source is retried
        assert!(dashboard.cache().combined_series().await.is_none());
        dashboard.combined_series(NOW).await;
        assert_eq!(quick.series_calls(), 4);
        assert_eq!(v3.series_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_combined_series_is_not_cached() {
        let v3 = FakeSource::new(Exchange::UniswapV3, Some(Vec::new()), None);
        let dashboard = dashboard(&[v3.clone()]);

        assert!(dashboard.combined_series(NOW).await.is_empty());
        assert!(dashboard.cache().combined_series().await.is_none());
    }

    #[tokio::test]
    async fn test_combined_snapshot_skips_unpriced_and_failed_sources() {
        let v3 = FakeSource::new(Exchange::UniswapV3, None, Some(snapshot(1.0, 10.0)));
        let quick = FakeSource::new(Exchange::Quickswap, None, Some(snapshot(0.0, 1_000.0)));
        let sushi = FakeSource::new(Exchange::Sushiswap, None, None);
        let dashboard = dashboard(&[v3.clone(), quick.clone(), sushi.clone()]);

        let combined = dashboard.combined_snapshot(NOW).await;

        assert_eq!(combined.price_usd, 1.0);
        assert_eq!(combined.total_liquidity_usd, 10.0);

        let snapshots = dashboard.source_snapshots(NOW).await;
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[2], (Exchange::Sushiswap, None));
        assert_eq!(v3.snapshot_calls(), 1);
        assert_eq!(sushi.snapshot_calls(), 2);
        assert!(dashboard.cache().snapshot(&CacheKey::Combined).await.is_none());
    }

    #[tokio::test]
    async fn test_combined_snapshot_is_cached_when_all_sources_answer() {
        let v3 = FakeSource::new(Exchange::UniswapV3, None, Some(snapshot(1.0, 10.0)));
        let quick = FakeSource::new(Exchange::Quickswap, None, Some(snapshot(0.0, 1_000.0)));
        let dashboard = dashboard(&[v3.clone(), quick.clone()]);

        dashboard.combined_snapshot(NOW).await;
        dashboard.combined_snapshot(NOW).await;

        assert_eq!(
            dashboard.cache().snapshot(&CacheKey::Combined).await,
            Some(snapshot(1.0, 10.0))
        );
        assert_eq!(v3.snapshot_calls(), 1);
        assert_eq!(quick.snapshot_calls(), 1);
    }

    #[tokio::test]
    async fn test_no_priced_source_gives_zero_snapshot() {
        let quick = FakeSource::new(Exchange::Quickswap, None, Some(snapshot(0.0, 50.0)));
        let dashboard = dashboard(&[quick.clone()]);

        assert_eq!(dashboard.combined_snapshot(NOW).await, SnapshotMetric::default());
        assert!(dashboard.cache().snapshot(&CacheKey::Combined).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_exchange() {
        let v3 = FakeSource::new(Exchange::UniswapV3, None, Some(snapshot(1.0, 10.0)));
        let quick = FakeSource::new(Exchange::Quickswap, None, Some(snapshot(1.2, 10.0)));
        let dashboard = dashboard(&[v3.clone(), quick.clone()]);

        dashboard.combined_snapshot(NOW).await;
        dashboard.invalidate(Exchange::Quickswap).await;
        let combined = dashboard.combined_snapshot(NOW).await;

        assert!((combined.price_usd - 1.1).abs() < 1e-12);
        assert_eq!(v3.snapshot_calls(), 1);
        assert_eq!(quick.snapshot_calls(), 2);
    }

    #[tokio::test]
    async fn test_refresh_refetches_everything() {
        let v3 = FakeSource::new(
            Exchange::UniswapV3,
            Some(days(&[(1.0, 10.0, 1.0), (2.0, 10.0, 1.0)])),
            Some(snapshot(1.0, 10.0)),
        );
        let dashboard = dashboard(&[v3.clone()]);

        dashboard.combined_series(NOW).await;
        dashboard.combined_snapshot(NOW).await;
        dashboard.refresh(NOW).await;

        assert_eq!(v3.series_calls(), 2);
        assert_eq!(v3.snapshot_calls(), 2);
        assert!(dashboard.cache().combined_series().await.is_some());
        assert!(dashboard.cache().snapshot(&CacheKey::Combined).await.is_some());
    }

    #[tokio::test]
    async fn test_local_rate_without_oracle() {
        assert_eq!(dashboard(&[]).local_rate().await, None);
    }
}
