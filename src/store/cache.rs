use std::sync::Arc;

use moka::future::Cache;

use crate::{
    models::{CombinedDailyMetric, DailyMetric, SnapshotMetric},
    subgraph::Exchange,
};

/// Default entry cap per cache; one entry per exchange plus the combined one.
const DEFAULT_MAX_CAPACITY: u64 = 256;

/// Key of a cached dashboard value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Figures of one token on one exchange
    Source { exchange: Exchange, address: String },
    /// The cross-exchange blend
    Combined,
}

impl CacheKey {
    pub fn source(exchange: Exchange, address: &str) -> Self {
        CacheKey::Source {
            exchange,
            address: address.to_lowercase(),
        }
    }
}

/// In-memory cache of fetched and combined dashboard values.
///
/// Entries never expire on their own; they are replaced only after an
/// explicit [`invalidate`](Self::invalidate) or
/// [`invalidate_all`](Self::invalidate_all).
#[derive(Clone)]
pub struct DashboardCache {
    pub(crate) source_series: Cache<CacheKey, Arc<Vec<DailyMetric>>>,
    pub(crate) combined_series: Cache<CacheKey, Arc<Vec<CombinedDailyMetric>>>,
    pub(crate) snapshots: Cache<CacheKey, SnapshotMetric>,
}

impl Default for DashboardCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CAPACITY)
    }
}

impl DashboardCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            source_series: Cache::builder().max_capacity(max_capacity).build(),
            combined_series: Cache::builder().max_capacity(max_capacity).build(),
            snapshots: Cache::builder().max_capacity(max_capacity).build(),
        }
    }

    /// Cached per-source series for `key`.
    pub async fn source_series(&self, key: &CacheKey) -> Option<Arc<Vec<DailyMetric>>> {
        self.source_series.get(key).await
    }

    /// Cached combined series.
    pub async fn combined_series(&self) -> Option<Arc<Vec<CombinedDailyMetric>>> {
        self.combined_series.get(&CacheKey::Combined).await
    }

    /// Cached snapshot for a source key or [`CacheKey::Combined`].
    pub async fn snapshot(&self, key: &CacheKey) -> Option<SnapshotMetric> {
        self.snapshots.get(key).await
    }

    /// Drops every value stored under `key`.
    pub async fn invalidate(&self, key: &CacheKey) {
        self.source_series.invalidate(key).await;
        self.combined_series.invalidate(key).await;
        self.snapshots.invalidate(key).await;
    }

    /// Drops all series, per-source and combined.
    pub fn invalidate_series(&self) {
        self.source_series.invalidate_all();
        self.combined_series.invalidate_all();
    }

    /// Drops all snapshots, per-source and combined.
    pub fn invalidate_snapshots(&self) {
        self.snapshots.invalidate_all();
    }

    pub fn invalidate_all(&self) {
        self.invalidate_series();
        self.invalidate_snapshots();
    }
}
