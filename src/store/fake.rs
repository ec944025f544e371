//! In-memory [`MetricSource`] for dashboard tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::{
    models::{DailyMetric, SnapshotMetric},
    subgraph::Exchange,
    worker::MetricSource,
};

/// Serves fixed figures and counts how often each one was requested.
/// `None` makes the matching call fail.
pub(crate) struct FakeSource {
    exchange: Exchange,
    series: Option<Vec<DailyMetric>>,
    snapshot: Option<SnapshotMetric>,
    series_calls: AtomicUsize,
    snapshot_calls: AtomicUsize,
}

impl FakeSource {
    pub(crate) fn new(
        exchange: Exchange,
        series: Option<Vec<DailyMetric>>,
        snapshot: Option<SnapshotMetric>,
    ) -> Arc<Self> {
        Arc::new(Self {
            exchange,
            series,
            snapshot,
            series_calls: AtomicUsize::new(0),
            snapshot_calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn series_calls(&self) -> usize {
        self.series_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn snapshot_calls(&self) -> usize {
        self.snapshot_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricSource for FakeSource {
    fn exchange(&self) -> Exchange {
        self.exchange
    }

    async fn daily_series(&self, _address: &str, _now: i64) -> Result<Vec<DailyMetric>> {
        self.series_calls.fetch_add(1, Ordering::SeqCst);
        self.series.clone().ok_or_else(|| anyhow!("subgraph down"))
    }

    async fn snapshot(&self, _address: &str, _now: i64) -> Result<SnapshotMetric> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot.ok_or_else(|| anyhow!("subgraph down"))
    }
}
