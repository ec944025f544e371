pub mod abis;
pub mod combine;
pub mod config;
pub mod cron;
pub mod models;
pub mod report;
pub mod store;
pub mod subgraph;
pub mod utils;
pub mod worker;

pub use combine::{combine_series, combine_snapshots, CombineError};
pub use config::Settings;
pub use cron::CronScheduler;
pub use models::{CombinedDailyMetric, CombinedSnapshotMetric, DailyMetric, SnapshotMetric};
pub use report::DashboardReport;
pub use store::{CacheKey, Dashboard, DashboardCache};
pub use subgraph::{Exchange, SubgraphClient, SubgraphError};
pub use worker::{MetricSource, RateOracle, SubgraphSource};
