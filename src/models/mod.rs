mod daily_metric;
mod snapshot_metric;
mod token_state;

pub use daily_metric::{CombinedDailyMetric, DailyMetric};
pub use snapshot_metric::{CombinedSnapshotMetric, SnapshotMetric};
pub use token_state::TokenState;
