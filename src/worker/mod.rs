pub mod gap_fill;
pub mod oracle;
pub mod source;
pub mod token_math;

pub use gap_fill::fill_daily_gaps;
pub use oracle::RateOracle;
pub use source::{MetricSource, SubgraphSource};
pub use token_math::compute_snapshot;
