//! Cross-exchange aggregation.
//!
//! Both combiners are pure functions over already-normalized inputs. The
//! `try_*` variants report why a combination could not be produced; the plain
//! variants log the reason and fall back to an empty/zero result so callers
//! always get something displayable.

mod series;
mod snapshot;

use thiserror::Error;

pub use series::{combine_series, try_combine_series};
pub use snapshot::{combine_snapshots, liquidity_weights, try_combine_snapshots};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CombineError {
    /// Every input series was empty, so there is no date window to combine over.
    #[error("no non-empty series to anchor the combined date window")]
    MissingBaseSeries,
    /// The base series ends before it starts.
    #[error("base series is not sorted by date (starts {start}, ends {end})")]
    UnorderedBaseSeries { start: i64, end: i64 },
    /// The base series' date window holds more days than it has records, so
    /// it was not gap filled.
    #[error("base series spans {start}..={end} with only {len} records")]
    SparseBaseSeries { start: i64, end: i64, len: usize },
    #[error("no snapshots to combine")]
    NoSnapshots,
    /// Total liquidity across sources is zero, so no weights exist.
    #[error("total liquidity across sources is zero")]
    ZeroLiquidity,
}
