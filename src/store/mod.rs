//! Cached dashboard reads over the configured exchanges.

mod cache;
mod dashboard;
#[cfg(test)]
pub(crate) mod fake;

pub use cache::{CacheKey, DashboardCache};
pub use dashboard::Dashboard;
