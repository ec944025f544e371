pub mod refresh_charts;
pub mod refresh_snapshots;

/// Current unix time in seconds.
pub(crate) fn unix_now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}
