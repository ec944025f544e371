/// Seconds in one UTC day; subgraph day records are aligned to this.
pub const ONE_DAY_SECS: i64 = 86_400;

/// Index of the day nearest to `timestamp` (rounded, not floored), so
/// records stamped slightly off the boundary still land on their day.
#[inline]
pub fn day_index(timestamp: i64) -> i64 {
    (timestamp + ONE_DAY_SECS / 2).div_euclid(ONE_DAY_SECS)
}

/// Truncates `timestamp` to the start of its minute.
#[inline]
pub fn start_of_minute(timestamp: i64) -> i64 {
    timestamp - timestamp.rem_euclid(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_index_rounds() {
        assert_eq!(day_index(0), 0);
        assert_eq!(day_index(ONE_DAY_SECS), 1);
        assert_eq!(day_index(ONE_DAY_SECS - 1), 1);
        assert_eq!(day_index(ONE_DAY_SECS + 100), 1);
        assert_eq!(day_index(ONE_DAY_SECS / 2 - 1), 0);
    }

    #[test]
    fn test_start_of_minute() {
        assert_eq!(start_of_minute(1_700_000_059), 1_700_000_040);
        assert_eq!(start_of_minute(120), 120);
    }
}
