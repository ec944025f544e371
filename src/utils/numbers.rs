//! Numeric helpers shared by the combiners and the snapshot math.
//!
//! Every helper here maps a non-finite result (NaN, ±Infinity) to `0.0`.
//! Callers rely on this: a figure that cannot be computed shows up as zero
//! instead of poisoning sums further down.

/// Returns `value` if finite, `0.0` otherwise.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `numerator / denominator`, or `0.0` when the denominator is zero or the
/// quotient is not finite.
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    finite_or_zero(numerator / denominator)
}

/// Percent change from `value_24h_ago` to `value_now`.
///
/// Returns `0.0` when the old value is zero or either input is not finite.
#[inline]
pub fn percent_change(value_now: f64, value_24h_ago: f64) -> f64 {
    finite_or_zero(safe_div(value_now - value_24h_ago, value_24h_ago) * 100.0)
}

/// Splits cumulative counters sampled now, 24h ago and 48h ago into the
/// last-24h delta and its percent change against the previous 24h delta.
///
/// # Returns
/// `(current_change, adjusted_percent_change)`; the percent is `0.0` when the
/// previous window had no change.
pub fn two_day_percent_change(
    value_now: f64,
    value_24h_ago: f64,
    value_48h_ago: f64,
) -> (f64, f64) {
    let current_change = value_now - value_24h_ago;
    let previous_change = value_24h_ago - value_48h_ago;

    let adjusted = finite_or_zero(safe_div(current_change - previous_change, previous_change) * 100.0);

    (finite_or_zero(current_change), adjusted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div_zero_denominator() {
        assert_eq!(safe_div(10.0, 0.0), 0.0);
        assert_eq!(safe_div(0.0, 0.0), 0.0);
        assert_eq!(safe_div(-3.0, 0.0), 0.0);
    }

    #[test]
    fn test_safe_div_non_finite_inputs() {
        assert_eq!(safe_div(f64::NAN, 2.0), 0.0);
        assert_eq!(safe_div(f64::INFINITY, 2.0), 0.0);
        assert_eq!(safe_div(f64::MAX, f64::MIN_POSITIVE), 0.0);
    }

    #[test]
    fn test_safe_div_regular() {
        assert_eq!(safe_div(100.0, 400.0), 0.25);
    }

    #[test]
    fn test_percent_change() {
        assert!((percent_change(110.0, 100.0) - 10.0).abs() < 1e-9);
        assert!((percent_change(50.0, 100.0) + 50.0).abs() < 1e-9);
        assert_eq!(percent_change(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_two_day_percent_change() {
        // 48h ago: 100, 24h ago: 150 (+50), now: 250 (+100)
        let (current, pct) = two_day_percent_change(250.0, 150.0, 100.0);
        assert_eq!(current, 100.0);
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_day_percent_change_flat_previous_window() {
        let (current, pct) = two_day_percent_change(120.0, 100.0, 100.0);
        assert_eq!(current, 20.0);
        assert_eq!(pct, 0.0);
    }
}
