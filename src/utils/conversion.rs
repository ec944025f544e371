//! Decimal string parsing and formatting utilities.
//!
//! Subgraphs serialize `BigDecimal`/`BigInt` fields as JSON strings. These are
//! parsed through `BigDecimal` so long mantissas do not lose precision before
//! the final conversion to f64.

use alloy::primitives::hex;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use once_cell::sync::Lazy;
use std::str::FromStr;

// ============================================
// Hex Encoding
// ============================================

/// Encode bytes as a lowercase hex string with 0x prefix.
pub fn hex_encode(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// ============================================
// String to f64 Conversions
// ============================================

/// Parse a subgraph decimal string (e.g. `"12345.678901234567890123"`) to f64.
///
/// Returns `None` if the string is not a number or the value is not finite.
pub fn str_to_f64(value_str: &str) -> Option<f64> {
    let big_value = BigDecimal::from_str(value_str.trim()).ok()?;

    let result = big_value.to_f64()?;

    if result.is_finite() {
        Some(result)
    } else {
        None
    }
}

/// Like [`str_to_f64`] for optional fields; missing or unparsable values are `0.0`.
pub fn opt_str_to_f64(value_str: Option<&str>) -> f64 {
    value_str.and_then(str_to_f64).unwrap_or(0.0)
}

/// Parse an integer string with a fixed number of implied decimals to f64.
///
/// Used for oracle answers (e.g. `"651234"` with 8 decimals).
///
/// # Returns
/// * `Some(f64)` if parsing succeeds and value is non-negative, `None` otherwise
pub fn str_to_f64_with_decimals(value_str: &str, decimals: u8) -> Option<f64> {
    let big_value = BigDecimal::from_str(value_str.trim()).ok()?;

    let adjusted = big_value / big_pow10(decimals);

    let result = adjusted.to_f64()?;

    if result.is_finite() && result >= 0.0 {
        Some(result)
    } else {
        None
    }
}

// ============================================
// Internal Helpers
// ============================================

static POW10_CACHE: Lazy<[BigDecimal; 25]> =
    Lazy::new(|| std::array::from_fn(|i| BigDecimal::from(BigInt::from(10u32).pow(i as u32))));

/// Compute 10^exp as BigDecimal.
pub(crate) fn big_pow10(exp: u8) -> BigDecimal {
    if (exp as usize) < POW10_CACHE.len() {
        POW10_CACHE[exp as usize].clone()
    } else {
        BigDecimal::from(BigInt::from(10u32).pow(exp as u32))
    }
}
