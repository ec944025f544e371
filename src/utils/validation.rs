//! Sanity bounds for USD figures reported by subgraphs.
//!
//! Subgraph liquidity for thin tokens is occasionally off by many orders of
//! magnitude (a mispriced derived-ETH multiplied into token liquidity). Values
//! beyond these bounds are reported as zero rather than shown.

// ============================================
// Validation Constants
// ============================================

/// Liquidity above this (≈ $2 trillion) is treated as a subgraph error.
pub const MAX_LIQUIDITY_USD: f64 = 2_059_073_682_054.0;

// ============================================
// Validation Helpers
// ============================================

/// Validate a USD price: non-negative and finite, else `0.0`.
#[inline]
pub fn validate_usd_price(price: f64) -> f64 {
    if price >= 0.0 && price.is_finite() {
        price
    } else {
        0.0
    }
}

/// Validate a USD volume: non-negative and finite, else `0.0`.
///
/// A negative 24h volume means the counters moved backwards between blocks
/// (subgraph reindex); it is reported as no volume.
#[inline]
pub fn validate_usd_volume(volume: f64) -> f64 {
    if volume >= 0.0 && volume.is_finite() {
        volume
    } else {
        0.0
    }
}

/// Validate a USD TVL against `max_tvl_usd`.
/// Returns the TVL if valid, 0.0 if invalid.
#[inline]
pub fn validate_usd_tvl(tvl: f64, max_tvl_usd: f64) -> f64 {
    if tvl >= 0.0 && tvl.is_finite() && tvl <= max_tvl_usd {
        tvl
    } else {
        0.0
    }
}
