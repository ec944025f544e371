//! Utility functions for the dashboard.
//!
//! This module is organized into focused submodules:
//!
//! - [`numbers`] - Division and percent-change helpers that never yield NaN/Infinity
//! - [`validation`] - Sanity bounds for USD figures coming from subgraphs
//! - [`conversion`] - Decimal string parsing and hex encoding
//! - [`day`] - Day boundary arithmetic
//! - [`address`] - Token address parsing and display

mod address;
mod conversion;
mod day;
mod numbers;
mod validation;

// ============================================
// Re-exports
// ============================================

// Address utilities
pub use address::{normalize_address, parse_address, shorten_address};

// Conversion utilities
pub use conversion::{hex_encode, opt_str_to_f64, str_to_f64, str_to_f64_with_decimals};

// Day arithmetic
pub use day::{day_index, start_of_minute, ONE_DAY_SECS};

// Numeric absorption policy
pub use numbers::{finite_or_zero, percent_change, safe_div, two_day_percent_change};

// Validation utilities
pub use validation::{
    validate_usd_price, validate_usd_tvl, validate_usd_volume, MAX_LIQUIDITY_USD,
};
