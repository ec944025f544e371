//! Token address helpers.

use std::str::FromStr;

use alloy::primitives::Address;

use super::hex_encode;

/// Parses a hex address in any letter case. Returns `None` for anything else.
pub fn parse_address(value: &str) -> Option<Address> {
    Address::from_str(value.trim().to_lowercase().as_str()).ok()
}

/// Lowercase `0x`-prefixed form used in subgraph queries and cache keys.
pub fn normalize_address(value: &str) -> Option<String> {
    parse_address(value).map(|address| hex_encode(address.as_slice()))
}

/// Checksummed address shortened to `0x1234...abcd` with `chars` characters
/// kept on each side.
pub fn shorten_address(value: &str, chars: usize) -> Option<String> {
    let checksummed = parse_address(value)?.to_checksum(None);
    let chars = chars.min(20);
    Some(format!(
        "{}...{}",
        &checksummed[..chars + 2],
        &checksummed[42 - chars..]
    ))
}
