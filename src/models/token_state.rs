/// Cumulative token counters read from a subgraph at one block.
///
/// All exchanges are normalized into this shape before any 24h figures
/// are derived from them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TokenState {
    /// Lifetime tracked USD volume
    pub volume_usd: f64,
    /// Lifetime USD volume including non-whitelisted pairs
    pub untracked_volume_usd: f64,
    /// Liquidity in token units
    pub total_liquidity: f64,
    /// Token price in the chain's native token
    pub derived_eth: f64,
}
