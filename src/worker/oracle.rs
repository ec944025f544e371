use std::time::Duration;

use alloy::{
    primitives::Address,
    providers::{DynProvider, ProviderBuilder},
};
use anyhow::{Context, Result};
use url::Url;

use crate::{abis::IAggregatorV3, utils::str_to_f64_with_decimals};

/// Timeout for individual RPC calls (30 seconds)
const RPC_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Reads a fiat/USD rate from an on-chain price feed aggregator.
#[derive(Clone)]
pub struct RateOracle {
    provider: DynProvider,
    feed: Address,
}

impl RateOracle {
    pub fn new(rpc_url: Url, feed: Address) -> Self {
        let client = ProviderBuilder::new().connect_http(rpc_url);

        Self {
            provider: DynProvider::new(client),
            feed,
        }
    }

    /// Latest answer of the feed, scaled by the feed's decimals.
    pub async fn latest_rate(&self) -> Result<f64> {
        let feed = IAggregatorV3::new(self.feed, &self.provider);

        let decimals = tokio::time::timeout(RPC_CALL_TIMEOUT, feed.decimals().call())
            .await
            .context("Price feed decimals() timeout")?
            .context("Price feed decimals() failed")?;

        let round = tokio::time::timeout(RPC_CALL_TIMEOUT, feed.latestRoundData().call())
            .await
            .context("Price feed latestRoundData() timeout")?
            .context("Price feed latestRoundData() failed")?;

        str_to_f64_with_decimals(&round.answer.to_string(), decimals)
            .with_context(|| format!("Price feed answer {} is not a valid rate", round.answer))
    }
}
