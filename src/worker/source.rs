use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::json;

use super::{gap_fill::fill_daily_gaps, token_math::compute_snapshot};
use crate::{
    models::{DailyMetric, SnapshotMetric, TokenState},
    subgraph::{
        queries::{self, DAY_DATAS_PAGE_SIZE},
        schema::{Blocks, Bundles, PoolResponse, RawToken, TokenDayDatas, Tokens},
        Exchange, SubgraphClient,
    },
    utils::{opt_str_to_f64, start_of_minute, str_to_f64, validate_usd_price, ONE_DAY_SECS},
};

/// Subgraphs reject `skip` beyond 5000, so at most six pages are reachable.
const MAX_DAY_DATA_PAGES: usize = 6;

/// Width of the window searched for the first block after a timestamp.
const BLOCK_SEARCH_WINDOW_SECS: i64 = 600;

/// Per-exchange supplier of the token's metrics.
#[async_trait]
pub trait MetricSource: Send + Sync {
    fn exchange(&self) -> Exchange;

    /// Gap-filled daily series for `address`, up to the day before `now`.
    async fn daily_series(&self, address: &str, now: i64) -> Result<Vec<DailyMetric>>;

    /// Current snapshot for `address` with 24h changes relative to `now`.
    async fn snapshot(&self, address: &str, now: i64) -> Result<SnapshotMetric>;
}

/// [`MetricSource`] backed by an exchange subgraph and the chain's block subgraph.
#[derive(Clone)]
pub struct SubgraphSource {
    exchange: Exchange,
    client: SubgraphClient,
    blocks: SubgraphClient,
    /// Pool whose `token0Price` overrides the derived USD price
    price_pool: Option<String>,
    max_liquidity_usd: f64,
}

impl SubgraphSource {
    pub fn new(
        exchange: Exchange,
        client: SubgraphClient,
        blocks: SubgraphClient,
        price_pool: Option<String>,
        max_liquidity_usd: f64,
    ) -> Self {
        Self {
            exchange,
            client,
            blocks,
            price_pool,
            max_liquidity_usd,
        }
    }

    /// Number of the first block mined in `(timestamp, timestamp + 600)`.
    pub async fn block_at(&self, timestamp: i64) -> Result<Option<u64>> {
        let response: Blocks = self
            .blocks
            .query(
                queries::BLOCK_AT,
                json!({
                    "timestampFrom": timestamp,
                    "timestampTo": timestamp + BLOCK_SEARCH_WINDOW_SECS,
                }),
            )
            .await
            .with_context(|| format!("Failed to look up block at {}", timestamp))?;

        Ok(response.blocks.first().and_then(|block| block.number()))
    }

    /// Native token USD price at `block` (head when `None`); `0.0` if absent.
    pub async fn eth_price(&self, block: Option<u64>) -> Result<f64> {
        let response: Bundles = self
            .client
            .query(&queries::eth_price(block), json!({}))
            .await
            .with_context(|| format!("Failed to fetch {} native price", self.exchange))?;

        Ok(opt_str_to_f64(response.bundles.first().map(|b| b.eth_price.as_str())))
    }

    /// Token counters at `block`; all zero when the token did not exist yet.
    pub async fn token_state(&self, address: &str, block: Option<u64>) -> Result<TokenState> {
        let response: Tokens = self
            .client
            .query(&queries::token_fields(self.exchange, block), json!({ "id": address }))
            .await
            .with_context(|| format!("Failed to fetch {} token fields", self.exchange))?;

        match response.tokens.into_iter().next() {
            Some(value) => Ok(RawToken::from_value(self.exchange, value)
                .with_context(|| format!("Unexpected {} token shape", self.exchange))?
                .state()),
            None => Ok(TokenState::default()),
        }
    }

    /// `token0Price` of the configured price pool.
    async fn pool_price(&self, pool: &str) -> Result<Option<f64>> {
        let response: PoolResponse = self
            .client
            .query(queries::POOL_PRICE, json!({ "id": pool }))
            .await
            .with_context(|| format!("Failed to fetch {} pool {}", self.exchange, pool))?;

        Ok(response.pool.and_then(|p| str_to_f64(&p.token0_price)))
    }

    async fn day_datas(&self, address: &str) -> Result<Vec<DailyMetric>> {
        let query = queries::token_day_datas(self.exchange);
        let mut records = Vec::new();

        for page in 0..MAX_DAY_DATA_PAGES {
            let response: TokenDayDatas = self
                .client
                .query(
                    &query,
                    json!({ "token": address, "skip": page * DAY_DATAS_PAGE_SIZE }),
                )
                .await
                .with_context(|| format!("Failed to fetch {} day datas", self.exchange))?;

            let fetched = response.token_day_datas.len();
            records.extend(
                response
                    .token_day_datas
                    .iter()
                    .filter_map(|raw| raw.normalize(self.exchange)),
            );

            if fetched < DAY_DATAS_PAGE_SIZE {
                break;
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl MetricSource for SubgraphSource {
    fn exchange(&self) -> Exchange {
        self.exchange
    }

    async fn daily_series(&self, address: &str, now: i64) -> Result<Vec<DailyMetric>> {
        let records = self.day_datas(address).await?;
        debug!("{}: {} day records for {}", self.exchange, records.len(), address);

        Ok(fill_daily_gaps(records, now))
    }

    async fn snapshot(&self, address: &str, now: i64) -> Result<SnapshotMetric> {
        let one_day_ts = start_of_minute(now - ONE_DAY_SECS);
        let two_day_ts = start_of_minute(now - 2 * ONE_DAY_SECS);

        let (one_day_block, two_day_block) =
            tokio::try_join!(self.block_at(one_day_ts), self.block_at(two_day_ts))?;

        if one_day_block.is_none() || two_day_block.is_none() {
            warn!(
                "{}: no block found for 24h/48h ago, changes will read as zero",
                self.exchange
            );
        }

        let (current, one_day, two_day, eth_price, eth_price_one_day) = tokio::try_join!(
            self.token_state(address, None),
            self.token_state(address, one_day_block),
            self.token_state(address, two_day_block),
            self.eth_price(None),
            self.eth_price(one_day_block),
        )?;

        let mut snapshot = compute_snapshot(
            eth_price,
            eth_price_one_day,
            &current,
            &one_day,
            &two_day,
            self.max_liquidity_usd,
        );

        if let Some(pool) = &self.price_pool {
            match self.pool_price(pool).await? {
                Some(price) => snapshot.price_usd = validate_usd_price(price),
                None => warn!("{}: price pool {} not found", self.exchange, pool),
            }
        }

        Ok(snapshot)
    }
}
