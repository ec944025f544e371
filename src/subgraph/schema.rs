//! Raw subgraph response types and their normalization.
//!
//! Every exchange names the same concept differently (`volumeUSD` vs
//! `tradeVolumeUSD`, `liquidity` vs `totalLiquidity` vs `totalValueLocked`).
//! These types mirror each schema and convert into [`DailyMetric`] /
//! [`TokenState`], so nothing downstream branches on the exchange.

use serde::Deserialize;
use serde_json::Value;

use super::Exchange;
use crate::{
    models::{DailyMetric, TokenState},
    utils::{opt_str_to_f64, str_to_f64},
};

// ============================================
// Day data
// ============================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDayDatas {
    pub token_day_datas: Vec<RawDayData>,
}

/// A `tokenDayDatas` record with every exchange's field names optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDayData {
    pub date: i64,
    #[serde(rename = "volumeUSD")]
    pub volume_usd: Option<String>,
    #[serde(rename = "dailyVolumeUSD")]
    pub daily_volume_usd: Option<String>,
    #[serde(rename = "totalValueLockedUSD")]
    pub total_value_locked_usd: Option<String>,
    #[serde(rename = "liquidityUSD")]
    pub liquidity_usd: Option<String>,
    #[serde(rename = "totalLiquidityUSD")]
    pub total_liquidity_usd: Option<String>,
    #[serde(rename = "priceUSD")]
    pub price_usd: Option<String>,
}

impl RawDayData {
    /// Maps the exchange's volume/liquidity fields onto a [`DailyMetric`].
    ///
    /// Records missing either field (or with unparsable values) are dropped.
    /// A missing price is treated as no price (`0.0`).
    pub fn normalize(&self, exchange: Exchange) -> Option<DailyMetric> {
        let (volume, liquidity) = match exchange {
            Exchange::UniswapV3 => (&self.volume_usd, &self.total_value_locked_usd),
            Exchange::Sushiswap => (&self.volume_usd, &self.liquidity_usd),
            Exchange::Quickswap => (&self.daily_volume_usd, &self.total_liquidity_usd),
        };

        let volume = str_to_f64(volume.as_deref()?)?;
        let liquidity = str_to_f64(liquidity.as_deref()?)?;
        let price = opt_str_to_f64(self.price_usd.as_deref());

        Some(DailyMetric::new(self.date, volume, liquidity, price))
    }
}

// ============================================
// Token counters
// ============================================

#[derive(Debug, Deserialize)]
pub struct Tokens {
    pub tokens: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UniswapV3Token {
    pub id: String,
    #[serde(rename = "volumeUSD")]
    pub volume_usd: Option<String>,
    #[serde(rename = "untrackedVolumeUSD")]
    pub untracked_volume_usd: Option<String>,
    #[serde(rename = "totalValueLocked")]
    pub total_value_locked: Option<String>,
    #[serde(rename = "derivedETH")]
    pub derived_eth: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuickswapToken {
    pub id: String,
    #[serde(rename = "tradeVolumeUSD")]
    pub trade_volume_usd: Option<String>,
    #[serde(rename = "untrackedVolumeUSD")]
    pub untracked_volume_usd: Option<String>,
    #[serde(rename = "totalLiquidity")]
    pub total_liquidity: Option<String>,
    #[serde(rename = "derivedETH")]
    pub derived_eth: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SushiswapToken {
    pub id: String,
    #[serde(rename = "volumeUSD")]
    pub volume_usd: Option<String>,
    #[serde(rename = "untrackedVolumeUSD")]
    pub untracked_volume_usd: Option<String>,
    pub liquidity: Option<String>,
    #[serde(rename = "derivedETH")]
    pub derived_eth: Option<String>,
}

/// A token entity in the schema of the exchange it came from.
#[derive(Debug, Clone)]
pub enum RawToken {
    UniswapV3(UniswapV3Token),
    Quickswap(QuickswapToken),
    Sushiswap(SushiswapToken),
}

impl RawToken {
    pub fn from_value(exchange: Exchange, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match exchange {
            Exchange::UniswapV3 => RawToken::UniswapV3(serde_json::from_value(value)?),
            Exchange::Quickswap => RawToken::Quickswap(serde_json::from_value(value)?),
            Exchange::Sushiswap => RawToken::Sushiswap(serde_json::from_value(value)?),
        })
    }

    pub fn exchange(&self) -> Exchange {
        match self {
            RawToken::UniswapV3(_) => Exchange::UniswapV3,
            RawToken::Quickswap(_) => Exchange::Quickswap,
            RawToken::Sushiswap(_) => Exchange::Sushiswap,
        }
    }

    pub fn state(&self) -> TokenState {
        let (volume, untracked, liquidity, derived_eth) = match self {
            RawToken::UniswapV3(t) => (
                &t.volume_usd,
                &t.untracked_volume_usd,
                &t.total_value_locked,
                &t.derived_eth,
            ),
            RawToken::Quickswap(t) => (
                &t.trade_volume_usd,
                &t.untracked_volume_usd,
                &t.total_liquidity,
                &t.derived_eth,
            ),
            RawToken::Sushiswap(t) => (
                &t.volume_usd,
                &t.untracked_volume_usd,
                &t.liquidity,
                &t.derived_eth,
            ),
        };

        TokenState {
            volume_usd: opt_str_to_f64(volume.as_deref()),
            untracked_volume_usd: opt_str_to_f64(untracked.as_deref()),
            total_liquidity: opt_str_to_f64(liquidity.as_deref()),
            derived_eth: opt_str_to_f64(derived_eth.as_deref()),
        }
    }
}

// ============================================
// Bundles, blocks, pools
// ============================================

#[derive(Debug, Deserialize)]
pub struct Bundles {
    pub bundles: Vec<RawBundle>,
}

#[derive(Debug, Deserialize)]
pub struct RawBundle {
    #[serde(rename = "ethPrice")]
    pub eth_price: String,
}

#[derive(Debug, Deserialize)]
pub struct Blocks {
    pub blocks: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
pub struct RawBlock {
    pub number: String,
    pub timestamp: String,
}

impl RawBlock {
    pub fn number(&self) -> Option<u64> {
        self.number.trim().parse().ok()
    }
}

#[derive(Debug, Deserialize)]
pub struct PoolResponse {
    pub pool: Option<RawPool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPool {
    pub token0_price: String,
    pub token1_price: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_metric(actual: Option<DailyMetric>, expected: DailyMetric) {
        let actual = actual.expect("record should normalize");
        assert_eq!(actual.date, expected.date);
        assert!((actual.daily_volume_usd - expected.daily_volume_usd).abs() < 1e-9);
        assert!((actual.total_liquidity_usd - expected.total_liquidity_usd).abs() < 1e-9);
        assert!((actual.price_usd - expected.price_usd).abs() < 1e-12);
    }

    #[test]
    fn test_day_data_normalized_per_exchange() {
        let v3: RawDayData = serde_json::from_value(json!({
            "date": 1_650_000_000,
            "volumeUSD": "1200.5",
            "totalValueLockedUSD": "50000",
            "priceUSD": "0.0078"
        }))
        .unwrap();
        assert_metric(
            v3.normalize(Exchange::UniswapV3),
            DailyMetric::new(1_650_000_000, 1200.5, 50000.0, 0.0078),
        );

        let sushi: RawDayData = serde_json::from_value(json!({
            "date": 86400,
            "volumeUSD": "10",
            "liquidityUSD": "20",
            "priceUSD": "0.5"
        }))
        .unwrap();
        assert_metric(
            sushi.normalize(Exchange::Sushiswap),
            DailyMetric::new(86400, 10.0, 20.0, 0.5),
        );

        let quick: RawDayData = serde_json::from_value(json!({
            "date": 86400,
            "dailyVolumeUSD": "3",
            "totalLiquidityUSD": "4",
            "priceUSD": "0"
        }))
        .unwrap();
        assert_metric(
            quick.normalize(Exchange::Quickswap),
            DailyMetric::new(86400, 3.0, 4.0, 0.0),
        );
    }

    #[test]
    fn test_day_data_missing_fields_dropped() {
        // Quickswap-shaped record read as Uniswap V3
        let quick: RawDayData = serde_json::from_value(json!({
            "date": 86400,
            "dailyVolumeUSD": "3",
            "totalLiquidityUSD": "4",
            "priceUSD": "1"
        }))
        .unwrap();
        assert_eq!(quick.normalize(Exchange::UniswapV3), None);

        let garbage = RawDayData {
            date: 0,
            volume_usd: Some("x".into()),
            total_value_locked_usd: Some("1".into()),
            ..Default::default()
        };
        assert_eq!(garbage.normalize(Exchange::UniswapV3), None);
    }

    #[test]
    fn test_token_state_per_exchange() {
        let quick = RawToken::from_value(
            Exchange::Quickswap,
            json!({
                "id": "0x6ae7dfc73e0dde2aa99ac063dcf7e8a63265108c",
                "name": "JPY Coin",
                "symbol": "JPYC",
                "tradeVolume": "1000",
                "tradeVolumeUSD": "7.5",
                "untrackedVolumeUSD": "8",
                "totalLiquidity": "123456",
                "derivedETH": "0.000003"
            }),
        )
        .unwrap();
        assert_eq!(quick.exchange(), Exchange::Quickswap);
        let state = quick.state();
        assert!((state.volume_usd - 7.5).abs() < 1e-12);
        assert!((state.untracked_volume_usd - 8.0).abs() < 1e-12);
        assert!((state.total_liquidity - 123456.0).abs() < 1e-9);
        assert!((state.derived_eth - 0.000003).abs() < 1e-15);

        let sushi = RawToken::from_value(
            Exchange::Sushiswap,
            json!({ "id": "0x1", "volumeUSD": "1", "liquidity": "2", "derivedETH": "3" }),
        )
        .unwrap();
        let state = sushi.state();
        assert!((state.total_liquidity - 2.0).abs() < 1e-12);
        assert_eq!(state.untracked_volume_usd, 0.0);

        let v3 = RawToken::from_value(
            Exchange::UniswapV3,
            json!({ "id": "0x1", "volumeUSD": "5", "totalValueLocked": "6", "derivedETH": "0.1" }),
        )
        .unwrap();
        assert!((v3.state().total_liquidity - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_block_number_parsing() {
        let blocks: Blocks = serde_json::from_value(json!({
            "blocks": [{ "id": "0xabc", "number": "25000123", "timestamp": "1650000000" }]
        }))
        .unwrap();
        assert_eq!(blocks.blocks[0].number(), Some(25_000_123));
    }
}
