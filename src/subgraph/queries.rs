//! Query documents for the exchange and block subgraphs.
//!
//! Field names differ per exchange; the builders here pick the right ones and
//! [`super::schema`] maps them back onto one shape.

use super::Exchange;

/// Id of the singleton `Bundle` entity holding the native token price.
pub const BUNDLE_ID: &str = "1";

/// Page size for `tokenDayDatas` (subgraph maximum for `first`).
pub const DAY_DATAS_PAGE_SIZE: usize = 1000;

/// First block in an open timestamp interval.
///
/// Variables: `timestampFrom: Int!`, `timestampTo: Int!`
pub const BLOCK_AT: &str = r#"
query blocks($timestampFrom: Int!, $timestampTo: Int!) {
  blocks(
    first: 1
    orderBy: timestamp
    orderDirection: asc
    where: { timestamp_gt: $timestampFrom, timestamp_lt: $timestampTo }
  ) {
    id
    number
    timestamp
  }
}
"#;

/// Spot prices of a single pool.
///
/// Variables: `id: ID!`
pub const POOL_PRICE: &str = r#"
query pool($id: ID!) {
  pool(id: $id) {
    token0Price
    token1Price
  }
}
"#;

/// Daily records for one token, oldest first.
///
/// Variables: `token: String!`, `skip: Int!`
pub fn token_day_datas(exchange: Exchange) -> String {
    let (volume_field, liquidity_field) = match exchange {
        Exchange::UniswapV3 => ("volumeUSD", "totalValueLockedUSD"),
        Exchange::Sushiswap => ("volumeUSD", "liquidityUSD"),
        Exchange::Quickswap => ("dailyVolumeUSD", "totalLiquidityUSD"),
    };

    format!(
        r#"
query tokenDayDatas($token: String!, $skip: Int!) {{
  tokenDayDatas(first: {DAY_DATAS_PAGE_SIZE}, skip: $skip, orderBy: date, orderDirection: asc, where: {{ token: $token }}) {{
    date
    {volume_field}
    {liquidity_field}
    priceUSD
  }}
}}
"#
    )
}

/// Cumulative token counters, at `block` when given, otherwise at the head.
///
/// Variables: `id: ID!`
pub fn token_fields(exchange: Exchange, block: Option<u64>) -> String {
    let fields = match exchange {
        Exchange::UniswapV3 => {
            "id name symbol volume volumeUSD untrackedVolumeUSD totalValueLocked totalValueLockedUSD derivedETH"
        },
        Exchange::Quickswap => {
            "id name symbol tradeVolume tradeVolumeUSD untrackedVolumeUSD totalLiquidity derivedETH"
        },
        Exchange::Sushiswap => {
            "id name symbol volume volumeUSD untrackedVolumeUSD liquidity derivedETH"
        },
    };

    format!(
        r#"
query tokens($id: ID!) {{
  tokens({block}where: {{ id: $id }}) {{
    {fields}
  }}
}}
"#,
        block = block_clause(block),
    )
}

/// Native token USD price, at `block` when given.
pub fn eth_price(block: Option<u64>) -> String {
    format!(
        r#"
query bundles {{
  bundles({block}where: {{ id: "{BUNDLE_ID}" }}) {{
    id
    ethPrice
  }}
}}
"#,
        block = block_clause(block),
    )
}

fn block_clause(block: Option<u64>) -> String {
    block
        .map(|number| format!("block: {{ number: {number} }}, "))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_datas_fields_per_exchange() {
        let v3 = token_day_datas(Exchange::UniswapV3);
        assert!(v3.contains("volumeUSD") && v3.contains("totalValueLockedUSD"));

        let sushi = token_day_datas(Exchange::Sushiswap);
        assert!(sushi.contains("liquidityUSD") && !sushi.contains("totalValueLockedUSD"));

        let quick = token_day_datas(Exchange::Quickswap);
        assert!(quick.contains("dailyVolumeUSD") && quick.contains("totalLiquidityUSD"));
        assert!(quick.contains("first: 1000"));
    }

    #[test]
    fn test_token_fields_block_clause() {
        let head = token_fields(Exchange::Quickswap, None);
        assert!(!head.contains("block:"));
        assert!(head.contains("tradeVolumeUSD"));

        let historical = token_fields(Exchange::UniswapV3, Some(25_000_000));
        assert!(historical.contains("block: { number: 25000000 }, where"));
        assert!(historical.contains("totalValueLocked"));
    }

    #[test]
    fn test_eth_price_bundle() {
        let query = eth_price(Some(7));
        assert!(query.contains(r#"id: "1""#));
        assert!(query.contains("block: { number: 7 }"));
    }
}
