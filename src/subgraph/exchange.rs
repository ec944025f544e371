use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Block-by-timestamp subgraph for Polygon.
pub const DEFAULT_BLOCKS_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/sameepsi/maticblocks";

/// A DEX whose subgraph is read by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    #[serde(rename = "UNIV3")]
    UniswapV3,
    #[serde(rename = "QUICK")]
    Quickswap,
    #[serde(rename = "SUSHI")]
    Sushiswap,
}

impl Exchange {
    pub const ALL: [Exchange; 3] = [Exchange::UniswapV3, Exchange::Quickswap, Exchange::Sushiswap];

    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::UniswapV3 => "UNIV3",
            Exchange::Quickswap => "QUICK",
            Exchange::Sushiswap => "SUSHI",
        }
    }

    pub fn default_subgraph_url(&self) -> &'static str {
        match self {
            Exchange::UniswapV3 => {
                "https://api.thegraph.com/subgraphs/name/ianlapham/uniswap-v3-polygon"
            },
            Exchange::Quickswap => "https://api.thegraph.com/subgraphs/name/sameepsi/quickswap06",
            Exchange::Sushiswap => "https://api.thegraph.com/subgraphs/name/sushiswap/matic-exchange",
        }
    }

    /// Token page on the exchange's own analytics site.
    pub fn analytics_url(&self, token: &str) -> String {
        match self {
            Exchange::UniswapV3 => format!("https://info.uniswap.org/#/polygon/tokens/{token}"),
            Exchange::Quickswap => format!("https://info.quickswap.exchange/#/token/{token}"),
            Exchange::Sushiswap => format!("https://analytics-polygon.sushi.com/tokens/{token}"),
        }
    }

    /// Swap page with the token preselected as input.
    pub fn swap_url(&self, token: &str) -> String {
        match self {
            Exchange::UniswapV3 => format!("https://app.uniswap.org/#/swap?inputCurrency={token}"),
            Exchange::Quickswap => {
                format!("https://quickswap.exchange/#/swap?inputCurrency={token}")
            },
            Exchange::Sushiswap => format!("https://app.sushi.com/swap?inputCurrency={token}"),
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Exchange::ALL
            .into_iter()
            .find(|exchange| exchange.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown exchange: {s}"))
    }
}
