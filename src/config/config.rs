use config::{Config, ConfigError, Environment, File};
use log::LevelFilter;
use serde::Deserialize;

use crate::{
    subgraph::{Exchange, DEFAULT_BLOCKS_SUBGRAPH_URL},
    utils::MAX_LIQUIDITY_USD,
};

/// The token shown on the dashboard.
#[derive(Debug, Deserialize, Clone)]
pub struct TokenSettings {
    #[serde(default = "default_token_address")]
    pub address: String,
    #[serde(default = "default_token_symbol")]
    pub symbol: String,
    #[serde(default = "default_token_name")]
    pub name: String,
    /// Label of the currency the inverse quote is expressed in
    #[serde(default = "default_local_currency")]
    pub local_currency: String,
}

fn default_token_address() -> String {
    "0x6ae7dfc73e0dde2aa99ac063dcf7e8a63265108c".to_string() // JPYC on Polygon
}

fn default_token_symbol() -> String {
    "JPYC".to_string()
}

fn default_token_name() -> String {
    "JPY Coin".to_string()
}

fn default_local_currency() -> String {
    "JPY".to_string()
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            address: default_token_address(),
            symbol: default_token_symbol(),
            name: default_token_name(),
            local_currency: default_local_currency(),
        }
    }
}

/// One exchange to read from.
///
/// `subgraph_url` falls back to the exchange's public subgraph. When
/// `price_pool` is set, that pool's `token0Price` replaces the USD price
/// derived from the native token.
#[derive(Debug, Deserialize, Clone)]
pub struct ExchangeSettings {
    pub exchange: Exchange,
    #[serde(default)]
    pub subgraph_url: Option<String>,
    #[serde(default)]
    pub price_pool: Option<String>,
}

impl ExchangeSettings {
    pub fn subgraph_url(&self) -> &str {
        self.subgraph_url
            .as_deref()
            .unwrap_or_else(|| self.exchange.default_subgraph_url())
    }
}

fn default_exchanges() -> Vec<ExchangeSettings> {
    vec![
        ExchangeSettings {
            exchange: Exchange::UniswapV3,
            subgraph_url: None,
            // USDC/JPYC pool
            price_pool: Some("0x98349e1689538fd878646b77b3dcd89040a35eb6".to_string()),
        },
        ExchangeSettings {
            exchange: Exchange::Quickswap,
            subgraph_url: None,
            price_pool: None,
        },
    ]
}

/// Subgraph access shared by all exchanges.
#[derive(Debug, Deserialize, Clone)]
pub struct SubgraphSettings {
    /// Block-by-timestamp subgraph used to resolve 24h/48h-ago blocks
    #[serde(default = "default_blocks_url")]
    pub blocks_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Liquidity above this is treated as a subgraph error and shown as zero
    #[serde(default = "default_max_liquidity_usd")]
    pub max_liquidity_usd: f64,
}

fn default_blocks_url() -> String {
    DEFAULT_BLOCKS_SUBGRAPH_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_liquidity_usd() -> f64 {
    MAX_LIQUIDITY_USD
}

impl Default for SubgraphSettings {
    fn default() -> Self {
        Self {
            blocks_url: default_blocks_url(),
            request_timeout_secs: default_request_timeout_secs(),
            max_liquidity_usd: default_max_liquidity_usd(),
        }
    }
}

/// On-chain local-currency/USD price feed (Chainlink aggregator interface).
#[derive(Debug, Deserialize, Clone)]
pub struct OracleSettings {
    pub rpc_url: String,
    pub feed_address: String,
}

/// Periodic cache refresh. Disabled by default: the binary loads once and exits.
#[derive(Debug, Deserialize, Clone)]
pub struct RefreshSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_secs: u64,
    #[serde(default = "default_chart_interval")]
    pub chart_interval_secs: u64,
}

fn default_snapshot_interval() -> u64 {
    300 // 5 minutes
}

fn default_chart_interval() -> u64 {
    3600 // 1 hour
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            snapshot_interval_secs: default_snapshot_interval(),
            chart_interval_secs: default_chart_interval(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Root application configuration.
///
/// Loaded from an optional `config.yaml`, then `STABLEBOARD__*` environment
/// variables (e.g. `STABLEBOARD__LOGGING__LEVEL=debug`). Every field has a
/// default, so the dashboard runs without any configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub token: TokenSettings,
    #[serde(default = "default_exchanges")]
    pub exchanges: Vec<ExchangeSettings>,
    #[serde(default)]
    pub subgraph: SubgraphSettings,
    #[serde(default)]
    pub oracle: Option<OracleSettings>,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token: TokenSettings::default(),
            exchanges: default_exchanges(),
            subgraph: SubgraphSettings::default(),
            oracle: None,
            refresh: RefreshSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("STABLEBOARD").separator("__"))
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }

    /// Configured log level, `Info` when unrecognized.
    pub fn log_level(&self) -> LevelFilter {
        self.logging.level.parse().unwrap_or(LevelFilter::Info)
    }
}
