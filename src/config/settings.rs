use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use super::ConfigError;
use crate::gateway::MULTICALL_BATCH_SIZE;

const BSC_MAINNET_RPC: &str = "https://bsc-dataseed.binance.org/";
const BSC_TESTNET_RPC: &str = "https://data-seed-prebsc-2-s2.binance.org:8545/";

/// Metric cache configuration.
///
/// Entries expire `ttl_secs` after insertion; expired entries are swept by
/// the cache itself.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_max_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            max_capacity: default_cache_max_capacity(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 {
    10
}

fn default_cache_max_capacity() -> u64 {
    16
}

/// Root process configuration.
///
/// Loaded from an optional `config.{toml,yaml,json}` in the working directory,
/// overridden by `UP_`-prefixed environment variables (`UP_CHAIN_ID`,
/// `UP_RPC_NODE`, `UP_CACHE__TTL_SECS`, ...).
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
    /// Falls back to the public endpoint of the selected chain.
    #[serde(default)]
    pub rpc_node: Option<String>,
    /// Network variant appended to the chain id when locating data files.
    #[serde(default)]
    pub suffix: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Symbol of the protocol token priced by `up_price` and `market_cap`.
    #[serde(default = "default_reference_token")]
    pub reference_token: String,
    #[serde(default = "default_multicall_batch_size")]
    pub multicall_batch_size: usize,
    #[serde(default)]
    pub cache: CacheSettings,
}

fn default_chain_id() -> String {
    "56".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("json")
}

fn default_reference_token() -> String {
    "up".to_string()
}

fn default_multicall_batch_size() -> usize {
    MULTICALL_BATCH_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            rpc_node: None,
            suffix: String::new(),
            data_dir: default_data_dir(),
            reference_token: default_reference_token(),
            multicall_batch_size: default_multicall_batch_size(),
            cache: CacheSettings::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("UP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }

    /// RPC endpoint, defaulting by chain: BSC mainnet for `56`, testnet otherwise.
    pub fn rpc_node(&self) -> &str {
        match &self.rpc_node {
            Some(url) => url.as_str(),
            None if self.chain_id == "56" => BSC_MAINNET_RPC,
            None => BSC_TESTNET_RPC,
        }
    }

    /// Directory holding `config.json` and `tokenlist.json` for the selected network.
    pub fn network_dir(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}{}", self.chain_id, self.suffix))
    }
}
