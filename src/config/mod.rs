mod network;
mod settings;

use std::path::PathBuf;

use thiserror::Error;

pub use network::{
    LocalFarmConfig, NetworkConfig, OracleConfig, OracleFeed, PoolConfig, PriceHelper,
    PriceHelperConfig, ProtocolContext, StakingConfig, TokenList, TokenRegistry,
};
pub use settings::{CacheSettings, Settings};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid RPC url `{url}`: {source}")]
    InvalidRpcUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unknown token symbol `{0}`")]
    UnknownToken(String),

    #[error("unknown local farm `{0}`")]
    UnknownFarm(String),
}
