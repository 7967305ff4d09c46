//! Per-network protocol data and its resolved, immutable form.
//!
//! `config.json` and `tokenlist.json` name tokens by symbol and farms by
//! name. [`ProtocolContext::resolve`] turns those into concrete [`Token`]s and
//! addresses once at startup, so a typo fails the load instead of a metric.

use std::fs;
use std::path::Path;

use alloy::primitives::Address;
use log::info;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ConfigError, Settings};
use crate::models::{LockedSource, Position, Token};

// ============================================
// Raw JSON shapes
// ============================================

#[derive(Debug, Deserialize, Clone)]
pub struct OracleConfig {
    pub token: String,
    pub address: Address,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PriceHelperConfig {
    pub address: Address,
    pub base_token: String,
    pub quote_token: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PoolConfig {
    pub alias: String,
    pub want_token: Address,
    pub base_token: String,
    pub quote_token: String,
    pub strategy: Address,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StakingConfig {
    pub alias: String,
    pub want_token: Address,
    pub base_token: String,
    pub quote_token: String,
    pub local_farm: String,
    #[serde(default)]
    pub local_farm_pid: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocalFarmConfig {
    pub name: String,
    pub address: Address,
}

/// Contents of `config.json` for one network.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub multi_call: Address,
    #[serde(default)]
    pub oracles: Vec<OracleConfig>,
    #[serde(default)]
    pub price_helper: Vec<PriceHelperConfig>,
    #[serde(default)]
    pub pools: Vec<PoolConfig>,
    #[serde(default)]
    pub stakings: Vec<StakingConfig>,
    #[serde(default)]
    pub local_farms: Vec<LocalFarmConfig>,
    #[serde(default)]
    pub fix_supply_addresses: Vec<Address>,
}

/// Contents of `tokenlist.json`.
#[derive(Debug, Deserialize, Clone)]
pub struct TokenList {
    pub tokens: Vec<Token>,
}

// ============================================
// Token registry
// ============================================

/// Symbol → Token lookup; symbols are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    by_symbol: FxHashMap<String, Token>,
}

impl TokenRegistry {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        let by_symbol = tokens
            .into_iter()
            .map(|token| (token.symbol.to_lowercase(), token))
            .collect();
        Self { by_symbol }
    }

    pub fn get(&self, symbol: &str) -> Option<&Token> {
        self.by_symbol.get(&symbol.to_lowercase())
    }

    pub fn require(&self, symbol: &str) -> Result<&Token, ConfigError> {
        self.get(symbol)
            .ok_or_else(|| ConfigError::UnknownToken(symbol.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

// ============================================
// Resolved context
// ============================================

/// Oracle contract reporting a direct price for `token`.
#[derive(Debug, Clone)]
pub struct OracleFeed {
    pub token: Token,
    pub oracle: Address,
}

/// AMM pair whose balances give the exchange rate `base → quote`.
#[derive(Debug, Clone)]
pub struct PriceHelper {
    pub pair: Address,
    pub base: Token,
    pub quote: Token,
}

/// Read-only protocol data shared by every metric computation.
#[derive(Debug, Clone)]
pub struct ProtocolContext {
    pub multicall: Address,
    pub reference_token: Token,
    pub oracles: Vec<OracleFeed>,
    pub price_helpers: Vec<PriceHelper>,
    /// Pools first, then stakings, in configuration order.
    pub positions: Vec<Position>,
    /// Holders whose balances are not part of circulating supply.
    pub excluded_holders: Vec<Address>,
    tokens: TokenRegistry,
}

impl ProtocolContext {
    /// Read `config.json` and `tokenlist.json` for the network selected in `settings`.
    pub fn load(settings: &Settings) -> Result<Self, ConfigError> {
        let dir = settings.network_dir();
        let network: NetworkConfig = read_json(&dir.join("config.json"))?;
        let token_list: TokenList = read_json(&dir.join("tokenlist.json"))?;

        let ctx = Self::resolve(
            TokenRegistry::new(token_list.tokens),
            &network,
            &settings.reference_token,
        )?;

        info!(
            "Loaded network {} ({} tokens, {} oracles, {} price helpers, {} positions)",
            dir.display(),
            ctx.tokens.len(),
            ctx.oracles.len(),
            ctx.price_helpers.len(),
            ctx.positions.len()
        );

        Ok(ctx)
    }

    pub fn resolve(
        tokens: TokenRegistry,
        network: &NetworkConfig,
        reference_symbol: &str,
    ) -> Result<Self, ConfigError> {
        let reference_token = tokens.require(reference_symbol)?.clone();

        let oracles = network
            .oracles
            .iter()
            .map(|o| {
                Ok(OracleFeed {
                    token: tokens.require(&o.token)?.clone(),
                    oracle: o.address,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let price_helpers = network
            .price_helper
            .iter()
            .map(|h| {
                Ok(PriceHelper {
                    pair: h.address,
                    base: tokens.require(&h.base_token)?.clone(),
                    quote: tokens.require(&h.quote_token)?.clone(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let mut positions = Vec::with_capacity(network.pools.len() + network.stakings.len());
        for pool in &network.pools {
            positions.push(Position {
                alias: pool.alias.clone(),
                want: pool.want_token,
                base_token: tokens.require(&pool.base_token)?.clone(),
                quote_token: tokens.require(&pool.quote_token)?.clone(),
                source: LockedSource::Strategy {
                    strategy: pool.strategy,
                },
            });
        }
        for staking in &network.stakings {
            let farm = network
                .local_farms
                .iter()
                .find(|f| f.name == staking.local_farm)
                .ok_or_else(|| ConfigError::UnknownFarm(staking.local_farm.clone()))?;
            positions.push(Position {
                alias: staking.alias.clone(),
                want: staking.want_token,
                base_token: tokens.require(&staking.base_token)?.clone(),
                quote_token: tokens.require(&staking.quote_token)?.clone(),
                source: LockedSource::Farm {
                    farm: farm.address,
                    pid: staking.local_farm_pid,
                },
            });
        }

        Ok(Self {
            multicall: network.multi_call,
            reference_token,
            oracles,
            price_helpers,
            positions,
            excluded_holders: network.fix_supply_addresses.clone(),
            tokens,
        })
    }

    pub fn token(&self, symbol: &str) -> Option<&Token> {
        self.tokens.get(symbol)
    }

    /// Distinct LP pair addresses across all paired positions, first-seen order.
    pub fn lp_pairs(&self) -> Vec<Address> {
        let mut seen = FxHashSet::default();
        self.positions
            .iter()
            .filter(|p| p.is_lp())
            .filter(|p| seen.insert(p.want))
            .map(|p| p.want)
            .collect()
    }

    /// Single-asset staking of the reference token itself; its size is the
    /// farm's share supply rather than a want-token balance.
    pub fn is_reference_staking(&self, position: &Position) -> bool {
        position.base_token == self.reference_token && position.quote_token == self.reference_token
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}
