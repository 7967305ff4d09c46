#![allow(dead_code)]

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use rustc_hash::FxHashMap;

use up_sdk::config::{
    LocalFarmConfig, NetworkConfig, OracleConfig, PoolConfig, PriceHelperConfig, StakingConfig,
    TokenRegistry,
};
use up_sdk::gateway::{dispatch_batches, LabeledCall, ReadCall, ReadResults, ReadValue};
use up_sdk::{GatewayError, ProtocolContext, ReadGateway, Settings, Token, UpSdk};

pub const UP: u8 = 0x01;
pub const WBNB: u8 = 0x02;
pub const BUSD: u8 = 0x03;
pub const CAKE: u8 = 0x04;

pub const UP_BNB_LP: u8 = 0x10;
pub const UP_BNB_HELPER: u8 = 0x11;
pub const CAKE_BUSD_HELPER: u8 = 0x12;

pub const WBNB_ORACLE: u8 = 0x20;
pub const BUSD_ORACLE: u8 = 0x21;

pub const LP_STRATEGY: u8 = 0x30;
pub const CAKE_STRATEGY: u8 = 0x31;
pub const UP_FARM: u8 = 0x40;
pub const LP_FARM: u8 = 0x41;

pub const TREASURY: u8 = 0x50;
pub const TEAM: u8 = 0x51;

pub const MULTICALL: u8 = 0xee;

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

/// `whole` tokens expressed in 18-decimal base units.
pub fn ether(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(18u64))
}

/// Chain state answered by [`MockGateway`], keyed the same way the calls are.
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    /// (token, owner) → balance
    pub balances: FxHashMap<(Address, Address), U256>,
    pub supplies: FxHashMap<Address, U256>,
    pub reserves: FxHashMap<Address, (U256, U256)>,
    pub token0: FxHashMap<Address, Address>,
    pub prices: FxHashMap<Address, (U256, u8)>,
    pub want_locked: FxHashMap<Address, U256>,
}

impl MockChain {
    fn answer(&self, call: &ReadCall) -> Result<ReadValue, GatewayError> {
        let reverted = || GatewayError::Transport(format!("execution reverted: {:?}", call));

        match call {
            ReadCall::BalanceOf { token, owner } => self
                .balances
                .get(&(*token, *owner))
                .map(|v| ReadValue::Amount(*v))
                .ok_or_else(reverted),
            ReadCall::TotalSupply { token } => self
                .supplies
                .get(token)
                .map(|v| ReadValue::Amount(*v))
                .ok_or_else(reverted),
            ReadCall::GetReserves { pair } => self
                .reserves
                .get(pair)
                .map(|(reserve0, reserve1)| ReadValue::Reserves {
                    reserve0: *reserve0,
                    reserve1: *reserve1,
                })
                .ok_or_else(reverted),
            ReadCall::LatestPrice { oracle } => self
                .prices
                .get(oracle)
                .map(|(price, decimals)| ReadValue::LatestPrice {
                    price: *price,
                    decimals: *decimals,
                })
                .ok_or_else(reverted),
            ReadCall::Token0 { pair } => self
                .token0
                .get(pair)
                .map(|a| ReadValue::Address(*a))
                .ok_or_else(reverted),
            ReadCall::WantLockedTotal { strategy } => self
                .want_locked
                .get(strategy)
                .map(|v| ReadValue::Amount(*v))
                .ok_or_else(reverted),
        }
    }
}

/// In-memory [`ReadGateway`] that records every request it serves.
///
/// A call with no backing state fails its whole sub-batch, the same way a
/// reverting call fails a Multicall `aggregate`.
#[derive(Debug, Default)]
pub struct MockGateway {
    chain: MockChain,
    delay: Duration,
    reads: AtomicUsize,
    batches: Mutex<Vec<usize>>,
    requests: Mutex<Vec<Vec<ReadCall>>>,
}

impl MockGateway {
    pub fn new(chain: MockChain) -> Self {
        Self {
            chain,
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of `read` requests served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Size of every sub-batch dispatched so far.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<Vec<ReadCall>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReadGateway for MockGateway {
    async fn read(
        &self,
        calls: Vec<LabeledCall>,
        batch_size: usize,
    ) -> Result<ReadResults, GatewayError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push(calls.iter().map(|c| c.call.clone()).collect());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        dispatch_batches(&calls, batch_size, |chunk| {
            self.batches.lock().unwrap().push(chunk.len());
            let answered = chunk
                .iter()
                .map(|c| Ok((c.label.clone(), self.chain.answer(&c.call)?)))
                .collect::<Result<Vec<_>, GatewayError>>();
            async move {
                let mut results = ReadResults::default();
                for (label, value) in answered? {
                    results.insert(label, value);
                }
                Ok(results)
            }
        })
        .await
    }
}

pub fn tokens() -> TokenRegistry {
    TokenRegistry::new([
        Token::new(addr(UP), 18, "UP", "Up Token"),
        Token::new(addr(WBNB), 18, "WBNB", "Wrapped BNB"),
        Token::new(addr(BUSD), 18, "BUSD", "Binance USD"),
        Token::new(addr(CAKE), 18, "CAKE", "PancakeSwap Token"),
    ])
}

/// Two LP positions on one pair, one single-asset vault and one
/// reference-token staking, priced through two helper pairs.
pub fn network() -> NetworkConfig {
    NetworkConfig {
        multi_call: addr(MULTICALL),
        oracles: vec![
            OracleConfig {
                token: "wbnb".to_string(),
                address: addr(WBNB_ORACLE),
            },
            OracleConfig {
                token: "busd".to_string(),
                address: addr(BUSD_ORACLE),
            },
        ],
        price_helper: vec![
            PriceHelperConfig {
                address: addr(UP_BNB_HELPER),
                base_token: "up".to_string(),
                quote_token: "wbnb".to_string(),
            },
            PriceHelperConfig {
                address: addr(CAKE_BUSD_HELPER),
                base_token: "cake".to_string(),
                quote_token: "busd".to_string(),
            },
        ],
        pools: vec![
            PoolConfig {
                alias: "UP-BNB LP".to_string(),
                want_token: addr(UP_BNB_LP),
                base_token: "up".to_string(),
                quote_token: "wbnb".to_string(),
                strategy: addr(LP_STRATEGY),
            },
            PoolConfig {
                alias: "CAKE".to_string(),
                want_token: addr(CAKE),
                base_token: "cake".to_string(),
                quote_token: "cake".to_string(),
                strategy: addr(CAKE_STRATEGY),
            },
        ],
        stakings: vec![
            StakingConfig {
                alias: "UP staking".to_string(),
                want_token: addr(UP),
                base_token: "up".to_string(),
                quote_token: "up".to_string(),
                local_farm: "up-farm".to_string(),
                local_farm_pid: 0,
            },
            StakingConfig {
                alias: "UP-BNB farm".to_string(),
                want_token: addr(UP_BNB_LP),
                base_token: "up".to_string(),
                quote_token: "wbnb".to_string(),
                local_farm: "lp-farm".to_string(),
                local_farm_pid: 1,
            },
        ],
        local_farms: vec![
            LocalFarmConfig {
                name: "up-farm".to_string(),
                address: addr(UP_FARM),
            },
            LocalFarmConfig {
                name: "lp-farm".to_string(),
                address: addr(LP_FARM),
            },
        ],
        fix_supply_addresses: vec![addr(TREASURY), addr(TEAM)],
    }
}

/// State behind [`network`]:
///
/// - WBNB = 300, BUSD = 1 from the oracles
/// - UP = 0.001 WBNB = 0.3, CAKE = 2.5 BUSD = 2.5 through the helpers
/// - UP-BNB LP share = 300 × 0.5 × 2 / 10 = 30
/// - TVL = 2 × 30 + 4 × 2.5 + 100 × 0.3 + 1 × 30 = 130
/// - circulating UP = 1_000_000 - 400_000 - 100_000, market cap = 150_000
pub fn chain() -> MockChain {
    let mut chain = MockChain::default();

    chain
        .prices
        .insert(addr(WBNB_ORACLE), (U256::from(30_000_000_000u64), 8));
    chain
        .prices
        .insert(addr(BUSD_ORACLE), (U256::from(100_000_000u64), 8));

    chain
        .balances
        .insert((addr(UP), addr(UP_BNB_HELPER)), ether(1_000));
    chain
        .balances
        .insert((addr(WBNB), addr(UP_BNB_HELPER)), ether(1));
    chain
        .balances
        .insert((addr(CAKE), addr(CAKE_BUSD_HELPER)), ether(100));
    chain
        .balances
        .insert((addr(BUSD), addr(CAKE_BUSD_HELPER)), ether(250));

    chain.token0.insert(addr(UP_BNB_LP), addr(UP));
    chain.reserves.insert(
        addr(UP_BNB_LP),
        (ether(500), ether(1) / U256::from(2u64)),
    );
    chain.supplies.insert(addr(UP_BNB_LP), ether(10));

    chain.want_locked.insert(addr(LP_STRATEGY), ether(2));
    chain.want_locked.insert(addr(CAKE_STRATEGY), ether(4));
    chain.supplies.insert(addr(UP_FARM), ether(100));
    chain
        .balances
        .insert((addr(UP_BNB_LP), addr(LP_FARM)), ether(1));

    chain.supplies.insert(addr(UP), ether(1_000_000));
    chain
        .balances
        .insert((addr(UP), addr(TREASURY)), ether(400_000));
    chain.balances.insert((addr(UP), addr(TEAM)), ether(100_000));

    chain
}

pub fn context(network: &NetworkConfig) -> ProtocolContext {
    ProtocolContext::resolve(tokens(), network, "up").unwrap()
}

pub fn sdk(gateway: MockGateway) -> UpSdk<MockGateway> {
    sdk_with(context(&network()), gateway, Settings::default())
}

pub fn sdk_with(
    ctx: ProtocolContext,
    gateway: MockGateway,
    settings: Settings,
) -> UpSdk<MockGateway> {
    UpSdk::new(Arc::new(ctx), gateway, &settings)
}
