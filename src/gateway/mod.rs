//! Remote Read Gateway: batched, read-only contract calls.
//!
//! Calls are described by a closed set of typed reads ([`ReadCall`]) and
//! results come back as typed values ([`ReadValue`]) keyed by the label the
//! caller attached to each call. A gateway either answers every call or
//! fails the whole request; there are no partial results.

mod multicall;

use std::future::Future;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use futures::future::try_join_all;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::abis::{IPriceOracle, IStrategy, IUniswapV2Pair, IERC20};

pub use multicall::MulticallGateway;

/// Upper bound on calls packed into one multicall request.
pub const MULTICALL_BATCH_SIZE: usize = 20;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("multicall batch of {calls} calls failed: {source}")]
    Batch {
        calls: usize,
        #[source]
        source: alloy::contract::Error,
    },

    #[error("multicall returned {got} results for {expected} calls")]
    LengthMismatch { expected: usize, got: usize },

    #[error("failed to decode `{label}`: {reason}")]
    Decode { label: String, reason: String },

    #[error("no result for `{0}`")]
    MissingLabel(String),

    #[error("`{label}` decoded as {found}, expected {expected}")]
    UnexpectedShape {
        label: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Failure reported by a [`ReadGateway`] that does not go through an
    /// alloy contract call, such as an alternative transport or an in-memory
    /// gateway.
    #[error("transport error: {0}")]
    Transport(String),
}

/// The read operations the SDK ever issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadCall {
    BalanceOf { token: Address, owner: Address },
    TotalSupply { token: Address },
    GetReserves { pair: Address },
    LatestPrice { oracle: Address },
    Token0 { pair: Address },
    WantLockedTotal { strategy: Address },
}

impl ReadCall {
    /// Contract the call is sent to.
    pub fn target(&self) -> Address {
        match self {
            ReadCall::BalanceOf { token, .. } => *token,
            ReadCall::TotalSupply { token } => *token,
            ReadCall::GetReserves { pair } => *pair,
            ReadCall::LatestPrice { oracle } => *oracle,
            ReadCall::Token0 { pair } => *pair,
            ReadCall::WantLockedTotal { strategy } => *strategy,
        }
    }

    pub fn calldata(&self) -> Bytes {
        let encoded = match self {
            ReadCall::BalanceOf { owner, .. } => IERC20::balanceOfCall { owner: *owner }.abi_encode(),
            ReadCall::TotalSupply { .. } => IERC20::totalSupplyCall {}.abi_encode(),
            ReadCall::GetReserves { .. } => IUniswapV2Pair::getReservesCall {}.abi_encode(),
            ReadCall::LatestPrice { .. } => IPriceOracle::getLatestPriceCall {}.abi_encode(),
            ReadCall::Token0 { .. } => IUniswapV2Pair::token0Call {}.abi_encode(),
            ReadCall::WantLockedTotal { .. } => IStrategy::wantLockedTotalCall {}.abi_encode(),
        };
        encoded.into()
    }

    /// Decode raw return data into the value shape of this call.
    pub fn decode(&self, data: &[u8]) -> Result<ReadValue, alloy::sol_types::Error> {
        let value = match self {
            ReadCall::BalanceOf { .. } => {
                ReadValue::Amount(IERC20::balanceOfCall::abi_decode_returns(data)?)
            },
            ReadCall::TotalSupply { .. } => {
                ReadValue::Amount(IERC20::totalSupplyCall::abi_decode_returns(data)?)
            },
            ReadCall::WantLockedTotal { .. } => {
                ReadValue::Amount(IStrategy::wantLockedTotalCall::abi_decode_returns(data)?)
            },
            ReadCall::GetReserves { .. } => {
                let r = IUniswapV2Pair::getReservesCall::abi_decode_returns(data)?;
                ReadValue::Reserves {
                    reserve0: r.reserve0,
                    reserve1: r.reserve1,
                }
            },
            ReadCall::LatestPrice { .. } => {
                let r = IPriceOracle::getLatestPriceCall::abi_decode_returns(data)?;
                ReadValue::LatestPrice {
                    price: r.price,
                    decimals: r.decimals,
                }
            },
            ReadCall::Token0 { .. } => {
                ReadValue::Address(IUniswapV2Pair::token0Call::abi_decode_returns(data)?)
            },
        };
        Ok(value)
    }
}

/// A read tagged with the key its result is stored under.
#[derive(Debug, Clone)]
pub struct LabeledCall {
    pub label: String,
    pub call: ReadCall,
}

impl LabeledCall {
    pub fn new(label: impl Into<String>, call: ReadCall) -> Self {
        Self {
            label: label.into(),
            call,
        }
    }
}

/// Decoded result of a [`ReadCall`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadValue {
    Amount(U256),
    Reserves { reserve0: U256, reserve1: U256 },
    LatestPrice { price: U256, decimals: u8 },
    Address(Address),
}

impl ReadValue {
    fn kind(&self) -> &'static str {
        match self {
            ReadValue::Amount(_) => "amount",
            ReadValue::Reserves { .. } => "reserves",
            ReadValue::LatestPrice { .. } => "latest price",
            ReadValue::Address(_) => "address",
        }
    }
}

/// Results of one gateway request, keyed by call label.
#[derive(Debug, Clone, Default)]
pub struct ReadResults {
    values: FxHashMap<String, ReadValue>,
}

impl ReadResults {
    pub fn insert(&mut self, label: impl Into<String>, value: ReadValue) {
        self.values.insert(label.into(), value);
    }

    /// Fold another sub-batch into this one. Later labels win.
    pub fn merge(&mut self, other: ReadResults) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, label: &str) -> Result<&ReadValue, GatewayError> {
        self.values
            .get(label)
            .ok_or_else(|| GatewayError::MissingLabel(label.to_string()))
    }

    pub fn amount(&self, label: &str) -> Result<U256, GatewayError> {
        match self.get(label)? {
            ReadValue::Amount(v) => Ok(*v),
            other => Err(shape_error(label, "amount", other)),
        }
    }

    pub fn reserves(&self, label: &str) -> Result<(U256, U256), GatewayError> {
        match self.get(label)? {
            ReadValue::Reserves { reserve0, reserve1 } => Ok((*reserve0, *reserve1)),
            other => Err(shape_error(label, "reserves", other)),
        }
    }

    pub fn latest_price(&self, label: &str) -> Result<(U256, u8), GatewayError> {
        match self.get(label)? {
            ReadValue::LatestPrice { price, decimals } => Ok((*price, *decimals)),
            other => Err(shape_error(label, "latest price", other)),
        }
    }

    pub fn address(&self, label: &str) -> Result<Address, GatewayError> {
        match self.get(label)? {
            ReadValue::Address(v) => Ok(*v),
            other => Err(shape_error(label, "address", other)),
        }
    }
}

fn shape_error(label: &str, expected: &'static str, found: &ReadValue) -> GatewayError {
    GatewayError::UnexpectedShape {
        label: label.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Executes batched read-only calls.
///
/// `batch_size` bounds how many calls go into a single request; larger call
/// lists are split and the pieces dispatched concurrently. Any failing piece
/// fails the whole call.
#[async_trait]
pub trait ReadGateway: Send + Sync {
    async fn read(
        &self,
        calls: Vec<LabeledCall>,
        batch_size: usize,
    ) -> Result<ReadResults, GatewayError>;
}

/// Split `calls` into sub-batches of at most `batch_size`, run them
/// concurrently and merge the results by label.
///
/// `batch_size` is clamped to `1..=MULTICALL_BATCH_SIZE`; a larger hint
/// never produces a bigger sub-batch.
///
/// The first failing sub-batch fails the whole request; nothing is merged
/// from the others.
pub async fn dispatch_batches<'a, F, Fut>(
    calls: &'a [LabeledCall],
    batch_size: usize,
    run: F,
) -> Result<ReadResults, GatewayError>
where
    F: Fn(&'a [LabeledCall]) -> Fut,
    Fut: Future<Output = Result<ReadResults, GatewayError>>,
{
    if calls.is_empty() {
        return Ok(ReadResults::default());
    }

    let size = batch_size.clamp(1, MULTICALL_BATCH_SIZE);
    let parts = try_join_all(calls.chunks(size).map(run)).await?;

    let mut merged = ReadResults::default();
    for part in parts {
        merged.merge(part);
    }
    Ok(merged)
}
