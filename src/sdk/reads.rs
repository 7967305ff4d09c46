//! Read groups feeding the metric computations.
//!
//! Each group is one gateway request; a group either returns every value it
//! asked for or fails as a whole.

use alloy::primitives::{Address, U256};
use log::debug;
use rustc_hash::FxHashMap;

use crate::config::ProtocolContext;
use crate::error::MetricsResult;
use crate::gateway::{LabeledCall, ReadCall, ReadGateway};
use crate::models::LockedSource;
use crate::pricing::{HelperReading, LpState, OracleReading};

/// `getLatestPrice()` of every configured oracle.
pub async fn oracle_readings<G>(
    ctx: &ProtocolContext,
    gateway: &G,
    batch_size: usize,
) -> MetricsResult<Vec<OracleReading>>
where
    G: ReadGateway + ?Sized,
{
    let calls = ctx
        .oracles
        .iter()
        .enumerate()
        .map(|(i, feed)| {
            LabeledCall::new(
                format!("oracle-{}", i),
                ReadCall::LatestPrice {
                    oracle: feed.oracle,
                },
            )
        })
        .collect();

    let results = gateway.read(calls, batch_size).await?;

    let readings = ctx
        .oracles
        .iter()
        .enumerate()
        .map(|(i, feed)| {
            let (price, decimals) = results.latest_price(&format!("oracle-{}", i))?;
            Ok(OracleReading {
                token: feed.token.clone(),
                price,
                decimals,
            })
        })
        .collect::<MetricsResult<Vec<_>>>()?;

    debug!("Read {} oracle prices", readings.len());
    Ok(readings)
}

/// Base and quote balances held by every price-helper pair.
pub async fn helper_readings<G>(
    ctx: &ProtocolContext,
    gateway: &G,
    batch_size: usize,
) -> MetricsResult<Vec<HelperReading>>
where
    G: ReadGateway + ?Sized,
{
    let mut calls = Vec::with_capacity(ctx.price_helpers.len() * 2);
    for (i, helper) in ctx.price_helpers.iter().enumerate() {
        calls.push(LabeledCall::new(
            format!("helper-{}-base", i),
            ReadCall::BalanceOf {
                token: helper.base.address,
                owner: helper.pair,
            },
        ));
        calls.push(LabeledCall::new(
            format!("helper-{}-quote", i),
            ReadCall::BalanceOf {
                token: helper.quote.address,
                owner: helper.pair,
            },
        ));
    }

    let results = gateway.read(calls, batch_size).await?;

    let readings = ctx
        .price_helpers
        .iter()
        .enumerate()
        .map(|(i, helper)| {
            Ok(HelperReading {
                base: helper.base.clone(),
                quote: helper.quote.clone(),
                base_balance: results.amount(&format!("helper-{}-base", i))?,
                quote_balance: results.amount(&format!("helper-{}-quote", i))?,
            })
        })
        .collect::<MetricsResult<Vec<_>>>()?;

    debug!("Read {} price-helper pairs", readings.len());
    Ok(readings)
}

/// `token0`, `getReserves` and `totalSupply` of every distinct LP pair.
pub async fn lp_states<G>(
    ctx: &ProtocolContext,
    gateway: &G,
    batch_size: usize,
) -> MetricsResult<FxHashMap<Address, LpState>>
where
    G: ReadGateway + ?Sized,
{
    let pairs = ctx.lp_pairs();

    let mut calls = Vec::with_capacity(pairs.len() * 3);
    for pair in &pairs {
        calls.push(LabeledCall::new(
            format!("{}-token0", pair),
            ReadCall::Token0 { pair: *pair },
        ));
        calls.push(LabeledCall::new(
            format!("{}-getReserves", pair),
            ReadCall::GetReserves { pair: *pair },
        ));
        calls.push(LabeledCall::new(
            format!("{}-totalSupply", pair),
            ReadCall::TotalSupply { token: *pair },
        ));
    }

    let results = gateway.read(calls, batch_size).await?;

    let mut states = FxHashMap::default();
    for pair in pairs {
        let (reserve0, reserve1) = results.reserves(&format!("{}-getReserves", pair))?;
        states.insert(
            pair,
            LpState {
                token0: results.address(&format!("{}-token0", pair))?,
                reserve0,
                reserve1,
                total_supply: results.amount(&format!("{}-totalSupply", pair))?,
            },
        );
    }

    debug!("Read {} LP pairs", states.len());
    Ok(states)
}

/// Locked amount of every position, index-aligned with `ctx.positions`.
pub async fn locked_amounts<G>(
    ctx: &ProtocolContext,
    gateway: &G,
    batch_size: usize,
) -> MetricsResult<Vec<U256>>
where
    G: ReadGateway + ?Sized,
{
    let calls = ctx
        .positions
        .iter()
        .enumerate()
        .map(|(i, position)| {
            let call = match position.source {
                LockedSource::Strategy { strategy } => ReadCall::WantLockedTotal { strategy },
                LockedSource::Farm { farm, .. } if ctx.is_reference_staking(position) => {
                    ReadCall::TotalSupply { token: farm }
                },
                LockedSource::Farm { farm, .. } => ReadCall::BalanceOf {
                    token: position.want,
                    owner: farm,
                },
            };
            LabeledCall::new(format!("position-{}", i), call)
        })
        .collect();

    let results = gateway.read(calls, batch_size).await?;

    let amounts = (0..ctx.positions.len())
        .map(|i| results.amount(&format!("position-{}", i)))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Read {} locked amounts", amounts.len());
    Ok(amounts)
}

/// Reference-token total supply and the balance of every excluded holder.
pub async fn supply_readings<G>(
    ctx: &ProtocolContext,
    gateway: &G,
    batch_size: usize,
) -> MetricsResult<(U256, Vec<(Address, U256)>)>
where
    G: ReadGateway + ?Sized,
{
    let token = ctx.reference_token.address;

    let mut calls = Vec::with_capacity(ctx.excluded_holders.len() + 1);
    calls.push(LabeledCall::new("totalSupply", ReadCall::TotalSupply { token }));
    for (i, holder) in ctx.excluded_holders.iter().enumerate() {
        calls.push(LabeledCall::new(
            format!("excluded-{}", i),
            ReadCall::BalanceOf {
                token,
                owner: *holder,
            },
        ));
    }

    let results = gateway.read(calls, batch_size).await?;

    let total_supply = results.amount("totalSupply")?;
    let excluded = ctx
        .excluded_holders
        .iter()
        .enumerate()
        .map(|(i, holder)| Ok((*holder, results.amount(&format!("excluded-{}", i))?)))
        .collect::<MetricsResult<Vec<_>>>()?;

    Ok((total_supply, excluded))
}

/// Oracle price, `token0` and reserves for a direct pair quote.
pub async fn pair_readings<G>(
    gateway: &G,
    pair: Address,
    oracle: Address,
    batch_size: usize,
) -> MetricsResult<(U256, u8, Address, (U256, U256))>
where
    G: ReadGateway + ?Sized,
{
    let calls = vec![
        LabeledCall::new("latestPrice", ReadCall::LatestPrice { oracle }),
        LabeledCall::new("token0", ReadCall::Token0 { pair }),
        LabeledCall::new("getReserves", ReadCall::GetReserves { pair }),
    ];

    let results = gateway.read(calls, batch_size).await?;

    let (price, decimals) = results.latest_price("latestPrice")?;
    Ok((
        price,
        decimals,
        results.address("token0")?,
        results.reserves("getReserves")?,
    ))
}
