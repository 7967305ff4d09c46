use alloy::primitives::{Address, U256};
use bigdecimal::BigDecimal;
use log::debug;
use num_traits::Zero;
use rustc_hash::FxHashMap;

use super::graph::PriceGraph;
use crate::error::{MetricsError, MetricsResult};
use crate::models::{Position, Token};
use crate::utils::{big_pow10, u256_to_big, ON_CHAIN_DECIMALS};

/// Reserve and share-supply reads of one LP pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LpState {
    pub token0: Address,
    pub reserve0: U256,
    pub reserve1: U256,
    pub total_supply: U256,
}

impl LpState {
    /// Reserve on the side of `quote`, matched against the pair's `token0`.
    pub fn quote_reserve(&self, quote: &Token) -> U256 {
        if self.token0 == quote.address {
            self.reserve0
        } else {
            self.reserve1
        }
    }
}

/// Unnormalized value of one position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionValue {
    pub alias: String,
    pub value: BigDecimal,
}

/// Fair price of one LP share: `quote_price × quote_reserve × 2 / total_supply`.
///
/// The factor 2 assumes both sides of the pool hold equal value.
fn lp_share_price(quote_price: &BigDecimal, lp: &LpState, quote: &Token) -> BigDecimal {
    let reserve = u256_to_big(lp.quote_reserve(quote));
    quote_price * reserve * BigDecimal::from(2) / u256_to_big(lp.total_supply)
}

/// Value of a single position.
///
/// Single-asset: `quote_price × locked / 10^18`.
/// LP: `share_price × locked / 10^18`, requiring the pair's `lp` state.
pub fn value_position(
    position: &Position,
    quote_price: &BigDecimal,
    lp: Option<&LpState>,
    locked: U256,
) -> MetricsResult<PositionValue> {
    let unit_price = if position.is_single_asset() {
        quote_price.clone()
    } else {
        let lp = lp.ok_or_else(|| {
            MetricsError::DataConsistency(format!(
                "no reserve reads for LP {} of {}",
                position.want, position.alias
            ))
        })?;

        if lp.total_supply.is_zero() {
            if !locked.is_zero() {
                return Err(MetricsError::DataConsistency(format!(
                    "{} locks {} shares of LP {} which has zero total supply",
                    position.alias, locked, position.want
                )));
            }
            BigDecimal::zero()
        } else {
            lp_share_price(quote_price, lp, &position.quote_token)
        }
    };

    let value = unit_price * u256_to_big(locked) / big_pow10(ON_CHAIN_DECIMALS);

    Ok(PositionValue {
        alias: position.alias.clone(),
        value,
    })
}

/// Value every position, routing each distinct quote token once.
///
/// `locked` is index-aligned with `positions`. The first quote token without
/// a route aborts the whole run.
pub fn value_positions(
    positions: &[Position],
    graph: &PriceGraph,
    lps: &FxHashMap<Address, LpState>,
    locked: &[U256],
) -> MetricsResult<Vec<PositionValue>> {
    if positions.len() != locked.len() {
        return Err(MetricsError::DataConsistency(format!(
            "{} locked amounts for {} positions",
            locked.len(),
            positions.len()
        )));
    }

    let mut quote_prices: FxHashMap<Address, BigDecimal> = FxHashMap::default();
    let mut values = Vec::with_capacity(positions.len());

    for (position, amount) in positions.iter().zip(locked) {
        let quote = &position.quote_token;
        let price = match quote_prices.get(&quote.address) {
            Some(price) => price.clone(),
            None => {
                let price = graph.price_of(quote)?;
                quote_prices.insert(quote.address, price.clone());
                price
            },
        };

        let value = value_position(position, &price, lps.get(&position.want), *amount)?;
        debug!("{}: {}", value.alias, value.value);
        values.push(value);
    }

    Ok(values)
}
