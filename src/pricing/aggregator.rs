use alloy::primitives::{Address, U256};
use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::Serialize;

use super::valuator::PositionValue;
use crate::error::{MetricsError, MetricsResult};
use crate::utils::{big_pow10, floor_to_scale, u256_to_big, ON_CHAIN_DECIMALS, PRESENTATION_SCALE};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TvlEntry {
    pub alias: String,
    pub tvl: BigDecimal,
}

/// Total value locked with its per-position breakdown, floored to 8 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TvlReport {
    pub total: BigDecimal,
    pub detail: Vec<TvlEntry>,
}

/// Sum position values at full precision and floor only the presented figures.
pub fn total_value_locked(values: Vec<PositionValue>) -> TvlReport {
    let total = values
        .iter()
        .fold(BigDecimal::zero(), |acc, v| acc + &v.value);

    let detail = values
        .into_iter()
        .map(|v| TvlEntry {
            tvl: floor_to_scale(&v.value, PRESENTATION_SCALE),
            alias: v.alias,
        })
        .collect();

    TvlReport {
        total: floor_to_scale(&total, PRESENTATION_SCALE),
        detail,
    }
}

/// `total_supply` minus the balances of every excluded holder.
///
/// Balances that add up to more than the supply mean the reads are stale or
/// inconsistent; that is reported, never clamped to zero.
pub fn circulating_supply(total_supply: U256, excluded: &[(Address, U256)]) -> MetricsResult<U256> {
    let mut remaining = total_supply;
    for (holder, balance) in excluded {
        remaining = remaining.checked_sub(*balance).ok_or_else(|| {
            MetricsError::DataConsistency(format!(
                "excluded holder {} balance {} exceeds remaining supply {}",
                holder, balance, remaining
            ))
        })?;
    }
    Ok(remaining)
}

/// `price × circulating / 10^18`, full precision.
pub fn market_cap(price: &BigDecimal, circulating: U256) -> BigDecimal {
    price * u256_to_big(circulating) / big_pow10(ON_CHAIN_DECIMALS)
}
