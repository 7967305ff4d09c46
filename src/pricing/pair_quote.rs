use alloy::primitives::{Address, U256};
use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::Serialize;

use crate::utils::{big_pow10, u256_to_big};

/// Price of a token read straight off one pair and the oracle of its counter asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairQuote {
    /// `oracle_price × other_reserve / (own_reserve × 10^oracle_decimals)`.
    pub price: BigDecimal,
    /// `other_reserve / own_reserve`, absent when the token's own reserve is empty.
    pub price_related: Option<BigDecimal>,
}

pub fn pair_quote(
    token: Address,
    token0: Address,
    reserves: (U256, U256),
    oracle_price: U256,
    oracle_decimals: u8,
) -> PairQuote {
    let (reserve0, reserve1) = reserves;
    let (own, other) = if token == token0 {
        (reserve0, reserve1)
    } else {
        (reserve1, reserve0)
    };

    if own.is_zero() {
        return PairQuote {
            price: BigDecimal::zero(),
            price_related: None,
        };
    }

    let own = u256_to_big(own);
    let other = u256_to_big(other);
    let price =
        u256_to_big(oracle_price) * &other / (&own * big_pow10(oracle_decimals as u32));

    PairQuote {
        price,
        price_related: Some(other / own),
    }
}
