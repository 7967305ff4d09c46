//! Exact conversions between raw on-chain integers and decimals.
//!
//! Nothing in here goes through `f64`: every monetary value is built from
//! the integer's digits and stays a `BigDecimal` until presentation.

use alloy::primitives::U256;
use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign};
use once_cell::sync::Lazy;

// ============================================
// U256 Conversions
// ============================================

/// Convert an on-chain `U256` into an exact `BigDecimal` (scale 0).
///
/// # Example
/// ```ignore
/// let raw = U256::from(1_500_000_000_000_000_000u128);
/// assert_eq!(u256_to_big(raw).to_string(), "1500000000000000000");
/// ```
pub fn u256_to_big(value: U256) -> BigDecimal {
    let bytes: [u8; 32] = value.to_le_bytes();
    BigDecimal::from(BigInt::from_bytes_le(Sign::Plus, &bytes))
}

/// Convert a raw token amount into whole units, dividing by `10^decimals`.
pub fn scale_down(value: U256, decimals: u32) -> BigDecimal {
    let raw = u256_to_big(value);
    if decimals == 0 {
        raw
    } else {
        raw / big_pow10(decimals)
    }
}

// ============================================
// Presentation
// ============================================

/// Floor `value` to `scale` fractional digits.
///
/// Used only when a value leaves the crate for display; internal math keeps
/// full precision.
pub fn floor_to_scale(value: &BigDecimal, scale: i64) -> BigDecimal {
    value.with_scale_round(scale, RoundingMode::Floor)
}

// ============================================
// Internal Helpers
// ============================================

static POW10_CACHE: Lazy<[BigDecimal; 37]> =
    Lazy::new(|| std::array::from_fn(|i| BigDecimal::from(BigInt::from(10u32).pow(i as u32))));

/// Compute 10^exp as BigDecimal.
pub fn big_pow10(exp: u32) -> BigDecimal {
    if (exp as usize) < POW10_CACHE.len() {
        POW10_CACHE[exp as usize].clone()
    } else {
        BigDecimal::from(BigInt::from(10u32).pow(exp))
    }
}
