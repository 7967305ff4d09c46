//! Utility functions for the UP metrics SDK.
//!
//! - [`conversion`] - Exact U256 → BigDecimal conversion, powers of ten, flooring

mod conversion;

// ============================================
// Common Constants
// ============================================

/// On-chain amounts follow the 18-decimal convention; values are normalized
/// by 10^18 at final assembly.
pub const ON_CHAIN_DECIMALS: u32 = 18;

/// Fractional digits kept when TVL figures are presented.
pub const PRESENTATION_SCALE: i64 = 8;

// ============================================
// Re-exports
// ============================================

pub use conversion::{big_pow10, floor_to_scale, scale_down, u256_to_big};
