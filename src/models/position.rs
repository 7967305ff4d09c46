use alloy::primitives::Address;

use super::Token;

/// Where the locked amount of a position is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockedSource {
    /// Vault pool: `strategy.wantLockedTotal()`.
    Strategy { strategy: Address },
    /// Staking against a local reward farm. Single-asset staking of the
    /// reference token reads `farm.totalSupply()`, anything else reads
    /// `want.balanceOf(farm)`.
    ///
    /// `pid` is the farm pool id from the network config. Locked amounts are
    /// read per farm address, so it is carried for callers only.
    Farm { farm: Address, pid: u64 },
}

/// A pool or staking position valued as part of TVL.
///
/// When `base_token == quote_token` the position is single-asset and `want`
/// is the token itself; otherwise `want` is an LP pair whose share is valued
/// from its reserves.
#[derive(Debug, Clone)]
pub struct Position {
    pub alias: String,
    pub want: Address,
    pub base_token: Token,
    pub quote_token: Token,
    pub source: LockedSource,
}

impl Position {
    pub fn is_single_asset(&self) -> bool {
        self.base_token == self.quote_token
    }

    pub fn is_lp(&self) -> bool {
        !self.is_single_asset()
    }
}
