use std::hash::{Hash, Hasher};

use alloy::primitives::Address;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Token identity as listed in the network token list.
///
/// Equality and hashing only look at the address. `Address` is compared
/// bytewise, so two spellings that differ in hex case are the same token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

impl Token {
    pub fn new(address: Address, decimals: u8, symbol: &str, name: &str) -> Self {
        Self {
            address,
            decimals,
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

/// A token with a direct oracle price in the unit of account.
///
/// `price` is `None` when the token is known to the price set but has no
/// usable feed; routes may end here but cannot be valued.
#[derive(Debug, Clone)]
pub struct PricedToken {
    pub token: Token,
    pub price: Option<BigDecimal>,
}

impl PricedToken {
    pub fn new(token: Token, price: Option<BigDecimal>) -> Self {
        Self { token, price }
    }
}
