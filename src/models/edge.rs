use bigdecimal::BigDecimal;
use num_traits::{One, Zero};

use super::Token;

/// Directed exchange rate: one unit of `base` is worth `rate` units of `quote`.
///
/// Edges are rebuilt from fresh reads on every valuation run. A rate of zero
/// means "no usable price through this edge", not a true zero valuation.
#[derive(Debug, Clone)]
pub struct PriceEdge {
    pub base: Token,
    pub quote: Token,
    pub rate: BigDecimal,
}

impl PriceEdge {
    pub fn new(base: Token, quote: Token, rate: BigDecimal) -> Self {
        Self { base, quote, rate }
    }

    /// Zero-cost edge from a token to itself; seeds a route search.
    pub fn identity(token: &Token) -> Self {
        Self::new(token.clone(), token.clone(), BigDecimal::one())
    }

    /// The opposite direction of this edge. A zero rate stays zero.
    pub fn reciprocal(&self) -> Self {
        let rate = if self.rate.is_zero() {
            BigDecimal::zero()
        } else {
            BigDecimal::one() / &self.rate
        };
        Self::new(self.quote.clone(), self.base.clone(), rate)
    }

    /// Whether both edges connect the same `(base, quote)` pair in the same direction.
    pub fn same_pair(&self, other: &PriceEdge) -> bool {
        self.base == other.base && self.quote == other.quote
    }

    pub fn is_usable(&self) -> bool {
        !self.rate.is_zero()
    }
}
