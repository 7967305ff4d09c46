use alloy::primitives::U256;
use bigdecimal::BigDecimal;
use log::{debug, error};
use num_traits::Zero;

use super::router::find_route;
use crate::error::{MetricsError, MetricsResult};
use crate::models::{PriceEdge, PricedToken, Token};
use crate::utils::{scale_down, u256_to_big};

/// Raw `getLatestPrice()` answer for an oracle-fed token.
#[derive(Debug, Clone)]
pub struct OracleReading {
    pub token: Token,
    pub price: U256,
    pub decimals: u8,
}

/// Balances of both sides held by a price-helper pair contract.
#[derive(Debug, Clone)]
pub struct HelperReading {
    pub base: Token,
    pub quote: Token,
    pub base_balance: U256,
    pub quote_balance: U256,
}

/// Oracle mantissa divided by 10^decimals, where decimals come from the
/// same call rather than the token metadata.
pub fn oracle_price(price: U256, decimals: u8) -> BigDecimal {
    scale_down(price, decimals as u32)
}

/// `quote_balance / base_balance`, or zero when the pair holds no base token.
pub fn helper_rate(base_balance: U256, quote_balance: U256) -> BigDecimal {
    if base_balance.is_zero() {
        return BigDecimal::zero();
    }
    u256_to_big(quote_balance) / u256_to_big(base_balance)
}

/// Priced tokens and exchange-rate edges for one valuation run.
#[derive(Debug, Clone, Default)]
pub struct PriceGraph {
    pub priced: Vec<PricedToken>,
    /// Helper edges in configuration order, followed by their reciprocals.
    pub edges: Vec<PriceEdge>,
}

impl PriceGraph {
    pub fn build(oracles: &[OracleReading], helpers: &[HelperReading]) -> Self {
        let priced = oracles
            .iter()
            .map(|o| PricedToken::new(o.token.clone(), Some(oracle_price(o.price, o.decimals))))
            .collect();

        let forward: Vec<PriceEdge> = helpers
            .iter()
            .map(|h| {
                PriceEdge::new(
                    h.base.clone(),
                    h.quote.clone(),
                    helper_rate(h.base_balance, h.quote_balance),
                )
            })
            .collect();
        let reciprocals: Vec<PriceEdge> = forward.iter().map(PriceEdge::reciprocal).collect();

        let mut edges = forward;
        edges.extend(reciprocals);

        Self { priced, edges }
    }

    /// Price of `token` in the unit of account, routed through the edge set.
    pub fn price_of(&self, token: &Token) -> MetricsResult<BigDecimal> {
        let unavailable = || MetricsError::PriceUnavailable {
            symbol: token.symbol.clone(),
            address: token.address,
        };

        let Some(route) = find_route(token, &self.priced, &self.edges) else {
            error!("Can't calc price of {}: no route to a priced token", token.symbol);
            return Err(unavailable());
        };

        match route.price() {
            Some(price) => {
                debug!(
                    "Priced {} via {} edge(s) ending at {}",
                    token.symbol,
                    route.edges.len(),
                    route.terminal.token.symbol
                );
                Ok(price)
            },
            None => {
                error!(
                    "Can't calc price of {}: route ends at {} which has no price",
                    token.symbol, route.terminal.token.symbol
                );
                Err(unavailable())
            },
        }
    }
}
