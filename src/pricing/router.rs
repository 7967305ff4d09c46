//! Route search from an arbitrary token to a token with an oracle price.
//!
//! Depth-first, first match wins (not cheapest). Candidate edges are tried
//! in the order they appear in the edge set. Every branch receives its own
//! copy of the path walked so far, so an abandoned sibling never leaves its
//! edges behind for the next sibling's cycle guard or depth count.

use bigdecimal::BigDecimal;
use num_traits::One;

use crate::models::{PriceEdge, PricedToken, Token};

/// Longest route, in real edges, the search will accept.
pub const MAX_ROUTE_EDGES: usize = 4;

/// A chain of edges from the target token to a priced token.
#[derive(Debug, Clone)]
pub struct Route {
    /// Edges in order from the target outward; empty when the target is
    /// itself priced.
    pub edges: Vec<PriceEdge>,
    pub terminal: PricedToken,
}

impl Route {
    /// Product of every edge rate along the route.
    pub fn composite_rate(&self) -> BigDecimal {
        self.edges
            .iter()
            .fold(BigDecimal::one(), |acc, edge| acc * &edge.rate)
    }

    /// Terminal price × composite rate, `None` if the terminal has no price.
    pub fn price(&self) -> Option<BigDecimal> {
        let terminal = self.terminal.price.as_ref()?;
        Some(terminal * self.composite_rate())
    }
}

/// Find the first route from `target` to any token in `priced`.
///
/// Edges with a zero rate carry no usable price and are never followed.
pub fn find_route(target: &Token, priced: &[PricedToken], edges: &[PriceEdge]) -> Option<Route> {
    let seed = PriceEdge::identity(target);
    let walked = search(&seed, &[], priced, edges)?;

    let last = walked.last()?;
    let terminal = priced.iter().find(|p| p.token == last.quote)?.clone();

    // walked[0] is the seed
    let edges = walked.into_iter().skip(1).cloned().collect();
    Some(Route { edges, terminal })
}

/// `path` holds the edges taken before `current`, seed included.
fn search<'a>(
    current: &'a PriceEdge,
    path: &[&'a PriceEdge],
    priced: &[PricedToken],
    edges: &'a [PriceEdge],
) -> Option<Vec<&'a PriceEdge>> {
    if path.len() > MAX_ROUTE_EDGES {
        return None;
    }

    let extended = || {
        let mut next = path.to_vec();
        next.push(current);
        next
    };

    if priced.iter().any(|p| p.token == current.quote) {
        return Some(extended());
    }

    let candidates: Vec<&PriceEdge> = edges
        .iter()
        .filter(|e| e.base == current.quote && e.is_usable())
        .filter(|e| !path.iter().any(|taken| taken.same_pair(e)))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    let next_path = extended();
    candidates
        .into_iter()
        .find_map(|candidate| search(candidate, &next_path, priced, edges))
}
