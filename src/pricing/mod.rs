//! Pure valuation logic; no I/O happens below this module.
//!
//! - [`graph`] - oracle readings and helper-pair balances → priced tokens and edges
//! - [`router`] - depth-bounded route search from any token to a priced one
//! - [`valuator`] - single-asset and LP position values
//! - [`aggregator`] - TVL, circulating supply, market cap
//! - [`pair_quote`] - direct oracle × pair-reserve quote for one token

pub mod aggregator;
pub mod graph;
pub mod pair_quote;
pub mod router;
pub mod valuator;

pub use aggregator::{circulating_supply, market_cap, total_value_locked, TvlEntry, TvlReport};
pub use graph::{HelperReading, OracleReading, PriceGraph};
pub use pair_quote::{pair_quote, PairQuote};
pub use router::{find_route, Route, MAX_ROUTE_EDGES};
pub use valuator::{value_position, value_positions, LpState, PositionValue};
