pub mod erc20;
pub mod multicall;
pub mod oracle;
pub mod strategy;
pub mod v2;

pub use erc20::IERC20;
pub use multicall::{Call, IMulticall};
pub use oracle::IPriceOracle;
pub use strategy::IStrategy;
pub use v2::IUniswapV2Pair;
