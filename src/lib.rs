pub mod abis;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod pricing;
pub mod sdk;
pub mod utils;

pub use cache::MetricCache;
pub use config::{ConfigError, ProtocolContext, Settings};
pub use error::{MetricsError, MetricsResult};
pub use gateway::{GatewayError, MulticallGateway, ReadGateway};
pub use models::{Position, PriceEdge, PricedToken, Token};
pub use pricing::{PairQuote, TvlReport};
pub use sdk::UpSdk;
