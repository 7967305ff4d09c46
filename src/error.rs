use alloy::primitives::Address;
use thiserror::Error;

use crate::gateway::GatewayError;

/// Failure of a public metric computation.
///
/// Nothing is recovered inside the SDK; every variant reaches the caller and
/// a failed run leaves no cached value behind.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// No route within the depth bound from this token to a priced token,
    /// or the route ended on a token without a usable feed.
    #[error("price unavailable for {symbol} ({address})")]
    PriceUnavailable { symbol: String, address: Address },

    /// A batched read group failed as a whole.
    #[error("remote read failed: {0}")]
    RemoteRead(#[from] GatewayError),

    /// Reads are internally inconsistent (supply underflow, empty LP with a
    /// locked balance, missing LP state).
    #[error("data consistency fault: {0}")]
    DataConsistency(String),
}

pub type MetricsResult<T> = Result<T, MetricsError>;
