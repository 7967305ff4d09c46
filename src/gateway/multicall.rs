use alloy::primitives::Address;
use alloy::providers::{DynProvider, ProviderBuilder};
use async_trait::async_trait;
use log::debug;
use url::Url;

use super::{dispatch_batches, GatewayError, LabeledCall, ReadGateway, ReadResults};
use crate::abis::{Call, IMulticall};
use crate::config::ConfigError;

/// [`ReadGateway`] backed by a Multicall `aggregate` contract over HTTP JSON-RPC.
///
/// No timeout or retry wraps the remote call: a failing sub-batch fails the
/// request and a hung node hangs it.
#[derive(Clone)]
pub struct MulticallGateway {
    provider: DynProvider,
    multicall_address: Address,
}

impl MulticallGateway {
    pub fn new(rpc_url: &str, multicall_address: Address) -> Result<Self, ConfigError> {
        let url = Url::parse(rpc_url).map_err(|source| ConfigError::InvalidRpcUrl {
            url: rpc_url.to_string(),
            source,
        })?;

        let client = ProviderBuilder::new().connect_http(url);

        let provider = DynProvider::new(client);

        Ok(Self {
            provider,
            multicall_address,
        })
    }

    async fn aggregate_chunk(&self, chunk: &[LabeledCall]) -> Result<ReadResults, GatewayError> {
        let multicall = IMulticall::new(self.multicall_address, &self.provider);

        let calls: Vec<Call> = chunk
            .iter()
            .map(|c| Call {
                target: c.call.target(),
                callData: c.call.calldata(),
            })
            .collect();

        let response = multicall
            .aggregate(calls)
            .call()
            .await
            .map_err(|source| GatewayError::Batch {
                calls: chunk.len(),
                source,
            })?;

        if response.returnData.len() != chunk.len() {
            return Err(GatewayError::LengthMismatch {
                expected: chunk.len(),
                got: response.returnData.len(),
            });
        }

        let mut results = ReadResults::default();
        for (labeled, data) in chunk.iter().zip(response.returnData.iter()) {
            let value = labeled.call.decode(data).map_err(|e| GatewayError::Decode {
                label: labeled.label.clone(),
                reason: e.to_string(),
            })?;
            results.insert(labeled.label.clone(), value);
        }

        Ok(results)
    }
}

#[async_trait]
impl ReadGateway for MulticallGateway {
    async fn read(
        &self,
        calls: Vec<LabeledCall>,
        batch_size: usize,
    ) -> Result<ReadResults, GatewayError> {
        debug!(
            "Multicall: {} calls in sub-batches of at most {}",
            calls.len(),
            batch_size
        );

        dispatch_batches(&calls, batch_size, |chunk| self.aggregate_chunk(chunk)).await
    }
}
