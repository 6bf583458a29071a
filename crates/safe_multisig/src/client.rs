//! The single seam between the engine and a JSON-RPC node.
//!
//! Every component takes a `&impl ChainClient` explicitly, so several chains can be served
//! side by side and tests can substitute an in-memory chain.

use alloy_network::{Ethereum, TransactionBuilder};
use alloy_primitives::{Address, Bytes, B256};
use alloy_provider::Provider;
use alloy_rpc_types::{BlockNumberOrTag, BlockTransactionsKind, Filter, Log, TransactionRequest};
use alloy_transport::{Transport, TransportError};
use async_trait::async_trait;
use tracing::{trace, warn};

use std::{future::Future, marker::PhantomData, time::Duration};

use crate::error::{Result, SafeError};

/// A bounded `eth_getLogs` request. Both block bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub address: Address,
    pub event_signature: B256,
    /// First indexed topic, when the event indexes the value we look for.
    pub topic1: Option<B256>,
    pub from_block: u64,
    pub to_block: u64,
}

impl LogQuery {
    pub fn is_empty(&self) -> bool {
        self.from_block > self.to_block
    }

    pub fn matches(&self, log: &Log) -> bool {
        let topics = log.topics();
        let block = log.block_number.unwrap_or_default();

        log.address() == self.address
            && topics.first() == Some(&self.event_signature)
            && self.topic1.map_or(true, |topic| topics.get(1) == Some(&topic))
            && block >= self.from_block
            && block <= self.to_block
    }

    fn to_filter(&self) -> Filter {
        let filter = Filter::new()
            .address(self.address)
            .event_signature(self.event_signature)
            .from_block(self.from_block)
            .to_block(self.to_block);

        match self.topic1 {
            Some(topic) => filter.topic1(topic),
            None => filter,
        }
    }
}

/// Read-only view of a chain.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn chain_id(&self) -> Result<u64>;

    async fn block_number(&self) -> Result<u64>;

    async fn block_timestamp(&self, block: u64) -> Result<u64>;

    /// `eth_call` against the latest block.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes>;

    async fn code_at(&self, address: Address) -> Result<Bytes>;

    async fn logs(&self, query: &LogQuery) -> Result<Vec<Log>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay before the second attempt, grows linearly afterwards.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, backoff: Duration::from_millis(250) }
    }
}

impl RetryPolicy {
    /// Runs `op` until it succeeds, fails with an error response, or attempts run out.
    pub async fn run<T, F, Fut>(&self, method: &'static str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(TransportError::ErrorResp(payload)) => {
                    return Err(SafeError::CallReverted(payload.to_string()));
                }
                Err(source) if attempt >= max_attempts => {
                    return Err(SafeError::Rpc { method, attempts: attempt, source });
                }
                Err(e) => {
                    warn!(method, attempt, error = %e, "RPC request failed, retrying");
                    tokio::time::sleep(self.backoff * attempt).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// [`ChainClient`] over any alloy [`Provider`].
#[derive(Debug, Clone)]
pub struct RpcClient<P, T> {
    provider: P,
    retry: RetryPolicy,
    _transport: PhantomData<T>,
}

impl<P, T> RpcClient<P, T>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    pub fn new(provider: P) -> Self {
        Self::with_retry(provider, RetryPolicy::default())
    }

    pub fn with_retry(provider: P, retry: RetryPolicy) -> Self {
        Self { provider, retry, _transport: PhantomData }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P, T> ChainClient for RpcClient<P, T>
where
    P: Provider<T, Ethereum> + Send + Sync,
    T: Transport + Clone + Send + Sync,
{
    async fn chain_id(&self) -> Result<u64> {
        let provider = &self.provider;
        self.retry.run("eth_chainId", || async move { provider.get_chain_id().await }).await
    }

    async fn block_number(&self) -> Result<u64> {
        let provider = &self.provider;
        self.retry.run("eth_blockNumber", || async move { provider.get_block_number().await }).await
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64> {
        let provider = &self.provider;
        let response = self
            .retry
            .run("eth_getBlockByNumber", || async move {
                let tag = BlockNumberOrTag::Number(block);
                provider.get_block_by_number(tag, BlockTransactionsKind::Hashes).await
            })
            .await?;

        let block_data = response.ok_or(SafeError::MissingBlock(block))?;
        trace!(block, timestamp = block_data.header.timestamp, "Fetched block timestamp");

        Ok(block_data.header.timestamp)
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        let mut req = TransactionRequest::default().to(to);
        req.set_input(input);

        let provider = &self.provider;
        let req = &req;
        self.retry.run("eth_call", || async move { provider.call(req).await }).await
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        let provider = &self.provider;
        self.retry.run("eth_getCode", || async move { provider.get_code_at(address).await }).await
    }

    async fn logs(&self, query: &LogQuery) -> Result<Vec<Log>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let provider = &self.provider;
        let filter = &query.to_filter();
        let logs =
            self.retry.run("eth_getLogs", || async move { provider.get_logs(filter).await }).await?;
        trace!(
            address = %query.address,
            from = query.from_block,
            to = query.to_block,
            count = logs.len(),
            "Scanned logs"
        );

        Ok(logs)
    }
}
