//! In-memory chain for tests.

use alloy_primitives::{Address, Bytes, Log as PrimitiveLog};
use alloy_rpc_types::Log;
use alloy_sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use parking_lot::Mutex;

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    client::{ChainClient, LogQuery},
    error::{Result, SafeError},
};

/// Block `i` has timestamp `timestamps[i]`; the last entry is the latest block.
#[derive(Debug, Default)]
pub struct FakeChain {
    pub chain_id: u64,
    timestamps: Vec<u64>,
    logs: Vec<Log>,
    code: HashMap<Address, Bytes>,
    /// `(contract, calldata)` → return data. Missing entries revert.
    responses: Mutex<HashMap<(Address, Bytes), Bytes>>,
    timestamp_lookups: AtomicUsize,
    log_queries: Mutex<Vec<LogQuery>>,
    failing: bool,
}

impl FakeChain {
    pub fn with_timestamps(timestamps: Vec<u64>) -> Self {
        Self { chain_id: 1, timestamps, ..Default::default() }
    }

    /// Every request fails as if the node were unreachable.
    pub fn unreachable() -> Self {
        Self { failing: true, ..Self::with_timestamps(vec![0]) }
    }

    pub fn push_event<E: SolEvent>(&mut self, address: Address, block: u64, event: &E) {
        let log = Log {
            inner: PrimitiveLog { address, data: event.encode_log_data() },
            block_number: Some(block),
            ..Default::default()
        };
        self.logs.push(log);
    }

    pub fn set_code(&mut self, address: Address, code: Bytes) {
        self.code.insert(address, code);
    }

    pub fn respond<C: SolCall>(&self, to: Address, call: &C, ret: Bytes) {
        self.responses.lock().insert((to, call.abi_encode().into()), ret);
    }

    pub fn latest(&self) -> u64 {
        self.timestamps.len().saturating_sub(1) as u64
    }

    pub fn timestamp_lookups(&self) -> usize {
        self.timestamp_lookups.load(Ordering::SeqCst)
    }

    pub fn log_queries(&self) -> Vec<LogQuery> {
        self.log_queries.lock().clone()
    }

    fn check_reachable(&self, method: &'static str) -> Result<()> {
        if self.failing {
            return Err(SafeError::Rpc {
                method,
                attempts: 3,
                source: alloy_transport::TransportErrorKind::backend_gone(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn chain_id(&self) -> Result<u64> {
        self.check_reachable("eth_chainId")?;
        Ok(self.chain_id)
    }

    async fn block_number(&self) -> Result<u64> {
        self.check_reachable("eth_blockNumber")?;
        Ok(self.latest())
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64> {
        self.check_reachable("eth_getBlockByNumber")?;
        self.timestamp_lookups.fetch_add(1, Ordering::SeqCst);
        self.timestamps.get(block as usize).copied().ok_or(SafeError::MissingBlock(block))
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        self.check_reachable("eth_call")?;
        self.responses
            .lock()
            .get(&(to, input))
            .cloned()
            .ok_or_else(|| SafeError::CallReverted("execution reverted".to_string()))
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        self.check_reachable("eth_getCode")?;
        Ok(self.code.get(&address).cloned().unwrap_or_default())
    }

    async fn logs(&self, query: &LogQuery) -> Result<Vec<Log>> {
        self.check_reachable("eth_getLogs")?;
        self.log_queries.lock().push(query.clone());
        Ok(self.logs.iter().filter(|log| query.matches(log)).cloned().collect())
    }
}
