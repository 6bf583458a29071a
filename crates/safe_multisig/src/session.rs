use alloy_primitives::{Address, B256};
use tracing::trace;

use crate::{
    cache::{CacheConfig, TtlCache},
    calls::get_wallet_params,
    client::ChainClient,
    error::Result,
    status::{ResolvedStatus, StatusQuery, StatusResolver, TimelockPolicy},
    transaction_data::WalletParams,
};

/// A client bound to one chain, with short-lived caches in front of the reads that UIs
/// repeat the most.
///
/// The caches only save round trips. Whoever submits a write through this session must call
/// [`SafeSession::note_approval_submitted`] or [`SafeSession::note_execution_submitted`].
pub struct SafeSession<C> {
    client: C,
    chain_id: u64,
    policy: TimelockPolicy,
    params: TtlCache<(u64, Address), WalletParams>,
    statuses: TtlCache<(u64, B256), ResolvedStatus>,
}

impl<C: ChainClient> SafeSession<C> {
    pub async fn connect(client: C, cache: CacheConfig, policy: TimelockPolicy) -> Result<Self> {
        let chain_id = client.chain_id().await?;

        Ok(Self {
            client,
            chain_id,
            policy,
            params: TtlCache::new(cache),
            statuses: TtlCache::new(cache),
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn resolver(&self) -> StatusResolver<'_, C> {
        StatusResolver::new(&self.client, self.policy)
    }

    pub async fn wallet_params(&self, safe: Address) -> Result<WalletParams> {
        let key = (self.chain_id, safe);
        if let Some(params) = self.params.get(&key) {
            trace!(%safe, "Wallet parameters served from cache");
            return Ok(params);
        }

        let params = get_wallet_params(&self.client, safe).await?;
        self.params.insert(key, params.clone());

        Ok(params)
    }

    /// Status of a timelocked transaction. Undetermined results are never cached.
    pub async fn timelock_status(&self, query: &StatusQuery) -> Result<ResolvedStatus> {
        let key = (self.chain_id, query.tx_hash);
        if let Some(status) = self.statuses.get(&key) {
            return Ok(status);
        }

        let status = self.resolver().resolve_or_unknown(query).await?;
        if let ResolvedStatus::Known(_) = status {
            self.statuses.insert(key, status.clone());
        }

        Ok(status)
    }

    pub fn note_approval_submitted(&self, safe: Address, tx_hash: B256) {
        self.invalidate(safe, tx_hash);
    }

    pub fn note_execution_submitted(&self, safe: Address, tx_hash: B256) {
        self.invalidate(safe, tx_hash);
    }

    fn invalidate(&self, safe: Address, tx_hash: B256) {
        self.params.invalidate(&(self.chain_id, safe));
        self.statuses.invalidate(&(self.chain_id, tx_hash));
    }
}
