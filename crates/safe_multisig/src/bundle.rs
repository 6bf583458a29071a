//! Proposal bundles: the persisted description of a timelocked proposal.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

use std::path::Path;

use crate::{
    client::ChainClient,
    error::{Result, SafeError},
    hasher::DomainVersion,
    status::{BatchResolution, StatusResolver},
    transaction_data::{Call, MultisigTransaction},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProposalBundle {
    pub chain_id: u64,
    pub eta: u64,
    pub author: Address,
    pub market_configurator: Address,
    pub created_at_block: u64,
    pub queue_batches: Vec<Vec<Call>>,
    pub batches_estimated_gas: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Bytes>,
}

impl ProposalBundle {
    /// Parses and validates a bundle, rejecting it as a whole on the first problem.
    pub fn from_json(json: &str) -> Result<Self> {
        let bundle: Self =
            serde_json::from_str(json).map_err(|e| SafeError::InvalidBundle(e.to_string()))?;
        bundle.validate()?;

        Ok(bundle)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SafeError::InvalidBundle(format!("cannot read {}: {e}", path.display())))?;
        debug!(path = %path.display(), "Loading proposal bundle");

        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_batches.is_empty() {
            return Err(SafeError::InvalidBundle("queueBatches is empty".to_string()));
        }
        if let Some(index) = self.queue_batches.iter().position(Vec::is_empty) {
            return Err(SafeError::InvalidBundle(format!("queueBatches[{index}] has no calls")));
        }
        if self.batches_estimated_gas.len() != self.queue_batches.len() {
            return Err(SafeError::InvalidBundle(format!(
                "batchesEstimatedGas has {} entries for {} batches",
                self.batches_estimated_gas.len(),
                self.queue_batches.len()
            )));
        }
        if self.market_configurator.is_zero() {
            return Err(SafeError::InvalidBundle(
                "marketConfigurator is the zero address".to_string(),
            ));
        }
        Ok(())
    }

    pub fn batch(&self, index: usize) -> Result<&[Call]> {
        self.queue_batches
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| SafeError::InvalidBundle(format!("no batch at index {index}")))
    }

    /// The wallet transaction that carries batch `index`, hashed under the wallet's `domain`.
    pub fn batch_transaction(
        &self,
        index: usize,
        safe: Address,
        domain: DomainVersion,
        nonce: U256,
        multisend: Address,
    ) -> Result<MultisigTransaction> {
        let calls = self.batch(index)?.to_vec();
        MultisigTransaction::from_calls(calls, safe, self.chain_id, domain, nonce, multisend)
    }

    /// Lifecycle of every batch behind `timelock`.
    pub async fn resolve<C: ChainClient>(
        &self,
        resolver: &StatusResolver<'_, C>,
        timelock: Address,
    ) -> Result<Vec<BatchResolution>> {
        let mut resolutions = Vec::with_capacity(self.queue_batches.len());
        for batch in &self.queue_batches {
            let resolution =
                resolver.resolve_batch(timelock, batch, self.eta, self.created_at_block).await?;
            resolutions.push(resolution);
        }
        Ok(resolutions)
    }
}
