use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use std::collections::BTreeSet;

use crate::{
    error::{Result, SafeError},
    hasher::{transaction_hash, DomainVersion},
    multisend,
    status::LifecycleStatus,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OperationType {
    #[default]
    Call = 0,
    DelegateCall = 1,
}

impl OperationType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<OperationType> for u8 {
    fn from(operation: OperationType) -> Self {
        operation.as_u8()
    }
}

impl TryFrom<u8> for OperationType {
    type Error = SafeError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Call),
            1 => Ok(Self::DelegateCall),
            other => Err(SafeError::UnsupportedOperation(other)),
        }
    }
}

/// A single contract call. Executed with the `Call` operation only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub to: Address,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
}

impl Call {
    pub fn new(to: Address, value: U256, data: impl Into<Bytes>) -> Self {
        Self { to, value, data: data.into() }
    }
}

/// The ten fields the wallet contract hashes and executes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTransactionData {
    pub to: Address,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
    #[serde(default)]
    pub operation: OperationType,
    #[serde(default)]
    pub safe_tx_gas: U256,
    #[serde(default)]
    pub base_gas: U256,
    #[serde(default)]
    pub gas_price: U256,
    #[serde(default)]
    pub gas_token: Address,
    #[serde(default)]
    pub refund_receiver: Address,
    pub nonce: U256,
}

/// A wallet transaction together with its derived signing hash.
///
/// `hash` is always recomputable from the other fields, see [`MultisigTransaction::verify_hash`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisigTransaction {
    #[serde(flatten)]
    pub tx: SafeTransactionData,
    pub hash: B256,
    #[serde(default)]
    pub signed_by: BTreeSet<Address>,
    #[serde(default)]
    pub calls: Vec<Call>,
}

impl MultisigTransaction {
    /// Wraps `tx`, computing its hash for `safe` on `chain_id`.
    ///
    /// When `tx` targets `multisend` the payload is unpacked into `calls`.
    pub fn new(
        tx: SafeTransactionData,
        safe: Address,
        chain_id: u64,
        domain: DomainVersion,
        multisend: Option<Address>,
    ) -> Result<Self> {
        let calls = match multisend {
            Some(relay) if relay == tx.to => multisend::decode(&tx.data)?,
            _ => vec![Call::new(tx.to, tx.value, tx.data.clone())],
        };
        let hash = transaction_hash(&tx, safe, chain_id, domain);

        Ok(Self { tx, hash, signed_by: BTreeSet::new(), calls })
    }

    /// Assembles a transaction from `calls`, hashed under the wallet's `domain`.
    ///
    /// A single call is executed directly. Several calls are packed and delegate-called
    /// through the `multisend` relay.
    pub fn from_calls(
        calls: Vec<Call>,
        safe: Address,
        chain_id: u64,
        domain: DomainVersion,
        nonce: U256,
        multisend: Address,
    ) -> Result<Self> {
        let tx = match calls.as_slice() {
            [] => return Err(SafeError::EmptyTransaction),
            [call] => SafeTransactionData {
                to: call.to,
                value: call.value,
                data: call.data.clone(),
                operation: OperationType::Call,
                nonce,
                ..Default::default()
            },
            _ => SafeTransactionData {
                to: multisend,
                value: U256::ZERO,
                data: multisend::encode(&calls),
                operation: OperationType::DelegateCall,
                nonce,
                ..Default::default()
            },
        };
        let hash = transaction_hash(&tx, safe, chain_id, domain);

        Ok(Self { tx, hash, signed_by: BTreeSet::new(), calls })
    }

    /// Recomputes the hash and fails if it differs from the stored one.
    pub fn verify_hash(&self, safe: Address, chain_id: u64, domain: DomainVersion) -> Result<()> {
        let local = transaction_hash(&self.tx, safe, chain_id, domain);
        if local != self.hash {
            return Err(SafeError::HashMismatch { local, onchain: self.hash });
        }
        Ok(())
    }

    pub fn nonce(&self) -> U256 {
        self.tx.nonce
    }
}

/// A [`MultisigTransaction`] that is also gated by a timelock.
///
/// `status` is a projection of the event log at the time of the query and is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    #[serde(flatten)]
    pub transaction: MultisigTransaction,
    pub queue_block: Option<u64>,
    pub status: LifecycleStatus,
    pub eta: Option<u64>,
}

/// Wallet configuration read fresh from the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletParams {
    pub threshold: u64,
    pub signers: Vec<Address>,
    pub nonce: U256,
}

impl WalletParams {
    pub fn is_signer(&self, address: &Address) -> bool {
        self.signers.contains(address)
    }
}

/// Calldata ready to be sent to the wallet contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableSafeTransaction {
    pub safe_address: Address,
    pub input_data: Bytes,
}
