use alloy_primitives::{Address, B256, U256};

pub type Result<T, E = SafeError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SafeError {
    #[error("Unsupported operation {0} in multisend payload, only calls are allowed")]
    /// A multisend entry carried a non-zero operation byte
    UnsupportedOperation(u8),
    #[error("Malformed multisend payload: {0}")]
    /// The multisend payload could not be unpacked
    MalformedMultisend(String),
    #[error("Transaction hash mismatch: computed {local}, wallet contract returned {onchain}")]
    /// The locally computed hash disagrees with the wallet contract
    HashMismatch { local: B256, onchain: B256 },
    #[error("Threshold not met: {approvals} of {threshold} required signatures")]
    /// Not enough signatures to execute
    ThresholdNotMet { approvals: usize, threshold: u64 },
    #[error("Nonce mismatch: transaction uses {transaction}, wallet is at {wallet}")]
    /// The transaction nonce is not the wallet's current nonce
    NonceMismatch { transaction: U256, wallet: U256 },
    #[error("{0} is not an owner of the wallet")]
    /// The signer is not a wallet owner
    NotAnOwner(Address),
    #[error("{0} has already approved this transaction")]
    /// The signer already approved the hash
    AlreadyApproved(Address),
    #[error("{0} is neither an externally owned account nor a supported multisig")]
    /// The admin address is of an unknown kind
    UnsupportedAdmin(Address),
    #[error("No MultiSend relay known for chain {0}")]
    /// The chain has no known relay deployment
    UnsupportedChain(u64),
    #[error("A transaction needs at least one call")]
    /// Attempted to assemble a transaction from nothing
    EmptyTransaction,
    #[error("Invalid proposal bundle: {0}")]
    /// The proposal bundle failed validation
    InvalidBundle(String),
    #[error("Invalid signature: {0}")]
    /// A supplied signature could not be used
    InvalidSignature(String),
    #[error("RPC request `{method}` failed after {attempts} attempts: {source}")]
    /// Transient transport failure that survived every retry
    Rpc {
        method: &'static str,
        attempts: u32,
        #[source]
        source: alloy_transport::TransportError,
    },
    #[error("Contract call reverted: {0}")]
    /// The node answered with an error response
    CallReverted(String),
    #[error("Block {0} is not available")]
    /// The node returned no block for the requested number
    MissingBlock(u64),
    #[error("Failed to decode contract data: {0}")]
    /// Returned data could not be ABI-decoded
    Decode(#[from] alloy_sol_types::Error),
}

impl SafeError {
    /// Returns `true` when the failure says nothing about the transaction itself and the same
    /// query may succeed later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Rpc { .. } | Self::MissingBlock(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_failures_are_transient() {
        assert!(SafeError::MissingBlock(7).is_transient());
        assert!(!SafeError::UnsupportedOperation(1).is_transient());
        assert!(!SafeError::HashMismatch { local: B256::ZERO, onchain: B256::repeat_byte(1) }
            .is_transient());
        assert!(!SafeError::ThresholdNotMet { approvals: 1, threshold: 2 }.is_transient());
        assert!(!SafeError::CallReverted("execution reverted".into()).is_transient());
    }
}
