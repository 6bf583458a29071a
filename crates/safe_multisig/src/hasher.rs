//! Port of the wallet contract's `getTransactionHash`.
//!
//! `keccak256(0x19 || 0x01 || domainSeparator || keccak256(abi.encode(SAFE_TX_TYPEHASH, ...)))`
//! where the dynamic `data` field is replaced by its own keccak256.

use alloy_primitives::{b256, keccak256, Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::transaction_data::SafeTransactionData;

/// keccak256 of `SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,
/// uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)`.
pub const SAFE_TX_TYPEHASH: B256 =
    b256!("bb8310d486368db6bd6f849402fdd73ad53d316b5a4b2644ad6efe0f941286d8");

/// keccak256("EIP712Domain(uint256 chainId,address verifyingContract)")
pub const DOMAIN_SEPARATOR_TYPEHASH: B256 =
    b256!("47e79534a245952e8b16893a336b85a3d9ea9fa8c573f3d803afb92a79469218");

/// keccak256("EIP712Domain(address verifyingContract)")
pub const LEGACY_DOMAIN_SEPARATOR_TYPEHASH: B256 =
    b256!("035aff83d86937d35b32e04f0ddc6ff469290eef2f1b692d8a815c89404d4749");

/// Which domain separator layout the wallet uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainVersion {
    /// Before v1.3.0 the chain id was not part of the domain.
    Legacy,
    #[default]
    V130,
}

impl DomainVersion {
    /// Picks the layout from the contract's `VERSION()` string, e.g. `1.3.0` or `1.4.1+L2`.
    pub fn from_version(version: &str) -> Self {
        let mut parts = version
            .split(|c: char| !c.is_ascii_digit())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u64>().unwrap_or(0));
        let major = parts.next().unwrap_or(0);
        let minor = parts.next().unwrap_or(0);

        if (major, minor) < (1, 3) {
            Self::Legacy
        } else {
            Self::V130
        }
    }
}

pub fn domain_separator(safe: Address, chain_id: u64, domain: DomainVersion) -> B256 {
    let mut encoded = Vec::with_capacity(3 * 32);
    match domain {
        DomainVersion::Legacy => {
            encoded.extend_from_slice(LEGACY_DOMAIN_SEPARATOR_TYPEHASH.as_slice());
        }
        DomainVersion::V130 => {
            encoded.extend_from_slice(DOMAIN_SEPARATOR_TYPEHASH.as_slice());
            encoded.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
        }
    }
    encoded.extend_from_slice(safe.into_word().as_slice());

    keccak256(encoded)
}

/// `keccak256(abi.encode(SAFE_TX_TYPEHASH, to, value, keccak256(data), operation, ...))`
pub fn safe_tx_struct_hash(tx: &SafeTransactionData) -> B256 {
    let mut encoded = Vec::with_capacity(11 * 32);
    encoded.extend_from_slice(SAFE_TX_TYPEHASH.as_slice());
    encoded.extend_from_slice(tx.to.into_word().as_slice());
    encoded.extend_from_slice(&tx.value.to_be_bytes::<32>());
    encoded.extend_from_slice(keccak256(&tx.data).as_slice());
    encoded.extend_from_slice(&U256::from(tx.operation.as_u8()).to_be_bytes::<32>());
    encoded.extend_from_slice(&tx.safe_tx_gas.to_be_bytes::<32>());
    encoded.extend_from_slice(&tx.base_gas.to_be_bytes::<32>());
    encoded.extend_from_slice(&tx.gas_price.to_be_bytes::<32>());
    encoded.extend_from_slice(tx.gas_token.into_word().as_slice());
    encoded.extend_from_slice(tx.refund_receiver.into_word().as_slice());
    encoded.extend_from_slice(&tx.nonce.to_be_bytes::<32>());

    keccak256(encoded)
}

/// The hash owners sign and the wallet contract verifies signatures against.
pub fn transaction_hash(
    tx: &SafeTransactionData,
    safe: Address,
    chain_id: u64,
    domain: DomainVersion,
) -> B256 {
    let mut encoded = Vec::with_capacity(2 + 2 * 32);
    encoded.extend_from_slice(&[0x19, 0x01]);
    encoded.extend_from_slice(domain_separator(safe, chain_id, domain).as_slice());
    encoded.extend_from_slice(safe_tx_struct_hash(tx).as_slice());

    keccak256(encoded)
}
