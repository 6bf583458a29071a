use alloy_primitives::Address;

use std::time::Duration;

use crate::error::{Result, SafeError};

use networks::{arbitrum, base, mainnet, optimism, sepolia};

pub use crate::status::DEFAULT_GRACE_PERIOD;

/// Default time-to-live of cached wallet parameters and statuses.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15);

pub mod networks {
    use alloy_primitives::{address, Address};

    /// `MultiSendCallOnly` v1.3.0, deployed at the same address on every supported chain.
    pub const MULTISEND_CALL_ONLY: Address = address!("40A2aCCbd92BCA938b02010E17A5b8929b49130D");

    pub mod mainnet {
        pub const CHAIN_ID: u64 = 1;
    }

    pub mod sepolia {
        pub const CHAIN_ID: u64 = 11155111;
    }

    pub mod optimism {
        pub const CHAIN_ID: u64 = 10;
    }

    pub mod arbitrum {
        pub const CHAIN_ID: u64 = 42161;
    }

    pub mod base {
        pub const CHAIN_ID: u64 = 8453;
    }
}

/// The call-only MultiSend relay on `chain_id`.
pub fn get_multisend_address(chain_id: u64) -> Result<Address> {
    match chain_id {
        mainnet::CHAIN_ID
        | sepolia::CHAIN_ID
        | optimism::CHAIN_ID
        | arbitrum::CHAIN_ID
        | base::CHAIN_ID => Ok(networks::MULTISEND_CALL_ONLY),
        _ => Err(SafeError::UnsupportedChain(chain_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_chains() {
        assert_eq!(get_multisend_address(1).unwrap(), networks::MULTISEND_CALL_ONLY);
        assert_eq!(get_multisend_address(8453).unwrap(), networks::MULTISEND_CALL_ONLY);
        assert!(matches!(get_multisend_address(31337), Err(SafeError::UnsupportedChain(31337))));
    }
}
