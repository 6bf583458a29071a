//! Multisig transaction lifecycle engine.
//!
//! Packs calls for the MultiSend relay, hashes wallet transactions exactly as the wallet
//! contract does, assembles ordered signature blobs, and re-derives the lifecycle of timelocked
//! transactions from the event log.

pub mod block_range;
pub mod bundle;
pub mod cache;
pub mod calls;
pub mod client;
pub mod consts;
pub mod contracts;
pub mod error;
pub mod execution;
pub mod hasher;
pub mod multisend;
pub mod session;
pub mod signatures;
pub mod status;
pub mod transaction_data;

#[cfg(any(test, feature = "mock"))]
pub mod testing;

pub use block_range::BlockRangeResolver;
pub use bundle::ProposalBundle;
pub use cache::{CacheConfig, TtlCache};
pub use calls::AdminKind;
pub use client::{ChainClient, LogQuery, RetryPolicy, RpcClient};
pub use error::{Result, SafeError};
pub use execution::{prepare_execution, PreparedExecution};
pub use hasher::{transaction_hash, DomainVersion};
pub use session::SafeSession;
pub use signatures::{Approvals, SignatureBlob, SignatureCollector};
pub use status::{
    LifecycleStatus, ResolvedStatus, SafeExecution, StatusQuery, StatusResolver, TimelockPolicy,
};
pub use transaction_data::{
    Call, ExecutableSafeTransaction, MultisigTransaction, OperationType, ParsedTransaction,
    SafeTransactionData, WalletParams,
};

#[cfg(any(test, feature = "mock"))]
pub use client::MockChainClient;
