use alloy_primitives::Address;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    calls::{exec_transaction_call, get_approvals, get_transaction_hash, get_wallet_params},
    client::ChainClient,
    error::{Result, SafeError},
    signatures::SignatureCollector,
    transaction_data::{ExecutableSafeTransaction, MultisigTransaction},
};

/// `execTransaction` calldata that passed every local precondition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedExecution {
    pub transaction: ExecutableSafeTransaction,
    /// Owners covered by the signature blob, ascending.
    pub signers: Vec<Address>,
    pub threshold: u64,
}

/// Checks `tx` against fresh wallet state and builds its `execTransaction` calldata.
///
/// Fails before anything is submitted when the nonce is not the wallet's current one, when
/// the wallet hashes the transaction differently, or when the signatures do not reach the
/// threshold. `executor` is the owner that will send the transaction.
pub async fn prepare_execution<C: ChainClient + ?Sized>(
    client: &C,
    safe: Address,
    tx: &MultisigTransaction,
    executor: Option<Address>,
    own_signature: Option<(Address, &[u8])>,
) -> Result<PreparedExecution> {
    let params = get_wallet_params(client, safe).await?;
    if tx.nonce() != params.nonce {
        return Err(SafeError::NonceMismatch { transaction: tx.nonce(), wallet: params.nonce });
    }

    let onchain = get_transaction_hash(client, safe, &tx.tx).await?;
    if onchain != tx.hash {
        warn!(%safe, local = %tx.hash, %onchain, "Wallet computes a different transaction hash");
        return Err(SafeError::HashMismatch { local: tx.hash, onchain });
    }

    let approvals = get_approvals(client, safe, tx.hash, &params.signers).await?;
    let collector = SignatureCollector::new(&params, approvals);
    let blob = collector.build_executable_blob(executor, own_signature)?;
    debug!(
        %safe,
        hash = %tx.hash,
        signatures = blob.len(),
        threshold = params.threshold,
        "Prepared execution"
    );

    Ok(PreparedExecution {
        transaction: exec_transaction_call(safe, &tx.tx, &blob.bytes),
        signers: blob.signers,
        threshold: params.threshold,
    })
}
