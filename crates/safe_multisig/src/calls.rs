use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use futures::future::try_join_all;
use serde::Serialize;
use tracing::debug;

use crate::{
    client::ChainClient,
    contracts::Safe,
    error::{Result, SafeError},
    hasher::DomainVersion,
    signatures::Approvals,
    transaction_data::{ExecutableSafeTransaction, SafeTransactionData, WalletParams},
};

/// What kind of account administers a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdminKind {
    Eoa,
    Safe,
    Unknown,
}

pub async fn get_nonce<C: ChainClient + ?Sized>(client: &C, safe: Address) -> Result<U256> {
    let call = Safe::nonceCall::new(());

    let Safe::nonceReturn { _0: nonce } = call_and_decode(client, call, safe).await?;

    Ok(nonce)
}

pub async fn get_owners<C: ChainClient + ?Sized>(
    client: &C,
    safe: Address,
) -> Result<Vec<Address>> {
    let call = Safe::getOwnersCall::new(());

    let Safe::getOwnersReturn { _0: owners } = call_and_decode(client, call, safe).await?;

    Ok(owners)
}

pub async fn get_threshold<C: ChainClient + ?Sized>(client: &C, safe: Address) -> Result<u64> {
    let call = Safe::getThresholdCall::new(());

    let Safe::getThresholdReturn { _0: threshold } = call_and_decode(client, call, safe).await?;

    Ok(threshold.saturating_to())
}

pub async fn get_version<C: ChainClient + ?Sized>(client: &C, safe: Address) -> Result<String> {
    let call = Safe::VERSIONCall::new(());

    let Safe::VERSIONReturn { _0: version } = call_and_decode(client, call, safe).await?;

    Ok(version)
}

/// Signing domain of `safe`, derived from its reported version.
pub async fn get_domain_version<C: ChainClient + ?Sized>(
    client: &C,
    safe: Address,
) -> Result<DomainVersion> {
    let version = get_version(client, safe).await?;
    Ok(DomainVersion::from_version(&version))
}

pub async fn is_owner<C: ChainClient + ?Sized>(
    client: &C,
    safe: Address,
    address: Address,
) -> Result<bool> {
    let call = Safe::isOwnerCall::new((address,));

    let Safe::isOwnerReturn { _0: is_owner } = call_and_decode(client, call, safe).await?;

    Ok(is_owner)
}

/// Whether `owner` called `approveHash(hash)` on `safe`.
pub async fn approved_hash<C: ChainClient + ?Sized>(
    client: &C,
    safe: Address,
    owner: Address,
    hash: B256,
) -> Result<bool> {
    let call = Safe::approvedHashesCall::new((owner, hash));

    let Safe::approvedHashesReturn { _0: approved } = call_and_decode(client, call, safe).await?;

    Ok(!approved.is_zero())
}

/// The wallet's own hash of `safe_tx`, used to cross-check local hashing.
pub async fn get_transaction_hash<C: ChainClient + ?Sized>(
    client: &C,
    safe: Address,
    safe_tx: &SafeTransactionData,
) -> Result<B256> {
    let call = Safe::getTransactionHashCall::new((
        safe_tx.to,
        safe_tx.value,
        safe_tx.data.clone(),
        safe_tx.operation.as_u8(),
        safe_tx.safe_tx_gas,
        safe_tx.base_gas,
        safe_tx.gas_price,
        safe_tx.gas_token,
        safe_tx.refund_receiver,
        safe_tx.nonce,
    ));

    let Safe::getTransactionHashReturn { _0: tx_hash } = call_and_decode(client, call, safe).await?;

    Ok(tx_hash)
}

pub async fn get_wallet_params<C: ChainClient + ?Sized>(
    client: &C,
    safe: Address,
) -> Result<WalletParams> {
    let (threshold, signers, nonce) =
        futures::try_join!(
            get_threshold(client, safe),
            get_owners(client, safe),
            get_nonce(client, safe)
        )?;

    debug!(%safe, threshold, owners = signers.len(), %nonce, "Fetched wallet parameters");

    Ok(WalletParams { threshold, signers, nonce })
}

/// On-chain approval state of `hash` for every one of `owners`.
pub async fn get_approvals<C: ChainClient + ?Sized>(
    client: &C,
    safe: Address,
    hash: B256,
    owners: &[Address],
) -> Result<Approvals> {
    let approved =
        try_join_all(owners.iter().map(|owner| approved_hash(client, safe, *owner, hash))).await?;

    Ok(Approvals { hash, owners: owners.iter().copied().zip(approved).collect() })
}

/// Classifies `admin`: no code is an EOA, a contract answering `getThreshold()` is a wallet.
pub async fn detect_admin_kind<C: ChainClient + ?Sized>(
    client: &C,
    admin: Address,
) -> Result<AdminKind> {
    let code = client.code_at(admin).await?;
    if code.is_empty() {
        return Ok(AdminKind::Eoa);
    }

    match get_threshold(client, admin).await {
        Ok(_) => Ok(AdminKind::Safe),
        Err(SafeError::CallReverted(_) | SafeError::Decode(_)) => Ok(AdminKind::Unknown),
        Err(e) => Err(e),
    }
}

/// Only EOA and multisig admins can be driven by this engine.
pub async fn require_supported_admin<C: ChainClient + ?Sized>(
    client: &C,
    admin: Address,
) -> Result<AdminKind> {
    match detect_admin_kind(client, admin).await? {
        AdminKind::Unknown => Err(SafeError::UnsupportedAdmin(admin)),
        kind => Ok(kind),
    }
}

/// `approveHash(hash)` on `safe`, the on-chain alternative to an off-chain signature.
pub fn approve_hash_call(safe: Address, hash: B256) -> ExecutableSafeTransaction {
    let call = Safe::approveHashCall::new((hash,));

    ExecutableSafeTransaction { safe_address: safe, input_data: call.abi_encode().into() }
}

pub fn exec_transaction_call(
    safe: Address,
    safe_tx: &SafeTransactionData,
    signatures: &[u8],
) -> ExecutableSafeTransaction {
    let call = Safe::execTransactionCall::new((
        safe_tx.to,
        safe_tx.value,
        safe_tx.data.clone(),
        safe_tx.operation.as_u8(),
        safe_tx.safe_tx_gas,
        safe_tx.base_gas,
        safe_tx.gas_price,
        safe_tx.gas_token,
        safe_tx.refund_receiver,
        Bytes::copy_from_slice(signatures),
    ));

    ExecutableSafeTransaction { safe_address: safe, input_data: call.abi_encode().into() }
}

async fn call_and_decode<C: ChainClient + ?Sized, S: SolCall>(
    client: &C,
    call: S,
    to: Address,
) -> Result<S::Return> {
    let data = client.call(to, call.abi_encode().into()).await?;
    let data = S::abi_decode_returns(data.as_ref(), true)?;

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{client::MockChainClient, testing::FakeChain, transaction_data::OperationType};
    use alloy_primitives::{address, bytes};
    use alloy_transport::TransportErrorKind;

    const SAFE: Address = address!("1111111111111111111111111111111111111111");
    const OWNER_A: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    const OWNER_B: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");

    fn wallet_chain() -> FakeChain {
        let mut chain = FakeChain::with_timestamps(vec![0]);
        chain.set_code(SAFE, bytes!("6080"));
        chain.respond(
            SAFE,
            &Safe::getThresholdCall::new(()),
            Safe::getThresholdCall::abi_encode_returns(&(U256::from(2),)).into(),
        );
        chain.respond(
            SAFE,
            &Safe::getOwnersCall::new(()),
            Safe::getOwnersCall::abi_encode_returns(&(vec![OWNER_A, OWNER_B],)).into(),
        );
        chain.respond(
            SAFE,
            &Safe::nonceCall::new(()),
            Safe::nonceCall::abi_encode_returns(&(U256::from(7),)).into(),
        );
        chain
    }

    #[tokio::test]
    async fn wallet_params() {
        let chain = wallet_chain();

        let params = get_wallet_params(&chain, SAFE).await.unwrap();

        assert_eq!(params.threshold, 2);
        assert_eq!(params.signers, vec![OWNER_A, OWNER_B]);
        assert_eq!(params.nonce, U256::from(7));
    }

    #[tokio::test]
    async fn approvals_per_owner() {
        let chain = wallet_chain();
        let hash = B256::repeat_byte(5);
        chain.respond(
            SAFE,
            &Safe::approvedHashesCall::new((OWNER_A, hash)),
            Safe::approvedHashesCall::abi_encode_returns(&(U256::from(1),)).into(),
        );
        chain.respond(
            SAFE,
            &Safe::approvedHashesCall::new((OWNER_B, hash)),
            Safe::approvedHashesCall::abi_encode_returns(&(U256::ZERO,)).into(),
        );

        let approvals = get_approvals(&chain, SAFE, hash, &[OWNER_A, OWNER_B]).await.unwrap();

        assert_eq!(approvals.owners, vec![(OWNER_A, true), (OWNER_B, false)]);
        assert_eq!(approvals.count(), 1);
    }

    #[tokio::test]
    async fn domain_follows_version() {
        let chain = wallet_chain();
        chain.respond(
            SAFE,
            &Safe::VERSIONCall::new(()),
            Safe::VERSIONCall::abi_encode_returns(&("1.1.1".to_string(),)).into(),
        );

        assert_eq!(get_domain_version(&chain, SAFE).await.unwrap(), DomainVersion::Legacy);
    }

    #[tokio::test]
    async fn admin_kinds() {
        let mut chain = wallet_chain();
        let token = address!("cccccccccccccccccccccccccccccccccccccccc");
        chain.set_code(token, bytes!("6080"));

        assert_eq!(detect_admin_kind(&chain, OWNER_A).await.unwrap(), AdminKind::Eoa);
        assert_eq!(detect_admin_kind(&chain, SAFE).await.unwrap(), AdminKind::Safe);
        assert_eq!(detect_admin_kind(&chain, token).await.unwrap(), AdminKind::Unknown);

        assert!(matches!(
            require_supported_admin(&chain, token).await,
            Err(SafeError::UnsupportedAdmin(a)) if a == token
        ));
        assert_eq!(require_supported_admin(&chain, SAFE).await.unwrap(), AdminKind::Safe);
    }

    #[tokio::test]
    async fn transient_errors_are_not_mistaken_for_unknown_admins() {
        let mut client = MockChainClient::new();
        client.expect_code_at().returning(|_| Ok(bytes!("6080")));
        client.expect_call().returning(|_, _| {
            Err(SafeError::Rpc {
                method: "eth_call",
                attempts: 3,
                source: TransportErrorKind::backend_gone(),
            })
        });

        let err = detect_admin_kind(&client, SAFE).await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn onchain_hash_is_requested_with_every_field() {
        let tx = SafeTransactionData {
            to: OWNER_B,
            value: U256::from(3),
            data: bytes!("abcd"),
            operation: OperationType::DelegateCall,
            nonce: U256::from(7),
            ..Default::default()
        };
        let expected = B256::repeat_byte(0xee);

        let mut client = MockChainClient::new();
        let calldata: Bytes = Safe::getTransactionHashCall::new((
            tx.to,
            tx.value,
            tx.data.clone(),
            1,
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
            Address::ZERO,
            Address::ZERO,
            U256::from(7),
        ))
        .abi_encode()
        .into();
        client
            .expect_call()
            .withf(move |to, input| *to == SAFE && *input == calldata)
            .returning(move |_, _| {
                Ok(Safe::getTransactionHashCall::abi_encode_returns(&(expected,)).into())
            });

        assert_eq!(get_transaction_hash(&client, SAFE, &tx).await.unwrap(), expected);
    }

    #[test]
    fn exec_calldata_carries_signatures() {
        let tx = SafeTransactionData { to: OWNER_B, nonce: U256::from(1), ..Default::default() };
        let exec = exec_transaction_call(SAFE, &tx, &[1, 2, 3]);

        let decoded = Safe::execTransactionCall::abi_decode(&exec.input_data, true).unwrap();
        assert_eq!(exec.safe_address, SAFE);
        assert_eq!(decoded.to, OWNER_B);
        assert_eq!(decoded.operation, 0);
        assert_eq!(decoded.signatures, bytes!("010203"));
    }

    #[test]
    fn approve_hash_selector() {
        let approve = approve_hash_call(SAFE, B256::repeat_byte(1));
        let data = approve.input_data;
        assert_eq!(approve.safe_address, SAFE);
        assert_eq!(&data[..4], Safe::approveHashCall::SELECTOR.as_slice());
        assert_eq!(&data[4..], B256::repeat_byte(1).as_slice());
    }
}
