//! Lifecycle of timelocked transactions, re-derived from the event log on every query.
//!
//! Nothing here is cached or advanced incrementally: the resolver scans the timelock's
//! `QueueTransaction`, `ExecuteTransaction` and `CancelTransaction` events and projects them,
//! together with the latest block timestamp, onto a [`LifecycleStatus`].

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_rpc_types::Log;
use alloy_sol_types::{SolEvent, SolValue};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use std::{fmt, time::Duration};

use crate::{
    block_range::BlockRangeResolver,
    client::{ChainClient, LogQuery},
    contracts::{ITimelock, Safe},
    error::{Result, SafeError},
    transaction_data::{Call, MultisigTransaction, ParsedTransaction},
};

pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(14 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleStatus {
    NotFound,
    Queued,
    Ready,
    Executed,
    Canceled,
    Stale,
}

impl LifecycleStatus {
    /// Position along the happy path, used to find the least advanced call of a batch.
    fn progress(self) -> u8 {
        match self {
            Self::NotFound => 0,
            Self::Queued => 1,
            Self::Ready => 2,
            Self::Executed | Self::Canceled | Self::Stale => 3,
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not found",
            Self::Queued => "queued",
            Self::Ready => "ready",
            Self::Executed => "executed",
            Self::Canceled => "canceled",
            Self::Stale => "stale",
        };
        f.write_str(s)
    }
}

/// A status that could be confirmed, or the reason it could not be determined right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResolvedStatus {
    Known(LifecycleStatus),
    Unknown(String),
}

impl ResolvedStatus {
    /// Transient failures become [`ResolvedStatus::Unknown`], everything else is propagated.
    pub fn from_result(result: Result<LifecycleStatus>) -> Result<Self> {
        match result {
            Ok(status) => Ok(Self::Known(status)),
            Err(e) if e.is_transient() => Ok(Self::Unknown(e.to_string())),
            Err(e) => Err(e),
        }
    }
}

impl fmt::Display for ResolvedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(status) => status.fmt(f),
            Self::Unknown(reason) => write!(f, "unknown ({reason})"),
        }
    }
}

/// Timelock policy of one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelockPolicy {
    /// How long after its ETA a queued transaction stays executable.
    pub grace_period: Duration,
}

impl Default for TimelockPolicy {
    fn default() -> Self {
        Self { grace_period: DEFAULT_GRACE_PERIOD }
    }
}

impl TimelockPolicy {
    fn grace_secs(&self) -> u64 {
        self.grace_period.as_secs()
    }
}

/// Lifecycle events found for one timelock transaction hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelockEvents {
    /// Block of the earliest `QueueTransaction`.
    pub queued: Option<u64>,
    pub executed: Option<u64>,
    pub canceled: Option<u64>,
}

impl TimelockEvents {
    pub fn is_empty(&self) -> bool {
        self.queued.is_none() && self.executed.is_none() && self.canceled.is_none()
    }
}

/// Projects `events` onto a status at time `now`.
///
/// Execution and cancellation are final. Past `eta + grace` anything else is stale, as is an
/// ETA further than the grace period in the future.
pub fn derive_status(
    events: &TimelockEvents,
    eta: u64,
    now: u64,
    policy: &TimelockPolicy,
) -> LifecycleStatus {
    let grace = policy.grace_secs();

    if events.executed.is_some() {
        return LifecycleStatus::Executed;
    }
    if events.canceled.is_some() {
        return LifecycleStatus::Canceled;
    }
    if now > eta.saturating_add(grace) || eta > now.saturating_add(grace) {
        return LifecycleStatus::Stale;
    }
    match events.queued {
        Some(_) if eta <= now => LifecycleStatus::Ready,
        Some(_) => LifecycleStatus::Queued,
        None => LifecycleStatus::NotFound,
    }
}

/// `keccak256(abi.encode(target, value, signature, data, eta))`, the timelock's queue key.
pub fn timelock_tx_hash(
    target: Address,
    value: U256,
    signature: &str,
    data: &Bytes,
    eta: u64,
) -> B256 {
    let encoded =
        (target, value, signature.to_string(), data.clone(), U256::from(eta)).abi_encode_params();
    keccak256(encoded)
}

/// Timelock hash of a bundle call, queued with an empty signature and full calldata.
pub fn call_tx_hash(call: &Call, eta: u64) -> B256 {
    timelock_tx_hash(call.to, call.value, "", &call.data, eta)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusQuery {
    pub timelock: Address,
    pub tx_hash: B256,
    pub eta: u64,
    /// Lower bound of every log scan.
    pub created_at_block: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelockResolution {
    pub tx_hash: B256,
    pub status: LifecycleStatus,
    pub queue_block: Option<u64>,
    pub eta: u64,
    /// Timestamp of the latest block at the time of the query.
    pub now: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResolution {
    pub status: LifecycleStatus,
    pub calls: Vec<TimelockResolution>,
}

impl BatchResolution {
    /// Block of the earliest queue event among the calls.
    pub fn queue_block(&self) -> Option<u64> {
        self.calls.iter().filter_map(|call| call.queue_block).min()
    }

    /// Attaches the batch lifecycle to the wallet transaction that carries the batch.
    pub fn into_parsed(self, transaction: MultisigTransaction) -> ParsedTransaction {
        ParsedTransaction {
            queue_block: self.queue_block(),
            status: self.status,
            eta: self.calls.first().map(|call| call.eta),
            transaction,
        }
    }
}

/// Outcome of a wallet-level (not timelocked) transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SafeExecution {
    Pending,
    Executed { block: u64 },
    Failed { block: u64 },
}

pub struct StatusResolver<'a, C> {
    client: &'a C,
    policy: TimelockPolicy,
}

impl<'a, C: ChainClient> StatusResolver<'a, C> {
    pub fn new(client: &'a C, policy: TimelockPolicy) -> Self {
        Self { client, policy }
    }

    pub async fn resolve(&self, query: &StatusQuery) -> Result<TimelockResolution> {
        let latest = self.client.block_number().await?;
        let now = self.client.block_timestamp(latest).await?;
        let grace = self.policy.grace_secs();

        let resolution = |status, queue_block| TimelockResolution {
            tx_hash: query.tx_hash,
            status,
            queue_block,
            eta: query.eta,
            now,
        };

        if query.eta > now.saturating_add(grace) {
            debug!(tx_hash = %query.tx_hash, eta = query.eta, now, "ETA beyond grace window");
            return Ok(resolution(LifecycleStatus::Stale, None));
        }

        let blocks = BlockRangeResolver::new(self.client);
        let eta_block = blocks.timestamp_to_block_before(query.eta, latest).await?;
        let stale_block =
            blocks.timestamp_to_block_before(query.eta.saturating_add(grace), latest).await?;

        let scan = |event_signature, to_block| LogQuery {
            address: query.timelock,
            event_signature,
            topic1: Some(query.tx_hash),
            from_block: query.created_at_block,
            to_block,
        };
        let queued_query = scan(ITimelock::QueueTransaction::SIGNATURE_HASH, eta_block);
        let executed_query = scan(ITimelock::ExecuteTransaction::SIGNATURE_HASH, stale_block);
        let canceled_query = scan(ITimelock::CancelTransaction::SIGNATURE_HASH, stale_block);
        let (queued, executed, canceled) = futures::try_join!(
            self.client.logs(&queued_query),
            self.client.logs(&executed_query),
            self.client.logs(&canceled_query),
        )?;

        let events = TimelockEvents {
            queued: earliest_block(&queued),
            executed: earliest_block(&executed),
            canceled: earliest_block(&canceled),
        };
        let status = derive_status(&events, query.eta, now, &self.policy);
        trace!(tx_hash = %query.tx_hash, ?events, %status, "Resolved timelock transaction");

        Ok(resolution(status, events.queued))
    }

    pub async fn resolve_or_unknown(&self, query: &StatusQuery) -> Result<ResolvedStatus> {
        ResolvedStatus::from_result(self.resolve(query).await.map(|r| r.status))
    }

    /// Resolves every call of a queue batch and folds them into one status.
    pub async fn resolve_batch(
        &self,
        timelock: Address,
        calls: &[Call],
        eta: u64,
        created_at_block: u64,
    ) -> Result<BatchResolution> {
        let queries = calls
            .iter()
            .map(|call| StatusQuery {
                timelock,
                tx_hash: call_tx_hash(call, eta),
                eta,
                created_at_block,
            })
            .collect::<Vec<_>>();

        let calls = try_join_all(queries.iter().map(|query| self.resolve(query))).await?;
        let status = fold_batch(calls.iter().map(|r| r.status));

        Ok(BatchResolution { status, calls })
    }

    /// Looks for the wallet's own `ExecutionSuccess`/`ExecutionFailure` for `safe_tx_hash`.
    pub async fn resolve_safe_execution(
        &self,
        safe: Address,
        safe_tx_hash: B256,
        from_block: u64,
    ) -> Result<SafeExecution> {
        let latest = self.client.block_number().await?;
        let scan = |event_signature| LogQuery {
            address: safe,
            event_signature,
            topic1: None,
            from_block,
            to_block: latest,
        };

        let success_query = scan(Safe::ExecutionSuccess::SIGNATURE_HASH);
        let failure_query = scan(Safe::ExecutionFailure::SIGNATURE_HASH);
        let (successes, failures) = futures::try_join!(
            self.client.logs(&success_query),
            self.client.logs(&failure_query),
        )?;

        for log in &successes {
            let event = Safe::ExecutionSuccess::decode_log_data(log.data(), true)?;
            if event.txHash == safe_tx_hash {
                return Ok(SafeExecution::Executed { block: log_block(log)? });
            }
        }
        for log in &failures {
            let event = Safe::ExecutionFailure::decode_log_data(log.data(), true)?;
            if event.txHash == safe_tx_hash {
                return Ok(SafeExecution::Failed { block: log_block(log)? });
            }
        }

        Ok(SafeExecution::Pending)
    }
}

/// Any cancellation cancels the batch, it is executed once every call is, otherwise it is as
/// far along as its least advanced call.
pub fn fold_batch(statuses: impl IntoIterator<Item = LifecycleStatus>) -> LifecycleStatus {
    let statuses = statuses.into_iter().collect::<Vec<_>>();

    if statuses.is_empty() {
        return LifecycleStatus::NotFound;
    }
    if statuses.contains(&LifecycleStatus::Canceled) {
        return LifecycleStatus::Canceled;
    }
    if statuses.iter().all(|s| *s == LifecycleStatus::Executed) {
        return LifecycleStatus::Executed;
    }
    if statuses.contains(&LifecycleStatus::Stale) {
        return LifecycleStatus::Stale;
    }

    statuses
        .into_iter()
        .filter(|s| *s != LifecycleStatus::Executed)
        .min_by_key(|s| s.progress())
        .unwrap_or(LifecycleStatus::NotFound)
}

fn earliest_block(logs: &[Log]) -> Option<u64> {
    logs.iter().filter_map(|log| log.block_number).min()
}

fn log_block(log: &Log) -> Result<u64> {
    log.block_number.ok_or_else(|| SafeError::CallReverted("log without block number".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{hasher::DomainVersion, testing::FakeChain};
    use alloy_primitives::{address, bytes};

    const DAY: u64 = 24 * 60 * 60;
    const GRACE: u64 = 14 * DAY;
    const TIMELOCK: Address = address!("00000000000000000000000000000000000071e1");
    const TARGET: Address = address!("000000000000000000000000000000000000aaaa");
    const T: u64 = 1_700_000_000;

    fn policy() -> TimelockPolicy {
        TimelockPolicy::default()
    }

    fn queued() -> TimelockEvents {
        TimelockEvents { queued: Some(10), ..Default::default() }
    }

    fn queue_event(hash: B256) -> ITimelock::QueueTransaction {
        ITimelock::QueueTransaction {
            txHash: hash,
            target: TARGET,
            value: U256::ZERO,
            signature: String::new(),
            data: bytes!("1234"),
            eta: U256::from(T),
        }
    }

    fn execute_event(hash: B256) -> ITimelock::ExecuteTransaction {
        let q = queue_event(hash);
        ITimelock::ExecuteTransaction {
            txHash: q.txHash,
            target: q.target,
            value: q.value,
            signature: q.signature,
            data: q.data,
            eta: q.eta,
        }
    }

    fn cancel_event(hash: B256) -> ITimelock::CancelTransaction {
        let q = queue_event(hash);
        ITimelock::CancelTransaction {
            txHash: q.txHash,
            target: q.target,
            value: q.value,
            signature: q.signature,
            data: q.data,
            eta: q.eta,
        }
    }

    /// One block per hour, block 0 two days before `T`, ending at `now`.
    fn hourly_chain(now: u64) -> FakeChain {
        let start = T - 2 * DAY;
        FakeChain::with_timestamps((start..=now).step_by(3600).collect())
    }

    fn query(hash: B256) -> StatusQuery {
        StatusQuery { timelock: TIMELOCK, tx_hash: hash, eta: T, created_at_block: 0 }
    }

    #[test]
    fn projection_precedence() {
        let p = policy();
        let executed = TimelockEvents { queued: Some(1), executed: Some(5), canceled: None };
        let canceled = TimelockEvents { queued: Some(1), executed: None, canceled: Some(5) };
        let none = TimelockEvents::default();

        assert_eq!(derive_status(&executed, T, T + 30 * DAY, &p), LifecycleStatus::Executed);
        assert_eq!(derive_status(&canceled, T, T + DAY, &p), LifecycleStatus::Canceled);
        assert_eq!(derive_status(&queued(), T, T - 1, &p), LifecycleStatus::Queued);
        assert_eq!(derive_status(&queued(), T, T, &p), LifecycleStatus::Ready);
        assert_eq!(derive_status(&none, T, T - DAY, &p), LifecycleStatus::NotFound);
    }

    #[test]
    fn staleness_boundary() {
        let p = policy();
        let none = TimelockEvents::default();

        assert_eq!(derive_status(&none, T, T + GRACE + 1, &p), LifecycleStatus::Stale);
        assert_eq!(derive_status(&queued(), T, T + GRACE + 1, &p), LifecycleStatus::Stale);
        assert_eq!(derive_status(&queued(), T, T + GRACE - 1, &p), LifecycleStatus::Ready);
        assert_eq!(derive_status(&queued(), T, T + GRACE, &p), LifecycleStatus::Ready);
        assert_eq!(derive_status(&none, T, T + GRACE - 1, &p), LifecycleStatus::NotFound);
    }

    #[test]
    fn eta_too_far_ahead_is_stale() {
        let p = policy();
        assert_eq!(derive_status(&queued(), T, T - GRACE - 1, &p), LifecycleStatus::Stale);
        assert_eq!(derive_status(&queued(), T, T - GRACE, &p), LifecycleStatus::Queued);
    }

    #[test]
    fn grace_period_is_configurable() {
        let short = TimelockPolicy { grace_period: Duration::from_secs(DAY) };
        assert_eq!(derive_status(&queued(), T, T + DAY + 1, &short), LifecycleStatus::Stale);
        assert_eq!(derive_status(&queued(), T, T + DAY + 1, &policy()), LifecycleStatus::Ready);
    }

    #[tokio::test]
    async fn unknown_hash_is_not_found() {
        let chain = hourly_chain(T - DAY);
        let resolver = StatusResolver::new(&chain, policy());

        let resolution = resolver.resolve(&query(B256::repeat_byte(1))).await.unwrap();
        assert_eq!(resolution.status, LifecycleStatus::NotFound);
        assert_eq!(resolution.queue_block, None);
    }

    #[tokio::test]
    async fn queued_then_ready() {
        let hash = B256::repeat_byte(1);

        let mut chain = hourly_chain(T - DAY);
        chain.push_event(TIMELOCK, 3, &queue_event(hash));
        let resolution = StatusResolver::new(&chain, policy()).resolve(&query(hash)).await.unwrap();
        assert_eq!(resolution.status, LifecycleStatus::Queued);
        assert_eq!(resolution.queue_block, Some(3));

        let mut chain = hourly_chain(T + DAY);
        chain.push_event(TIMELOCK, 3, &queue_event(hash));
        let resolution = StatusResolver::new(&chain, policy()).resolve(&query(hash)).await.unwrap();
        assert_eq!(resolution.status, LifecycleStatus::Ready);
    }

    #[tokio::test]
    async fn other_hashes_and_contracts_are_ignored() {
        let hash = B256::repeat_byte(1);
        let mut chain = hourly_chain(T + DAY);
        chain.push_event(TIMELOCK, 3, &queue_event(B256::repeat_byte(2)));
        chain.push_event(TARGET, 3, &queue_event(hash));

        let resolution = StatusResolver::new(&chain, policy()).resolve(&query(hash)).await.unwrap();
        assert_eq!(resolution.status, LifecycleStatus::NotFound);
    }

    #[tokio::test]
    async fn execution_is_terminal_as_the_chain_grows() {
        let hash = B256::repeat_byte(1);
        let execution_block = 2 * 24 + 5;

        for now in [T + DAY, T + 10 * DAY, T + 20 * DAY, T + 60 * DAY] {
            let mut chain = hourly_chain(now);
            chain.push_event(TIMELOCK, 3, &queue_event(hash));
            chain.push_event(TIMELOCK, execution_block, &execute_event(hash));

            let resolution =
                StatusResolver::new(&chain, policy()).resolve(&query(hash)).await.unwrap();
            assert_eq!(resolution.status, LifecycleStatus::Executed, "now = {now}");
        }
    }

    #[tokio::test]
    async fn cancellation_is_terminal_as_the_chain_grows() {
        let hash = B256::repeat_byte(1);

        for now in [T - DAY, T + DAY, T + 30 * DAY] {
            let mut chain = hourly_chain(now);
            chain.push_event(TIMELOCK, 3, &queue_event(hash));
            chain.push_event(TIMELOCK, 4, &cancel_event(hash));

            let resolution =
                StatusResolver::new(&chain, policy()).resolve(&query(hash)).await.unwrap();
            assert_eq!(resolution.status, LifecycleStatus::Canceled, "now = {now}");
        }
    }

    #[tokio::test]
    async fn far_future_eta_short_circuits_without_scanning() {
        let chain = hourly_chain(T - DAY);
        let resolver = StatusResolver::new(&chain, policy());

        let far = StatusQuery { eta: T + 365 * DAY, ..query(B256::repeat_byte(1)) };
        let resolution = resolver.resolve(&far).await.unwrap();

        assert_eq!(resolution.status, LifecycleStatus::Stale);
        assert!(chain.log_queries().is_empty());
    }

    #[tokio::test]
    async fn scan_ranges_follow_eta_and_grace() {
        let hash = B256::repeat_byte(1);
        let chain = hourly_chain(T + 20 * DAY);
        let resolver = StatusResolver::new(&chain, policy());

        resolver.resolve(&StatusQuery { created_at_block: 7, ..query(hash) }).await.unwrap();

        let eta_block = 2 * 24;
        let stale_block = eta_block + 14 * 24;
        let queries = chain.log_queries();
        assert_eq!(queries.len(), 3);
        for q in &queries {
            assert_eq!(q.from_block, 7);
            assert_eq!(q.topic1, Some(hash));
            let expected_to = if q.event_signature == ITimelock::QueueTransaction::SIGNATURE_HASH {
                eta_block
            } else {
                stale_block
            };
            assert_eq!(q.to_block, expected_to);
        }
    }

    #[tokio::test]
    async fn unreachable_node_is_unknown_not_guessed() {
        let chain = FakeChain::unreachable();
        let resolver = StatusResolver::new(&chain, policy());

        let status = resolver.resolve_or_unknown(&query(B256::repeat_byte(1))).await.unwrap();
        assert!(matches!(status, ResolvedStatus::Unknown(_)));
    }

    #[tokio::test]
    async fn batch_status_folds_call_statuses() {
        let calls = vec![
            Call::new(TARGET, U256::ZERO, bytes!("1234")),
            Call::new(TARGET, U256::ZERO, bytes!("5678")),
        ];
        let hashes: Vec<B256> = calls.iter().map(|c| call_tx_hash(c, T)).collect();

        let mut chain = hourly_chain(T + DAY);
        chain.push_event(TIMELOCK, 3, &queue_event(hashes[0]));
        chain.push_event(TIMELOCK, 3, &queue_event(hashes[1]));
        chain.push_event(TIMELOCK, 2 * 24 + 2, &execute_event(hashes[0]));

        let batch = StatusResolver::new(&chain, policy())
            .resolve_batch(TIMELOCK, &calls, T, 0)
            .await
            .unwrap();

        assert_eq!(batch.calls[0].status, LifecycleStatus::Executed);
        assert_eq!(batch.calls[1].status, LifecycleStatus::Ready);
        assert_eq!(batch.status, LifecycleStatus::Ready);
        assert_eq!(batch.queue_block(), Some(3));

        let safe = address!("1111111111111111111111111111111111111111");
        let relay = address!("40A2aCCbd92BCA938b02010E17A5b8929b49130D");
        let tx =
            MultisigTransaction::from_calls(calls, safe, 1, DomainVersion::V130, U256::ZERO, relay)
                .unwrap();

        let parsed = batch.into_parsed(tx.clone());
        assert_eq!(parsed.transaction, tx);
        assert_eq!(parsed.status, LifecycleStatus::Ready);
        assert_eq!(parsed.queue_block, Some(3));
        assert_eq!(parsed.eta, Some(T));
    }

    #[test]
    fn batch_folding() {
        use LifecycleStatus::*;

        assert_eq!(fold_batch([Executed, Executed]), Executed);
        assert_eq!(fold_batch([Executed, Canceled]), Canceled);
        assert_eq!(fold_batch([Queued, Ready]), Queued);
        assert_eq!(fold_batch([Ready, Stale]), Stale);
        assert_eq!(fold_batch([NotFound, Ready]), NotFound);
        assert_eq!(fold_batch([]), NotFound);
    }

    #[test]
    fn timelock_hash_matches_abi_encoding() {
        let data = bytes!("1234");
        let hash = timelock_tx_hash(TARGET, U256::from(5), "pause()", &data, T);

        let mut encoded = Vec::new();
        encoded.extend_from_slice(TARGET.into_word().as_slice());
        encoded.extend_from_slice(&U256::from(5).to_be_bytes::<32>());
        encoded.extend_from_slice(&U256::from(5 * 32).to_be_bytes::<32>());
        encoded.extend_from_slice(&U256::from(7 * 32).to_be_bytes::<32>());
        encoded.extend_from_slice(&U256::from(T).to_be_bytes::<32>());
        // signature: length + padded contents
        encoded.extend_from_slice(&U256::from(7).to_be_bytes::<32>());
        let mut word = [0u8; 32];
        word[..7].copy_from_slice(b"pause()");
        encoded.extend_from_slice(&word);
        // data: length + padded contents
        encoded.extend_from_slice(&U256::from(2).to_be_bytes::<32>());
        let mut word = [0u8; 32];
        word[..2].copy_from_slice(&[0x12, 0x34]);
        encoded.extend_from_slice(&word);

        assert_eq!(hash, keccak256(encoded));
        assert_ne!(hash, timelock_tx_hash(TARGET, U256::from(5), "pause()", &data, T + 1));
    }

    #[tokio::test]
    async fn wallet_level_execution() {
        const SAFE: Address = address!("0000000000000000000000000000000000005afe");
        let hash = B256::repeat_byte(9);

        let mut chain = hourly_chain(T);
        let other = Safe::ExecutionSuccess { txHash: B256::repeat_byte(8), payment: U256::ZERO };
        chain.push_event(SAFE, 4, &other);
        let resolver = StatusResolver::new(&chain, policy());
        assert_eq!(
            resolver.resolve_safe_execution(SAFE, hash, 0).await.unwrap(),
            SafeExecution::Pending
        );

        chain.push_event(SAFE, 6, &Safe::ExecutionSuccess { txHash: hash, payment: U256::ZERO });
        let resolver = StatusResolver::new(&chain, policy());
        assert_eq!(
            resolver.resolve_safe_execution(SAFE, hash, 0).await.unwrap(),
            SafeExecution::Executed { block: 6 }
        );
        assert_eq!(
            resolver.resolve_safe_execution(SAFE, hash, 7).await.unwrap(),
            SafeExecution::Pending
        );
    }
}
