use alloy_primitives::{Address, U256};
use clap::{Parser, Subcommand};
use colored::Colorize;
use prettytable::{row, Table};
use safe_multisig::{
    calls::{get_domain_version, get_nonce, get_transaction_hash, require_supported_admin},
    ChainClient, LifecycleStatus, ProposalBundle, ResolvedStatus, SafeError, StatusResolver,
};
use tracing::debug;

use std::{
    path::PathBuf,
    time::{Duration, UNIX_EPOCH},
};

use crate::{
    common::RpcArgs,
    runner::CliContext,
    utils::{print_json, print_loading_until_async},
};

#[derive(Debug, Subcommand)]
#[clap(about = "Work with proposal bundles.")]
pub enum ProposalCommands {
    #[command(name = "build")]
    Build(BuildCommand),

    #[command(name = "status")]
    Status(StatusCommand),
}

impl ProposalCommands {
    pub async fn execute(self, ctx: CliContext) -> eyre::Result<()> {
        match self {
            Self::Build(build) => build.execute(ctx).await,
            Self::Status(status) => status.execute(ctx).await,
        }
    }
}

#[derive(Debug, Parser)]
#[clap(about = "Build the wallet transaction of every queue batch at the live nonce.")]
pub struct BuildCommand {
    #[arg(value_name = "BUNDLE", help = "The proposal bundle JSON file.")]
    bundle: PathBuf,

    #[arg(long, value_name = "SAFE", help = "The wallet that queues the batches.")]
    safe: Address,

    #[arg(long, value_name = "INDEX", help = "Only build this batch.")]
    batch: Option<usize>,

    #[arg(
        long,
        value_name = "TIMELOCK",
        help = "Also report where each batch stands in this timelock."
    )]
    timelock: Option<Address>,

    #[clap(flatten)]
    rpc: RpcArgs,
}

impl BuildCommand {
    pub async fn execute(self, ctx: CliContext) -> eyre::Result<()> {
        let Self { bundle, safe, batch, timelock, rpc } = self;

        let bundle = ProposalBundle::load(&bundle)?;
        let client = rpc.client(&ctx.config);
        let chain_id = check_chain(&client, &bundle).await?;
        require_supported_admin(&client, safe).await?;

        let multisend = ctx.config.multisend_address(chain_id)?;
        let domain = get_domain_version(&client, safe).await?;
        let nonce = get_nonce(&client, safe).await?;

        let indices = match batch {
            Some(index) => vec![index],
            None => (0..bundle.queue_batches.len()).collect(),
        };

        let mut transactions = Vec::with_capacity(indices.len());
        for (offset, index) in indices.into_iter().enumerate() {
            // batches are executed one after the other, each consuming a nonce
            let nonce = nonce + U256::from(offset);
            let tx = bundle.batch_transaction(index, safe, domain, nonce, multisend)?;

            let onchain = get_transaction_hash(&client, safe, &tx.tx).await?;
            if onchain != tx.hash {
                return Err(SafeError::HashMismatch { local: tx.hash, onchain }.into());
            }
            debug!(index, hash = %tx.hash, "Assembled batch");

            transactions.push((index, tx));
        }

        let Some(timelock) = timelock else {
            return print_json(&transactions.into_iter().map(|(_, tx)| tx).collect::<Vec<_>>());
        };

        let resolver = StatusResolver::new(&client, ctx.config.grace_period(None)?);
        let mut parsed = Vec::with_capacity(transactions.len());
        for (index, tx) in transactions {
            let resolution = resolver
                .resolve_batch(timelock, bundle.batch(index)?, bundle.eta, bundle.created_at_block)
                .await?;
            parsed.push(resolution.into_parsed(tx));
        }

        print_json(&parsed)
    }
}

#[derive(Debug, Parser)]
#[clap(about = "Show the timelock lifecycle of every queue batch of a bundle.")]
pub struct StatusCommand {
    #[arg(value_name = "BUNDLE", help = "The proposal bundle JSON file.")]
    bundle: PathBuf,

    #[arg(long, value_name = "TIMELOCK", help = "The timelock the batches are queued in.")]
    timelock: Address,

    #[arg(long, value_name = "DURATION", help = "Grace period after the ETA, e.g. 14days.")]
    grace_period: Option<humantime::Duration>,

    #[clap(flatten)]
    rpc: RpcArgs,
}

impl StatusCommand {
    pub async fn execute(self, ctx: CliContext) -> eyre::Result<()> {
        let Self { bundle, timelock, grace_period, rpc } = self;

        let bundle = ProposalBundle::load(&bundle)?;
        let policy = ctx.config.grace_period(grace_period)?;
        let client = rpc.client(&ctx.config);
        check_chain(&client, &bundle).await?;

        let resolver = StatusResolver::new(&client, policy);
        let eta = humantime::format_rfc3339_seconds(UNIX_EPOCH + Duration::from_secs(bundle.eta));
        println!("eta: {eta}\n");

        let mut table = Table::new();
        table.add_row(row!["batch", "calls", "status", "queued at block"]);
        for (index, calls) in bundle.queue_batches.iter().enumerate() {
            let result = print_loading_until_async(
                "Scanning timelock events",
                resolver.resolve_batch(timelock, calls, bundle.eta, bundle.created_at_block),
            )
            .await;

            let (status, queue_block) = match result {
                Ok(batch) => (ResolvedStatus::Known(batch.status), batch.queue_block()),
                Err(e) => (ResolvedStatus::from_result(Err(e))?, None),
            };

            let queue_block = queue_block.map_or_else(|| "-".to_string(), |b| b.to_string());
            table.add_row(row![index, calls.len(), paint(&status), queue_block]);
        }
        table.printstd();

        Ok(())
    }
}

async fn check_chain<C: ChainClient>(client: &C, bundle: &ProposalBundle) -> eyre::Result<u64> {
    let chain_id = client.chain_id().await?;
    eyre::ensure!(
        chain_id == bundle.chain_id,
        "Bundle targets chain {} but the RPC endpoint serves chain {}",
        bundle.chain_id,
        chain_id
    );
    Ok(chain_id)
}

fn paint(status: &ResolvedStatus) -> colored::ColoredString {
    let text = status.to_string();
    match status {
        ResolvedStatus::Known(LifecycleStatus::Executed) => text.bright_green(),
        ResolvedStatus::Known(LifecycleStatus::Ready) => text.green(),
        ResolvedStatus::Known(LifecycleStatus::Queued) => text.yellow(),
        ResolvedStatus::Known(LifecycleStatus::Canceled | LifecycleStatus::Stale) => {
            text.bright_red()
        }
        ResolvedStatus::Known(LifecycleStatus::NotFound) => text.normal(),
        ResolvedStatus::Unknown(_) => text.magenta(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safe_multisig::testing::FakeChain;

    const BUNDLE: &str = r#"{
        "chainId": 10,
        "eta": 1700000000,
        "author": "0x00000000000000000000000000000000000000a1",
        "marketConfigurator": "0x00000000000000000000000000000000000000c0",
        "createdAtBlock": 1,
        "queueBatches": [[{
            "to": "0x000000000000000000000000000000000000aaaa",
            "value": "0x0",
            "data": "0x"
        }]],
        "batchesEstimatedGas": [50000]
    }"#;

    #[tokio::test]
    async fn refuses_bundles_for_another_chain() {
        let mut bundle = ProposalBundle::from_json(BUNDLE).unwrap();
        let chain = FakeChain::with_timestamps(vec![100, 200]);

        let err = check_chain(&chain, &bundle).await.unwrap_err();
        assert!(err.to_string().contains("chain 10"));

        bundle.chain_id = 1;
        assert_eq!(check_chain(&chain, &bundle).await.unwrap(), 1);
    }

    #[test]
    fn unknown_statuses_keep_their_reason() {
        let painted = paint(&ResolvedStatus::Unknown("timeout".to_string()));
        assert!(painted.to_string().contains("timeout"));
    }
}
