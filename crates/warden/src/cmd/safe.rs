use alloy_primitives::{hex, Address, Bytes, B256};
use clap::{Parser, Subcommand};
use colored::Colorize;
use prettytable::{row, Table};
use safe_multisig::{
    calls::{detect_admin_kind, get_approvals, get_version},
    SafeSession, SignatureCollector, TimelockPolicy,
};

use crate::{
    common::RpcArgs,
    runner::CliContext,
    utils::{print_error_message, print_loading_until_async, print_success_message},
};

#[derive(Debug, Subcommand)]
#[clap(about = "Read the live state of a multisig wallet.")]
pub enum SafeCommands {
    #[command(name = "info")]
    Info(InfoCommand),

    #[command(name = "approvals")]
    Approvals(ApprovalsCommand),
}

impl SafeCommands {
    pub async fn execute(self, ctx: CliContext) -> eyre::Result<()> {
        match self {
            Self::Info(info) => info.execute(ctx).await,
            Self::Approvals(approvals) => approvals.execute(ctx).await,
        }
    }
}

#[derive(Debug, Parser)]
#[clap(about = "Show threshold, owners, nonce and version of a wallet.")]
pub struct InfoCommand {
    #[arg(long, value_name = "SAFE", help = "The wallet address.")]
    safe: Address,

    #[clap(flatten)]
    rpc: RpcArgs,
}

impl InfoCommand {
    pub async fn execute(self, ctx: CliContext) -> eyre::Result<()> {
        let Self { safe, rpc } = self;

        let client = rpc.client(&ctx.config);
        let cache = ctx.config.cache_config()?;
        let session = SafeSession::connect(client, cache, TimelockPolicy::default()).await?;

        let (params, version, kind) = print_loading_until_async("Loading wallet", async {
            tokio::try_join!(
                session.wallet_params(safe),
                get_version(session.client(), safe),
                detect_admin_kind(session.client(), safe),
            )
        })
        .await?;

        let mut table = Table::new();
        table.add_row(row!["chain id", session.chain_id()]);
        table.add_row(row!["wallet", safe]);
        table.add_row(row!["kind", format!("{kind:?}")]);
        table.add_row(row!["version", version]);
        table.add_row(row!["nonce", params.nonce]);
        let threshold = format!("{} of {}", params.threshold, params.signers.len());
        table.add_row(row!["threshold", threshold]);
        for (i, owner) in params.signers.iter().enumerate() {
            table.add_row(row![format!("owner #{}", i + 1), owner]);
        }
        table.printstd();

        Ok(())
    }
}

#[derive(Debug, Parser)]
#[clap(about = "Show which owners approved a hash and assemble the signature blob.")]
pub struct ApprovalsCommand {
    #[arg(long, value_name = "SAFE", help = "The wallet address.")]
    safe: Address,

    #[arg(long, value_name = "HASH", help = "The wallet transaction hash.")]
    hash: B256,

    #[arg(long, value_name = "OWNER", help = "Owner that will send execTransaction.")]
    executor: Option<Address>,

    #[arg(
        long,
        value_name = "OWNER",
        requires = "signature",
        help = "Owner that produced --signature."
    )]
    signer: Option<Address>,

    #[arg(
        long,
        value_name = "SIGNATURE",
        requires = "signer",
        help = "An eth_sign signature of the hash."
    )]
    signature: Option<Bytes>,

    #[clap(flatten)]
    rpc: RpcArgs,
}

impl ApprovalsCommand {
    pub async fn execute(self, ctx: CliContext) -> eyre::Result<()> {
        let Self { safe, hash, executor, signer, signature, rpc } = self;

        let client = rpc.client(&ctx.config);
        let cache = ctx.config.cache_config()?;
        let session = SafeSession::connect(client, cache, TimelockPolicy::default()).await?;

        let params = session.wallet_params(safe).await?;
        let approvals = print_loading_until_async(
            "Loading approvals",
            get_approvals(session.client(), safe, hash, &params.signers),
        )
        .await?;

        let mut table = Table::new();
        table.add_row(row!["owner", "approved"]);
        for (owner, approved) in &approvals.owners {
            let mark = if *approved { "yes".bright_green() } else { "no".normal() };
            table.add_row(row![owner, mark]);
        }
        table.printstd();

        let collector = SignatureCollector::new(&params, approvals);
        let own = signer.zip(signature.as_ref().map(|s| &s[..]));
        let blob = collector.build_signature_blob(executor, own)?;

        println!("\nsignatures: {}", hex::encode_prefixed(&blob.bytes));
        let count = format!("{} of {}", blob.len(), collector.threshold());
        if collector.is_threshold_met(blob.len()) {
            print_success_message(&format!("Threshold met: {count}"));
        } else {
            print_error_message(&format!("Threshold not met: {count}"));
        }

        Ok(())
    }
}
