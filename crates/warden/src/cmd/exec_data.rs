use alloy_primitives::{Address, Bytes};
use clap::Parser;
use safe_multisig::{
    calls::get_domain_version, prepare_execution, ChainClient, MultisigTransaction,
    SafeTransactionData,
};
use tracing::{debug, info};

use std::path::PathBuf;

use crate::{
    common::RpcArgs,
    runner::CliContext,
    utils::{load_from_json_file, print_json, print_loading_until_async},
};

#[derive(Debug, Parser)]
#[clap(about = "Build the execTransaction calldata of a fully approved wallet transaction.")]
pub struct ExecDataCommand {
    #[arg(long, value_name = "SAFE", help = "The wallet that executes the transaction.")]
    safe: Address,

    #[arg(long, value_name = "FILE", help = "JSON file with the wallet transaction.")]
    tx: PathBuf,

    #[arg(
        long,
        value_name = "SIGNATURE",
        requires = "signer",
        help = "An owner's own signature over the transaction hash."
    )]
    signature: Option<Bytes>,

    #[arg(
        long,
        value_name = "SIGNER",
        requires = "signature",
        help = "The owner that produced --signature."
    )]
    signer: Option<Address>,

    #[arg(long, value_name = "EXECUTOR", help = "The owner that will submit the transaction.")]
    executor: Option<Address>,

    #[clap(flatten)]
    rpc: RpcArgs,
}

impl ExecDataCommand {
    pub async fn execute(self, ctx: CliContext) -> eyre::Result<()> {
        let Self { safe, tx, signature, signer, executor, rpc } = self;

        let data: SafeTransactionData = load_from_json_file(&tx)?;
        let client = rpc.client(&ctx.config);

        let chain_id = client.chain_id().await?;
        let domain = get_domain_version(&client, safe).await?;
        // the relay is only needed to unpack batches for display
        let multisend = ctx.config.multisend_address(chain_id).ok();
        let tx = MultisigTransaction::new(data, safe, chain_id, domain, multisend)?;
        debug!(hash = %tx.hash, calls = tx.calls.len(), "Loaded wallet transaction");

        let own_signature = signer.zip(signature.as_ref().map(|s| &s[..]));
        let prepared = print_loading_until_async(
            "Checking wallet state",
            prepare_execution(&client, safe, &tx, executor, own_signature),
        )
        .await?;
        info!(signers = prepared.signers.len(), threshold = prepared.threshold, "Execution ready");

        print_json(&prepared)
    }
}
