use alloy_primitives::{hex, Address, B256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use clap::{Parser, Subcommand};
use safe_multisig::{
    signatures::process_own_signature, transaction_hash, DomainVersion, SafeTransactionData,
};

use std::path::PathBuf;

use crate::{runner::CliContext, utils::load_from_json_file};

#[derive(Debug, Subcommand)]
#[clap(about = "Hash and sign wallet transactions offline.")]
pub enum TxCommands {
    #[command(name = "hash")]
    Hash(HashCommand),

    #[command(name = "sign")]
    Sign(SignCommand),
}

impl TxCommands {
    pub async fn execute(self, ctx: CliContext) -> eyre::Result<()> {
        match self {
            Self::Hash(hash) => hash.execute(ctx).await,
            Self::Sign(sign) => sign.execute(ctx).await,
        }
    }
}

#[derive(Debug, Parser)]
#[clap(about = "Compute the hash the wallet contract will sign for a transaction.")]
pub struct HashCommand {
    #[arg(value_name = "TX", help = "JSON file with the wallet transaction fields.")]
    tx: PathBuf,

    #[arg(long, value_name = "SAFE", help = "The wallet address.")]
    safe: Address,

    #[arg(long, value_name = "CHAIN_ID", help = "The chain the wallet lives on.")]
    chain_id: u64,

    #[arg(long, help = "Use the domain of wallets older than v1.3.0.")]
    legacy_domain: bool,
}

impl HashCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let tx: SafeTransactionData = load_from_json_file(&self.tx)?;
        let domain = if self.legacy_domain { DomainVersion::Legacy } else { DomainVersion::V130 };

        println!("{}", transaction_hash(&tx, self.safe, self.chain_id, domain));
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[clap(about = "Sign a transaction hash with eth_sign, ready for the wallet's signature blob.")]
pub struct SignCommand {
    #[arg(value_name = "HASH", help = "The wallet transaction hash.")]
    hash: B256,

    #[arg(
        long,
        env = "WARDEN_PRIVATE_KEY",
        hide_env_values = true,
        help = "Hex encoded private key of an owner."
    )]
    private_key: PrivateKeySigner,
}

impl SignCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let signature = self.private_key.sign_message(self.hash.as_slice()).await?;
        let normalized = process_own_signature(&signature.as_bytes())?;

        println!("signer:    {}", self.private_key.address());
        println!("signature: {}", hex::encode_prefixed(normalized));
        Ok(())
    }
}
