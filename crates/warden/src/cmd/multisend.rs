use alloy_primitives::Bytes;
use clap::{Parser, Subcommand};
use safe_multisig::{multisend, Call};

use std::path::PathBuf;

use crate::{
    runner::CliContext,
    utils::{load_from_json_file, print_json},
};

#[derive(Debug, Subcommand)]
#[clap(about = "Pack and unpack MultiSend payloads.")]
pub enum MultisendCommands {
    #[command(name = "encode")]
    Encode(EncodeCommand),

    #[command(name = "decode")]
    Decode(DecodeCommand),
}

impl MultisendCommands {
    pub async fn execute(self, ctx: CliContext) -> eyre::Result<()> {
        match self {
            Self::Encode(encode) => encode.execute(ctx).await,
            Self::Decode(decode) => decode.execute(ctx).await,
        }
    }
}

#[derive(Debug, Parser)]
#[clap(about = "Encode a JSON list of calls as multiSend(bytes) calldata.")]
pub struct EncodeCommand {
    #[arg(value_name = "CALLS", help = "JSON file with an array of {to, value, data} calls.")]
    calls: PathBuf,
}

impl EncodeCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let calls: Vec<Call> = load_from_json_file(&self.calls)?;
        eyre::ensure!(!calls.is_empty(), "No calls to encode");

        println!("{}", multisend::encode(&calls));
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[clap(about = "Decode multiSend(bytes) calldata back into calls.")]
pub struct DecodeCommand {
    #[arg(value_name = "CALLDATA", help = "Hex encoded multiSend calldata.")]
    calldata: Bytes,
}

impl DecodeCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let calls = multisend::decode(&self.calldata)?;
        print_json(&calls)
    }
}
