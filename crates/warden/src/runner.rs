//! Drives one command to completion on a tokio runtime.

use tracing::debug;
use tracing_subscriber::EnvFilter;

use std::future::Future;

use crate::common::WardenConfig;

/// Everything a command receives besides its own arguments.
#[derive(Debug, Clone, Default)]
pub struct CliContext {
    pub config: WardenConfig,
}

pub struct CliRunner {
    runtime: tokio::runtime::Runtime,
    context: CliContext,
}

impl CliRunner {
    pub fn new(config: WardenConfig) -> eyre::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
        Ok(Self { runtime, context: CliContext { config } })
    }

    /// Runs `command` until it finishes or the user hits ctrl-c.
    ///
    /// Every command only reads, so nothing needs cleaning up on interruption.
    pub fn run_command_until_exit<F, Fut>(self, command: F) -> eyre::Result<()>
    where
        F: FnOnce(CliContext) -> Fut,
        Fut: Future<Output = eyre::Result<()>>,
    {
        let Self { runtime, context } = self;

        runtime.block_on(async move {
            tokio::select! {
                result = command(context) => result,
                _ = tokio::signal::ctrl_c() => {
                    debug!("Interrupted");
                    Ok(())
                }
            }
        })
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the flags.
pub fn init_tracing(debug: bool, verbosity: u8) -> eyre::Result<()> {
    let level = match (debug, verbosity) {
        (_, 3..) => "trace",
        (true, _) | (_, 2) => "debug",
        (false, 1) => "info",
        (false, _) => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to install the log subscriber: {e}"))
}
