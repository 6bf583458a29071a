use clap::{
    builder::{styling::AnsiColor, Styles},
    ArgAction, Parser, Subcommand,
};
use warden::{
    cmd::{
        action::ActionCommands, exec_data::ExecDataCommand, multisend::MultisendCommands,
        proposal::ProposalCommands, safe::SafeCommands, tx::TxCommands,
    },
    common::ConfigArgs,
    runner::{init_tracing, CliRunner},
};
use warden_version::{LONG_VERSION, SHORT_VERSION};

/// The verbosity level.
pub type Verbosity = u8;

#[derive(Debug, Parser)]
#[command(
    name = "warden",
    about = "Multisig and timelock tooling for market configurator emergency actions.",
    version = SHORT_VERSION.as_str(),
    long_version = LONG_VERSION.as_str(),
    term_width = 80,
    styles = get_color_style()
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable debug logging")]
    pub debug: bool,

    /// Verbosity level of the log messages.
    ///
    /// Pass multiple times to increase the verbosity (e.g. -v, -vv, -vvv).
    /// RUST_LOG takes precedence when set.
    #[arg(
        help_heading = "Display options",
        global = true,
        short,
        long,
        verbatim_doc_comment,
        action = ArgAction::Count
    )]
    verbosity: Verbosity,

    #[clap(flatten)]
    config: ConfigArgs,
}

impl Cli {
    pub fn run(self) -> eyre::Result<()> {
        init_tracing(self.debug, self.verbosity)?;

        let runner = CliRunner::new(self.config.load()?)?;
        match self.command {
            Commands::Multisend(multisend) => {
                runner.run_command_until_exit(|ctx| multisend.execute(ctx))
            }
            Commands::Tx(tx) => runner.run_command_until_exit(|ctx| tx.execute(ctx)),
            Commands::Safe(safe) => runner.run_command_until_exit(|ctx| safe.execute(ctx)),
            Commands::Action(action) => runner.run_command_until_exit(|ctx| action.execute(ctx)),
            Commands::Proposal(proposal) => {
                runner.run_command_until_exit(|ctx| proposal.execute(ctx))
            }
            Commands::ExecData(exec_data) => {
                runner.run_command_until_exit(|ctx| exec_data.execute(ctx))
            }
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(name = "multisend", subcommand)]
    Multisend(MultisendCommands),

    #[command(name = "tx", subcommand)]
    Tx(TxCommands),

    #[command(name = "safe", subcommand)]
    Safe(SafeCommands),

    #[command(name = "action", subcommand)]
    Action(ActionCommands),

    #[command(name = "proposal", subcommand)]
    Proposal(ProposalCommands),

    #[command(name = "exec-data")]
    ExecData(ExecDataCommand),
}

fn get_color_style() -> Styles {
    Styles::styled()
        .usage(AnsiColor::Green.on_default().bold().underline())
        .header(AnsiColor::Yellow.on_default().bold().underline())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}
