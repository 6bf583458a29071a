use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use emergency_actions::{ActionRegistry, Field};
use itertools::Itertools;
use prettytable::{row, Table};
use serde_json::Value;

use crate::{runner::CliContext, utils::print_json};

#[derive(Debug, Subcommand)]
#[clap(about = "Inspect and lower emergency actions.")]
pub enum ActionCommands {
    #[command(name = "list")]
    List(ListCommand),

    #[command(name = "lower")]
    Lower(LowerCommand),
}

impl ActionCommands {
    pub async fn execute(self, ctx: CliContext) -> eyre::Result<()> {
        match self {
            Self::List(list) => list.execute(ctx).await,
            Self::Lower(lower) => lower.execute(ctx).await,
        }
    }
}

#[derive(Debug, Parser)]
#[clap(about = "List every emergency action with its parameters.")]
pub struct ListCommand {
    #[arg(long, help = "Print the registry as JSON.")]
    json: bool,
}

impl ListCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let kinds = ActionRegistry.kinds();
        if self.json {
            return print_json(&kinds);
        }

        let mut table = Table::new();
        table.add_row(row!["type", "params"]);
        for spec in kinds {
            table.add_row(row![spec.tag, join_fields(spec.fields)]);
        }
        table.printstd();

        Ok(())
    }
}

#[derive(Debug, Parser)]
#[clap(about = "Validate an emergency action and print the call it lowers to.")]
pub struct LowerCommand {
    #[arg(long = "type", value_name = "TYPE", help = "The action type, e.g. pool-pause.")]
    kind: String,

    #[arg(long, value_name = "JSON", help = "The action parameters as a JSON object.")]
    params: String,

    #[arg(long, value_name = "ADDRESS", help = "The market configurator of the market.")]
    market_configurator: Address,
}

impl LowerCommand {
    pub async fn execute(self, _ctx: CliContext) -> eyre::Result<()> {
        let params: Value = serde_json::from_str(&self.params)?;
        let action = ActionRegistry.validate(&self.kind, &params)?;

        println!("{}", action.describe());
        print_json(&action.lower(self.market_configurator))
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields.iter().map(|f| format!("{}: {}", f.name, f.ty)).join(", ")
}
