use clap::Args;
use streameval_core::config::gen_config_schema;

use crate::command::Command;

use anyhow::Result;

#[derive(Args)]
pub(crate) struct GenSchemaArgs {}

pub(crate) struct GenSchemaCommand;

impl Command for GenSchemaCommand {
    type Args = GenSchemaArgs;
    fn execute(_args: &GenSchemaArgs, _quiet: bool) -> Result<()> {
        let schema = gen_config_schema();
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}
