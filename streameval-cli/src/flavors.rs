use anyhow::Result;
use clap::Args;
use prettytable::{row, Table};
use serde_json::json;
use streameval_core::flavor::allowed_flavors;

use crate::command::Command;

#[derive(Args)]
pub(crate) struct FlavorsArgs {
    /// Print as JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub(crate) struct FlavorsCommand;

impl Command for FlavorsCommand {
    type Args = FlavorsArgs;
    fn execute(args: &FlavorsArgs, _quiet: bool) -> Result<()> {
        let flavors = allowed_flavors();
        if args.json {
            let entries: Vec<serde_json::Value> = flavors
                .values()
                .map(|flavor| {
                    json!({
                        "name": flavor.name(),
                        "requiredMethods": flavor.required_methods(),
                        "predictionMethod": flavor.prediction_method(),
                        "defaultMetrics": flavor.default_metric_names().collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        let mut table = Table::new();
        table.set_titles(row!["Flavor", "Required methods", "Prediction method", "Default metrics"]);
        for flavor in flavors.values() {
            let required = flavor
                .required_methods()
                .iter()
                .map(|m| m.method_name())
                .collect::<Vec<_>>()
                .join(", ");
            let metrics = flavor.default_metric_names().collect::<Vec<_>>().join(", ");
            table.add_row(row![
                flavor.name(),
                required,
                flavor.prediction_method_name(),
                metrics
            ]);
        }
        table.printstd();
        Ok(())
    }
}
