use std::{
    fs::File,
    io::{self, BufRead},
};

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{row, Table};
use serde::Deserialize;
use streameval_core::{evaluator::Evaluator, Label, Prediction};

use crate::{command::Command, config::load_config};

#[derive(Args)]
pub(crate) struct ReplayArgs {
    /// Evaluation configuration (JSON or YAML)
    #[arg(short, long)]
    config: String,

    /// JSON lines file of update and revert events
    #[arg(short, long)]
    events: String,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Op {
    Update,
    Revert,
}

fn default_weight() -> f32 {
    1.0
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
struct Event {
    op: Op,
    label: Label,
    prediction: Prediction,
    #[serde(default = "default_weight")]
    weight: f32,
}

pub(crate) struct ReplayCommand;

impl Command for ReplayCommand {
    type Args = ReplayArgs;
    fn execute(args: &ReplayArgs, quiet: bool) -> Result<()> {
        let config = load_config(&args.config)?;
        let mut evaluator = Evaluator::from_config(&config)?;

        let file = File::open(&args.events)
            .with_context(|| format!("Failed to open events file {}", args.events))?;
        for (index, line) in io::BufReader::new(file).lines().enumerate() {
            let line_number = index + 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let event: Event = serde_json::from_str(&line)
                .with_context(|| format!("Invalid event on line {}", line_number))?;
            let result = match event.op {
                Op::Update => evaluator.update(&event.label, &event.prediction, event.weight),
                Op::Revert => evaluator.revert(&event.label, &event.prediction, event.weight),
            };
            result.with_context(|| format!("Failed to apply event on line {}", line_number))?;
        }
        tracing::debug!(updates = evaluator.num_updates(), "replay finished");

        let report = evaluator.report();
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else if !quiet {
            let mut table = Table::new();
            table.set_titles(row!["Metric", "Value"]);
            for entry in &report {
                table.add_row(row![entry.name, entry.value]);
            }
            table.printstd();
        }
        Ok(())
    }
}
