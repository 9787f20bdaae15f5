use std::path::Path;

use clap::{Args, Subcommand};
use streameval_core::{config::EvaluationConfig, flavor::FlavorKind};

use crate::command::Command;

use anyhow::{Context, Result};

#[derive(Args)]
pub(crate) struct ConfigCheckArgs {
    config: String,
}

#[derive(Args)]
pub(crate) struct ConfigNewArgs {
    flavor: String,
}

#[derive(Subcommand)]
enum ConfigSubCommand {
    /// Check an evaluation configuration for validity.
    Check(ConfigCheckArgs),
    /// Emit a configuration for the given flavor with all defaults.
    New(ConfigNewArgs),
}

#[derive(Args)]
pub(crate) struct ConfigArgs {
    #[command(subcommand)]
    subcommand: ConfigSubCommand,
}

/// Reads a configuration file, treating `.yaml` and `.yml` files as YAML and
/// everything else as JSON.
pub(crate) fn load_config(path: &str) -> Result<EvaluationConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path))?;
    let is_yaml = matches!(
        Path::new(path).extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let config = if is_yaml {
        EvaluationConfig::from_yaml(&contents)
    } else {
        EvaluationConfig::from_json(&contents)
    };
    config.with_context(|| format!("Failed to parse configuration file {}", path))
}

pub(crate) struct ConfigCommand;

impl Command for ConfigCommand {
    type Args = ConfigArgs;
    fn execute(args: &ConfigArgs, _quiet: bool) -> Result<()> {
        match &args.subcommand {
            ConfigSubCommand::Check(args) => {
                let _config = load_config(&args.config)?;
                println!("ok");
                Ok(())
            }
            ConfigSubCommand::New(args) => {
                let flavor: FlavorKind = args.flavor.parse()?;
                let config = EvaluationConfig::new(flavor);
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
        }
    }
}
