use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing::Level;

use crate::command::Command;

mod command;
mod config;
mod flavors;
mod gen_completions;
mod gen_schema;
mod replay;

#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Silence all output
    #[arg(long, default_value = "false")]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List model flavors with their required methods and default metrics
    Flavors(flavors::FlavorsArgs),
    /// Check or generate an evaluation config
    Config(config::ConfigArgs),
    /// Replay a stream of update and revert events and report the metrics
    Replay(replay::ReplayArgs),
    /// Generate shell completions
    GenCompletions(gen_completions::GenCompletionsArgs),
    /// Generate JSON schema for configuration
    GenSchema(gen_schema::GenSchemaArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => return,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if !cli.quiet {
        eprintln!("{}: This CLI tool is not stable", "warning".yellow().bold());
    }
    match &cli.command {
        Commands::Flavors(args) => flavors::FlavorsCommand::execute(args, cli.quiet),
        Commands::Config(args) => config::ConfigCommand::execute(args, cli.quiet),
        Commands::Replay(args) => replay::ReplayCommand::execute(args, cli.quiet),
        Commands::GenCompletions(args) => {
            gen_completions::GenCompletionsCommand::execute(args, cli.quiet)
        }
        Commands::GenSchema(args) => gen_schema::GenSchemaCommand::execute(args, cli.quiet),
    }
}
