use crate::{command::Command, Cli};
use clap::{Args, CommandFactory, ValueEnum};
use clap_complete::{generate, Shell};
use owo_colors::OwoColorize;

use anyhow::Result;

const BIN_NAME: &str = "steval";

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum ShellWrapper {
    Bash,
    Fish,
    Zsh,
}

impl ShellWrapper {
    fn install_command(&self) -> String {
        match self {
            ShellWrapper::Bash => format!(
                "{BIN_NAME} gen-completions bash > /usr/share/bash-completion/completions/{BIN_NAME}"
            ),
            ShellWrapper::Fish => format!(
                "{BIN_NAME} gen-completions fish > ~/.config/fish/completions/{BIN_NAME}.fish"
            ),
            ShellWrapper::Zsh => {
                format!("{BIN_NAME} gen-completions zsh > ~/.zfunc/_{BIN_NAME}")
            }
        }
    }
}

impl From<ShellWrapper> for Shell {
    fn from(s: ShellWrapper) -> Self {
        match s {
            ShellWrapper::Bash => Shell::Bash,
            ShellWrapper::Fish => Shell::Fish,
            ShellWrapper::Zsh => Shell::Zsh,
        }
    }
}

#[derive(Args)]
pub(crate) struct GenCompletionsArgs {
    shell: Option<ShellWrapper>,
}

pub(crate) struct GenCompletionsCommand;

impl Command for GenCompletionsCommand {
    type Args = GenCompletionsArgs;
    fn execute(args: &GenCompletionsArgs, quiet: bool) -> Result<()> {
        match args.shell {
            Some(shell) => {
                generate(
                    Shell::from(shell),
                    &mut Cli::command(),
                    BIN_NAME,
                    &mut std::io::stdout(),
                );
                if !quiet {
                    eprintln!();
                    eprintln!(
                        "{}: To install these completions, run: {}",
                        "Hint".blue(),
                        shell.install_command()
                    );
                }
            }
            None => {
                eprintln!("Generate shell completions. To install them for your shell, run:");
                for shell in ShellWrapper::value_variants() {
                    if let Some(value) = shell.to_possible_value() {
                        eprintln!();
                        eprintln!("{}", format!("{}:", value.get_name()).blue());
                        eprintln!("  {}", shell.install_command());
                    }
                }
                eprintln!();
            }
        }
        Ok(())
    }
}
