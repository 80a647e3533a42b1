//! Shell completion generation
//!
//! Writes a completion script for bash, zsh, fish, elvish or PowerShell to
//! stdout.
//!
//! # Usage
//!
//! ```bash
//! # Bash - add to ~/.bashrc
//! source <(testbed completions bash)
//!
//! # Zsh - add to ~/.zshrc
//! source <(testbed completions zsh)
//!
//! # Fish
//! testbed completions fish > ~/.config/fish/completions/testbed.fish
//!
//! # PowerShell - add to $PROFILE
//! testbed completions powershell >> $PROFILE
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, bin, &mut io::stdout());
    Ok(())
}
