//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    audit::AuditArgs, completions::CompletionsArgs, generate::GenerateArgs, themes::ThemesArgs,
};

#[derive(Parser)]
#[command(name = "testbed")]
#[command(author, version, about = "Synthetic aerospace test-program directory generator")]
#[command(
    long_about = "Generates realistic aerospace test-program directory trees (purchase orders, quotes, specifications, test logs, NODs, data plots and hardware images) and audits them."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Console log level (RUST_LOG overrides)
    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Also write a plain-text debug log to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate project directory trees
    Generate(GenerateArgs),

    /// Audit generated project trees for structural problems
    Audit(AuditArgs),

    /// List the available themes
    Themes(ThemesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl GlobalOpts {
    /// Filter directive for the console layer
    pub fn console_filter(&self) -> &'static str {
        if self.verbose {
            LogLevel::Debug.as_filter()
        } else if self.quiet {
            LogLevel::Error.as_filter()
        } else {
            self.log_level.as_filter()
        }
    }
}
