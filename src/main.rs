use std::fs::File;
use std::sync::Mutex;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use testbed::cli::{Cli, Commands, GlobalOpts};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(&global)?;

    match cli.command {
        Commands::Generate(args) => testbed::cli::commands::generate::run(args, &global),
        Commands::Audit(args) => testbed::cli::commands::audit::run(args, &global),
        Commands::Themes(args) => testbed::cli::commands::themes::run(args, &global),
        Commands::Completions(args) => testbed::cli::commands::completions::run(args),
    }
}

/// Console layer on stderr, plus a debug-level file layer when `--log-file` is set
fn init_logging(global: &GlobalOpts) -> Result<()> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(global.console_filter()));
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let file = match &global.log_file {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        None => None,
    };

    tracing_subscriber::registry().with(console).with(file).init();
    Ok(())
}
