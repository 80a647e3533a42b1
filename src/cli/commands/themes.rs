//! `testbed themes` command - list catalog themes

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::catalog::Catalog;

#[derive(clap::Args, Debug)]
pub struct ThemesArgs {
    /// Also list each theme's components
    #[arg(long)]
    pub components: bool,
}

pub fn run(args: ThemesArgs, global: &GlobalOpts) -> Result<()> {
    let catalog = Catalog::shared().into_diagnostic()?;

    if global.quiet {
        for theme in catalog.themes() {
            println!("{}", theme.name);
        }
        return Ok(());
    }

    println!("{}", style("Available themes").bold());
    for (index, theme) in catalog.themes().iter().enumerate() {
        println!(
            "  {} {} {}",
            style(format!("{:>2}", index)).cyan(),
            style(&theme.name).bold(),
            style(format!("({} components)", theme.components.len())).dim()
        );
        if args.components {
            for component in &theme.components {
                println!("       {}", component);
            }
        }
    }
    println!();
    println!(
        "Test types: {}",
        style(catalog.test_type_names().join(", ")).cyan()
    );
    Ok(())
}
