//! `testbed generate` command - build project directory trees

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::cli::GlobalOpts;
use crate::core::catalog::{Catalog, Theme};
use crate::core::config::GeneratorConfig;
use crate::core::context::GenerationContext;
use crate::generator::{DirectoryGenerator, RunSummary};
use crate::render::OutputFormat;

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Output directory for the generated projects
    #[arg(long, short = 'o', default_value = "testbed")]
    pub output_dir: PathBuf,

    /// Number of project folders to create
    #[arg(long, short = 'n', default_value_t = 5)]
    pub projects: usize,

    /// Comma-separated theme indices or names (default: all themes)
    #[arg(long)]
    pub themes: Option<String>,

    /// Format for document files
    #[arg(long, value_enum, default_value_t = OutputFormat::Pdf)]
    pub output_format: OutputFormat,

    /// Random seed for reproducible generation
    #[arg(long, env = "TESTBED_SEED")]
    pub seed: Option<u64>,

    /// Config file layered over the global and local config
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let config = GeneratorConfig::load(args.config.as_deref()).into_diagnostic()?;
    let catalog = Catalog::shared().into_diagnostic()?;
    let themes = resolve_themes(catalog, args.themes.as_deref());

    let mut ctx = GenerationContext::new(args.seed, config);
    let font_path = ctx.config().font_path.clone();
    let generator = DirectoryGenerator::new(
        catalog,
        &args.output_dir,
        themes,
        args.output_format,
        font_path.as_deref(),
    )
    .into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Generating {} project(s) in {} ({} documents)",
            style("→").blue(),
            style(args.projects).cyan(),
            style(args.output_dir.display()).cyan(),
            style(args.output_format).cyan()
        );
        if let Some(seed) = args.seed {
            println!("  seed {}", style(seed).dim());
        }
    }
    info!(
        projects = args.projects,
        themes = generator.themes().len(),
        format = %args.output_format,
        seed = ?args.seed,
        "starting generation"
    );

    let summary = generator.generate_structure(&mut ctx, args.projects);
    print_summary(&summary, global);

    if summary.failed() == summary.attempted && summary.attempted > 0 {
        return Err(miette::miette!(
            "Generation failed: no project could be created under {}",
            args.output_dir.display()
        ));
    }
    Ok(())
}

/// Selected themes; an empty or entirely invalid selection means all themes
fn resolve_themes(catalog: &Catalog, selection: Option<&str>) -> Vec<Theme> {
    let Some(selection) = selection else {
        return catalog.themes().to_vec();
    };
    let selectors: Vec<String> = selection
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let themes = catalog.select(&selectors);
    if themes.is_empty() {
        warn!(selection, "no valid themes selected, using all themes");
        return catalog.themes().to_vec();
    }
    if themes.len() < selectors.len() {
        warn!(selection, "some theme selections were not recognised");
    }
    themes
}

fn print_summary(summary: &RunSummary, global: &GlobalOpts) {
    if global.quiet {
        println!(
            "{} attempted, {} complete, {} partial, {} failed",
            summary.attempted,
            summary.completed(),
            summary.partial(),
            summary.failed()
        );
        return;
    }

    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Generation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Projects attempted:      {}", style(summary.attempted).cyan());
    println!("  Completed fully:         {}", style(summary.completed()).green());
    println!("  With partial failures:   {}", style(summary.partial()).yellow());
    println!("  Failed:                  {}", style(summary.failed()).red());
    println!("  Files created:           {}", style(summary.files_created()).cyan());

    let failures: Vec<_> = summary.failures().collect();
    if !failures.is_empty() || !summary.aborted.is_empty() {
        println!();
        for message in &summary.aborted {
            println!("  {} {}", style("✗").red(), message);
        }
        for failure in failures {
            println!("  {} {}", style("!").yellow(), failure);
        }
    }
    println!();

    for project in &summary.projects {
        let mark = if project.is_complete() {
            style("✓").green()
        } else {
            style("!").yellow()
        };
        println!(
            "{} {} {}",
            mark,
            project.name,
            style(format!("[{}]", project.theme)).dim()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_themes_by_index_and_name() {
        let catalog = Catalog::load().unwrap();
        let themes = resolve_themes(&catalog, Some("0, fuel tank"));
        let names: Vec<_> = themes.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Rocket Engine", "Fuel Tank"]);
    }

    #[test]
    fn test_invalid_selection_falls_back_to_all() {
        let catalog = Catalog::load().unwrap();
        assert_eq!(resolve_themes(&catalog, Some("42,nope")).len(), catalog.themes().len());
        assert_eq!(resolve_themes(&catalog, None).len(), catalog.themes().len());
        assert_eq!(resolve_themes(&catalog, Some("  ")).len(), catalog.themes().len());
    }
}
