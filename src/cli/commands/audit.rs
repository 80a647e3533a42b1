//! `testbed audit` command - check generated trees

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::audit::{AuditReport, DirectoryAuditor};
use crate::cli::GlobalOpts;
use crate::core::catalog::Catalog;

#[derive(clap::Args, Debug)]
pub struct AuditArgs {
    /// Directory holding the PD* project folders
    #[arg(default_value = "testbed")]
    pub dir: PathBuf,

    /// Audit only this project (ID with or without the PD prefix)
    #[arg(long, short = 'p')]
    pub project: Option<String>,
}

pub fn run(args: AuditArgs, global: &GlobalOpts) -> Result<()> {
    let catalog = Catalog::shared().into_diagnostic()?;
    let auditor = DirectoryAuditor::from_catalog(&args.dir, catalog);

    let report = match &args.project {
        Some(id) => {
            let project = auditor.find_project(id).into_diagnostic()?;
            auditor.audit_project(&project)
        }
        None => auditor.audit_tree().into_diagnostic()?,
    };

    print_report(&report, global);

    let errors = report.errors().count();
    if errors > 0 {
        Err(miette::miette!(
            "Audit failed: {} error(s) in {} project(s)",
            errors,
            report.projects.len()
        ))
    } else {
        Ok(())
    }
}

fn print_report(report: &AuditReport, global: &GlobalOpts) {
    let errors: Vec<_> = report.errors().collect();
    let warnings: Vec<_> = report.warnings().collect();

    if !global.quiet {
        if errors.is_empty() && warnings.is_empty() {
            println!("{} No issues found!", style("✓").green().bold());
        } else {
            println!("{}", style(format!("Errors: {}", errors.len())).red());
            for finding in &errors {
                println!("  {} {}", style("ERROR:").red(), style(finding).red());
            }
            println!();
            println!("{}", style(format!("Warnings: {}", warnings.len())).yellow());
            for finding in &warnings {
                println!("  {} {}", style("WARNING:").yellow(), style(finding).yellow());
            }
        }
        println!();
    }

    let status = if report.passed() {
        style("PASS").green().bold()
    } else {
        style("FAIL").red().bold()
    };
    println!("Overall status: {}", status);
    println!("Projects audited: {}", report.projects.join(", "));
}
