//! `sf migrate` - verify history and apply pending migrations

use crate::cli::{GlobalArgs, MigrateArgs, OutputFormat};
use crate::commands::common::open_migrator;
use anyhow::{Context, Result};

/// Execute the migrate command.
pub(crate) fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let migrator = open_migrator(global, args.output == OutputFormat::Json)?;

    let report = if args.dry_run {
        migrator.dry_run()
    } else {
        migrator.migrate()
    }
    .context(if args.dry_run {
        "Dry run failed"
    } else {
        "Migration failed"
    })?;

    match args.output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            if report.is_up_to_date() {
                println!(
                    "Up to date: {} migrations verified, nothing pending",
                    report.verified
                );
            } else if report.dry_run {
                println!(
                    "Dry run complete: {} migrations would be applied, nothing committed",
                    report.steps.len()
                );
            } else {
                println!(
                    "Applied {} migrations ({} previously applied)",
                    report.steps.len(),
                    report.verified
                );
            }
        }
    }
    Ok(())
}
