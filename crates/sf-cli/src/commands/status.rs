//! `sf status` - list applied and pending migrations

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{open_migrator, print_table};
use anyhow::{Context, Result};
use sf_migrate::MigrationStatus;

/// Execute the status command.
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let migrator = open_migrator(global, args.output == OutputFormat::Json)?;
    let status = migrator
        .status()
        .context("Failed to read migration status")?;

    match args.output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&status).context("Failed to serialize status")?;
            println!("{json}");
        }
        OutputFormat::Text => print_status_table(&status),
    }
    Ok(())
}

fn print_status_table(status: &[MigrationStatus]) {
    if status.is_empty() {
        println!("No migrations found.");
        return;
    }
    let rows: Vec<Vec<String>> = status
        .iter()
        .map(|s| {
            vec![
                s.ordinal.to_string(),
                s.name.clone(),
                s.state.to_string(),
                s.applied_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_default(),
                s.hash
                    .as_deref()
                    .and_then(|h| h.get(..12))
                    .unwrap_or_default()
                    .to_string(),
            ]
        })
        .collect();
    print_table(&["#", "name", "state", "applied_at", "hash"], &rows);
}
