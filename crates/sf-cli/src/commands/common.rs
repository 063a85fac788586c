//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use sf_core::config::MEMORY_PATH;
use sf_core::{discover_migrations, Config};
use sf_db::DuckDbBackend;
use sf_migrate::{EventSink, Migration, MigrationEvent, Migrator};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and the database is closed cleanly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; the command already printed its diagnostics.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A loaded project: its root directory and parsed config.
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

/// Load the project config from `--config` or the project directory.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load project config")?;
    Ok(Project { root, config })
}

/// Read the project's SQL migration files, in order.
pub(crate) fn load_migrations(project: &Project) -> Result<Vec<Migration>> {
    let files = discover_migrations(&project.root, &project.config)
        .context("Failed to discover migrations")?;
    Ok(files.into_iter().map(Migration::from).collect())
}

/// Open the target database and build a migrator over the project's
/// migrations, reporting progress to the console.
///
/// With `quiet` only failures are printed, keeping stdout free for
/// machine-readable output.
pub(crate) fn open_migrator(
    global: &GlobalArgs,
    quiet: bool,
) -> Result<Migrator<DuckDbBackend>> {
    let project = load_project(global)?;
    let migrations = load_migrations(&project)?;

    let db_config = project.config.database_for(global.target.as_deref())?;
    let path = db_config.resolve_path(&project.root);
    if path != MEMORY_PATH {
        if let Some(parent) = Path::new(&path).parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    log::debug!("Opening database {path}");

    let store = DuckDbBackend::new(&path)
        .with_context(|| format!("Failed to open database {path}"))?
        .with_history_table(&project.config.history_table)?;
    let migrator = Migrator::new(store, migrations)?.with_sink(Box::new(ConsoleSink {
        verbose: global.verbose,
        quiet,
    }));
    Ok(migrator)
}

/// Prints migration events to stdout (errors to stderr).
pub(crate) struct ConsoleSink {
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

impl EventSink for ConsoleSink {
    fn emit(&self, event: &MigrationEvent) {
        if event.is_error() {
            eprintln!("  ✗ {event}");
            return;
        }
        if self.quiet || (event.is_debug() && !self.verbose) {
            return;
        }
        if event.is_debug() {
            println!("    {event}");
        } else {
            println!("  ✓ {event}");
        }
    }
}

/// Print a left-aligned table with a dashed header separator.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  "));

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  "));
    }
}

fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(h.len())
        })
        .collect()
}
