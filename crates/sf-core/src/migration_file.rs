//! SQL migration file discovery.
//!
//! Each `*.sql` file in a configured migration directory is one migration.
//! The file stem is the migration name and the sequence is the files sorted by
//! file name across all directories, so a numeric prefix such as
//! `0001_create_accounts.sql` fixes the position.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::migration_name::MigrationName;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A migration loaded from disk.
#[derive(Debug, Clone)]
pub struct MigrationFile {
    /// Migration name (file stem)
    pub name: MigrationName,
    /// Path the SQL was read from
    pub path: PathBuf,
    /// File contents, unmodified
    pub sql: String,
}

impl MigrationFile {
    /// Read a single migration file.
    pub fn from_file(path: PathBuf) -> CoreResult<Self> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(MigrationName::try_new)
            .ok_or_else(|| CoreError::InvalidMigrationFile {
                path: path.display().to_string(),
            })?;
        let sql = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Self { name, path, sql })
    }
}

/// Discover all migration files for a project rooted at `root`.
pub fn discover_migrations(root: &Path, config: &Config) -> CoreResult<Vec<MigrationFile>> {
    let mut paths = Vec::new();
    for dir in config.migration_paths_absolute(root) {
        collect_sql_files(&dir, &mut paths)?;
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut seen: HashMap<MigrationName, PathBuf> = HashMap::new();
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = MigrationFile::from_file(path)?;
        if let Some(first) = seen.get(&file.name) {
            return Err(CoreError::DuplicateMigration {
                name: file.name.to_string(),
                first: first.display().to_string(),
                second: file.path.display().to_string(),
            });
        }
        seen.insert(file.name.clone(), file.path.clone());
        files.push(file);
    }

    log::debug!("Discovered {} migration files", files.len());
    Ok(files)
}

/// Collect `*.sql` files directly inside `dir` (no recursion).
fn collect_sql_files(dir: &Path, out: &mut Vec<PathBuf>) -> CoreResult<()> {
    if !dir.is_dir() {
        return Err(CoreError::MigrationDirNotFound {
            path: dir.display().to_string(),
        });
    }
    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "sql") {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "migration_file_test.rs"]
mod tests;
