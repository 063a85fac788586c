//! `sf verify` - read-only integrity check of the migration history

use crate::cli::GlobalArgs;
use crate::commands::common::{open_migrator, ExitCode};
use anyhow::Result;

/// Execute the verify command.
///
/// Exits with code 1 on drift or history overrun.
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let migrator = open_migrator(global, false)?;
    match migrator.verify() {
        Ok(count) => {
            let pending = migrator.migrations().len().saturating_sub(count);
            println!("{count} migrations verified, {pending} pending");
            Ok(())
        }
        Err(err) => {
            eprintln!("Verification failed: {err}");
            Err(ExitCode(1).into())
        }
    }
}
