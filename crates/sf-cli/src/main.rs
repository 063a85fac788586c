//! Schemaflow CLI - verify and apply ordered SQL migrations

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{common, migrate, status, verify};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global),
        cli::Commands::Verify => verify::execute(&cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<common::ExitCode>() {
            Some(code) => std::process::ExitCode::from(code.0),
            None => {
                eprintln!("Error: {err:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}
