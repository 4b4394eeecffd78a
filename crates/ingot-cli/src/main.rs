//! Ingot CLI - Command-line utility for securely ingesting
//! conversation-export archives.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let operation = match &cli.command {
        cli::Commands::Ingest(_) => "ingest",
        cli::Commands::Check(_) => "check",
    };
    let formatter = output::create_formatter(operation, cli.json, cli.verbose, cli.quiet);

    let result = match &cli.command {
        cli::Commands::Ingest(args) => {
            commands::ingest::execute(args, &*formatter, !cli.quiet && !cli.json)
        }
        cli::Commands::Check(args) => commands::check::execute(args, &*formatter),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            formatter.format_error(&e);
            ExitCode::FAILURE
        }
    }
}
