//! TsuzuMark CLI
//!
//! Highlights lint issues inside a document and removes them cleanly.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(annotated) => {
            if annotated {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Runs a command. `Ok(true)` means markers were created.
fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Annotate {
            file,
            format,
            clear,
        } => commands::annotate::run_annotate(&cli, file, *format, *clear),
        Commands::Init { force } => commands::init::run_init(*force).map(|_| false),
        Commands::Rules => commands::rules::run_rules(&cli).map(|_| false),
    }
}
