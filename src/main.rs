//! jwt-audit: an offline CLI for auditing JSON Web Tokens.
//!
//! Entry point for the application. Parses CLI arguments, installs the
//! log subscriber, and delegates to the appropriate command handler.

#![forbid(unsafe_code)]

mod cli;
mod commands;
mod display;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use cli::{Cli, Commands};

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

/// Parse CLI arguments and dispatch to the appropriate command handler.
///
/// Returns `ExitCode` so the caller can exit without `process::exit`,
/// allowing all destructors (including `Zeroizing`) to run.
fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "dispatching");

    match &cli.command {
        Commands::Decode(args) => {
            commands::decode::execute(args)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify(args) => {
            let signature_valid = commands::verify::execute(args)?;
            Ok(if signature_valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
