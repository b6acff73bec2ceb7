//! # mull
//!
//! Command-line manager for WireGuard relays.
//!
//! This binary provides:
//! - **Favorites**: an ordered list of preferred relays kept in `mull.toml`
//! - **Lifecycle**: `up`/`down` through `wg-quick`, with a torrenting guard
//!   before anything is torn down
//! - **Metadata**: a local SQLite copy of the provider's relay list that
//!   `query` searches and `info` reads
//! - **Results cache**: the hostnames of the last query, addressable by index

mod cli;
mod commands;
mod config;
mod error;
mod lifecycle;
mod output;
mod system;

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::App;
use crate::config::CliConfig;
use crate::error::Result;

fn main() -> ExitCode {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Run the command; every error surfaces here
    // -----------------------------------------------------------------------
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = ?e, "command failed");
            eprintln!("[ERROR] {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = CliConfig::from_env();
    debug!(?config, "Loaded configuration");

    let mut app = App::load(config)?;
    app.run(cli.command)
}
