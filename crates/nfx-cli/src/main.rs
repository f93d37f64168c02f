//! NFX CLI - Neo4j fixture loader
//!
//! Loads seed data into a Neo4j database.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;
mod prompt;

use commands::Cli;

/// Initialize tracing with optional file logging.
///
/// Console logs go to stderr so progress output on stdout stays clean.
fn init_tracing(verbose: bool, log_file: Option<&std::path::Path>) -> Result<()> {
    let default_filter = if verbose {
        "nfx=debug,nfx_core=debug,nfx_graph=debug"
    } else {
        "nfx=warn,nfx_core=warn,nfx_graph=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let console = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_file.as_deref())?;

    let code = cli.execute().await?;
    Ok(ExitCode::from(code))
}
