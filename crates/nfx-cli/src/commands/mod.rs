//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nfx_core::AppConfig;
use std::path::PathBuf;

pub mod load;

/// NFX - load data fixtures into Neo4j
#[derive(Parser)]
#[command(name = "nfx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory (defaults to current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Configuration file (defaults to <project>/config/neo4j.toml)
    #[arg(long, global = true, env = "NFX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load Neo4j data fixtures to your database.
    #[command(name = "neo4j:fixtures:load")]
    LoadFixtures(load::LoadArgs),
}

impl Cli {
    /// Run the selected command, returning the process exit code.
    pub async fn execute(self) -> Result<u8> {
        let project_dir = match self.project {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        let config = AppConfig::load(&project_dir, self.config.as_deref())?;

        match self.command {
            Commands::LoadFixtures(args) => load::execute(args, &config).await,
        }
    }
}
