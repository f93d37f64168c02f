//! `neo4j:fixtures:load` - purge the database and load data fixtures.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use nfx_core::fixture::{discover, search_paths};
use nfx_core::AppConfig;
use nfx_graph::{Connector, ExecutionSummary, Executor, Neo4jConnector, Purger};
use tracing::info;

use crate::output::{summary_line, ConsoleOutput, Output};
use crate::prompt::{Confirmation, TerminalPrompt};

pub const PURGE_QUESTION: &str = "Careful, database will be purged. Do you want to continue y/N ?";

pub const NO_MASTER_CONNECTION: &str = "No master connection has been defined.";

#[derive(Args, Debug, Default)]
pub struct LoadArgs {
    /// Append the data fixtures instead of deleting all data from the database first.
    #[arg(long)]
    pub append: bool,

    /// The directory or file to load data fixtures from (repeatable).
    #[arg(long = "fixtures", value_name = "PATH")]
    pub fixtures: Vec<PathBuf>,

    /// The connection alias to use for this command.
    #[arg(long, value_name = "ALIAS")]
    pub conn: Option<String>,

    /// Do not ask any interactive question.
    #[arg(short = 'n', long)]
    pub no_interaction: bool,
}

/// How a load ended when it did not fail.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The user declined the purge confirmation.
    Declined,
    /// No `--conn` given and no master connection configured.
    NoMasterConnection,
    Loaded(ExecutionSummary),
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoMasterConnection => 1,
            Self::Declined | Self::Loaded(_) => 0,
        }
    }
}

/// Collaborators of one command run.
pub struct LoadContext<'a> {
    pub config: &'a AppConfig,
    pub connector: &'a dyn Connector,
    pub prompt: &'a dyn Confirmation,
    pub output: &'a dyn Output,
    pub interactive: bool,
}

pub async fn execute(args: LoadArgs, config: &AppConfig) -> Result<u8> {
    let ctx = LoadContext {
        config,
        connector: &Neo4jConnector::default(),
        prompt: &TerminalPrompt,
        output: &ConsoleOutput,
        interactive: !args.no_interaction && std::io::stdin().is_terminal(),
    };

    let outcome = run(&args, &ctx).await?;
    Ok(outcome.exit_code())
}

/// Confirm, resolve the connection, discover fixtures, then purge and load.
pub async fn run(args: &LoadArgs, ctx: &LoadContext<'_>) -> Result<Outcome> {
    if ctx.interactive && !args.append && !ctx.prompt.confirm(PURGE_QUESTION, false)? {
        info!("Fixture load cancelled");
        return Ok(Outcome::Declined);
    }

    let connection = match &args.conn {
        Some(alias) => ctx.config.connection(alias)?,
        None => match ctx.config.master_connection()? {
            Some(master) => master,
            None => {
                ctx.output.error(NO_MASTER_CONNECTION);
                return Ok(Outcome::NoMasterConnection);
            }
        },
    };

    let paths = search_paths(&args.fixtures, ctx.config);
    let discovery = discover(&paths)?;
    for path in &discovery.missing {
        ctx.output
            .warning(&format!("{} is neither a file nor a directory, skipped", path.display()));
    }
    info!(fixtures = discovery.fixtures.len(), append = args.append, "Fixtures discovered");

    let store = ctx
        .connector
        .connect(connection)
        .await
        .with_context(|| format!("Failed to connect to {}", connection.uri))?;

    let purger = Purger::new(store.as_ref());
    let mut executor = Executor::new(store.as_ref(), purger);
    let output = ctx.output;
    let logger = move |message: &str| output.progress(message);
    executor.set_logger(&logger);

    let summary = executor.execute(&discovery.fixtures, args.append).await?;
    ctx.output.success(&summary_line(&summary));

    Ok(Outcome::Loaded(summary))
}
