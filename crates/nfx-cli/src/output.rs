//! Terminal output formatting.

use colored::Colorize;
use nfx_graph::ExecutionSummary;

/// Where the command writes its user-facing lines.
pub trait Output: Send + Sync {
    /// A pipeline progress line.
    fn progress(&self, message: &str);

    fn warning(&self, message: &str);

    fn error(&self, message: &str);

    fn success(&self, message: &str);
}

/// Writes to stdout, errors to stderr.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn progress(&self, message: &str) {
        println!("  {} {}", ">".yellow(), message.green());
    }

    fn warning(&self, message: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{}", message.white().on_red());
    }

    fn success(&self, message: &str) {
        println!("{}", message.green().bold());
    }
}

/// One-line description of a finished load.
pub fn summary_line(summary: &ExecutionSummary) -> String {
    format!(
        "Loaded {} fixture(s): {} node(s), {} relationship(s), {} statement(s)",
        summary.fixtures, summary.nodes, summary.relationships, summary.statements
    )
}
