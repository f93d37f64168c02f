//! Interactive confirmation.

use anyhow::{Context, Result};
use dialoguer::Confirm;

/// Asks the user a yes/no question.
pub trait Confirmation: Send + Sync {
    fn confirm(&self, question: &str, default: bool) -> Result<bool>;
}

/// Terminal prompt backed by dialoguer.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Confirmation for TerminalPrompt {
    fn confirm(&self, question: &str, default: bool) -> Result<bool> {
        // The question already carries its own y/N hint.
        Confirm::new()
            .with_prompt(question)
            .default(default)
            .show_default(false)
            .interact()
            .context("Failed to read confirmation")
    }
}
