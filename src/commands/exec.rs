//! Exec command implementation

use super::{Command, CommandContext};
use anyhow::Result;
use async_trait::async_trait;
use colored::*;

/// Run a named action (`init`, `get`, ...) or a raw shell command in every
/// selected repository
pub struct ExecCommand {
    pub action: String,
}

impl ExecCommand {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }
}

#[async_trait]
impl Command for ExecCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let repoman = context.repoman()?;
        let outcome = repoman.exec(&self.action, &context.options).await;

        if outcome.results.is_empty() {
            println!("{}", "No repositories matched".yellow());
            return Ok(());
        }

        let failed = outcome.failed();
        if let Some(error) = outcome.error {
            return Err(error.into());
        }

        if failed > 0 {
            println!(
                "\n{}",
                format!(
                    "Completed with {} successful, {} failed",
                    outcome.results.len() - failed,
                    failed
                )
                .yellow()
            );
        }

        Ok(())
    }
}
