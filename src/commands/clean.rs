//! Clean command implementation

use super::{Command, CommandContext};
use anyhow::Result;
use async_trait::async_trait;
use colored::*;
use dialoguer::{Confirm, theme::ColorfulTheme};

/// Delete workspace entries that are not configured repositories
pub struct CleanCommand {
    /// Only list what would be deleted
    pub dry_run: bool,
    /// Delete without asking
    pub force: bool,
}

#[async_trait]
impl Command for CleanCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let repoman = context.repoman()?;
        let candidates = repoman.clean(true)?;

        if candidates.is_empty() {
            println!("{}", "Nothing to delete".green());
            return Ok(());
        }

        println!(
            "The following files/directories will be deleted: {}",
            candidates.join(", ")
        );
        if self.dry_run {
            return Ok(());
        }

        let confirmed = self.force
            || Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Are you sure?")
                .default(false)
                .interact()?;
        if !confirmed {
            println!("Nothing is deleted");
            return Ok(());
        }

        repoman.clean(false)?;
        Ok(())
    }
}
