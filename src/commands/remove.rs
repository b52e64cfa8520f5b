//! Remove command implementation

use super::{Command, CommandContext};
use anyhow::Result;
use async_trait::async_trait;
use colored::*;
use dialoguer::{Confirm, theme::ColorfulTheme};

/// Remove one repository from the configuration and delete its working copy
pub struct RemoveCommand {
    pub name: String,
    /// Skip the confirmation prompt
    pub force: bool,
}

#[async_trait]
impl Command for RemoveCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        if !self.force {
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!(
                    "This will delete the folder {} from your disk, are you sure you want to do this?",
                    self.name
                ))
                .default(true)
                .interact()?;
            if !confirmed {
                return Ok(());
            }
        }

        let mut repoman = context.empty_repoman();
        repoman.remove(&context.config_file, &self.name).await?;

        println!("{}", format!("{} has been removed.", self.name).green());
        Ok(())
    }
}
