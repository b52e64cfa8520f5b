//! List command implementation

use super::{Command, CommandContext};
use anyhow::Result;
use async_trait::async_trait;

/// Print the names of the selected repositories, one per line
pub struct ListCommand;

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let repoman = context.repoman()?;
        for name in repoman.list(&context.options) {
            println!("{name}");
        }
        Ok(())
    }
}
