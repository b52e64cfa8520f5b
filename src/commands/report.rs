//! Report command implementation

use super::{Command, CommandContext};
use crate::report::format_report;
use anyhow::Result;
use async_trait::async_trait;

/// Print branch and change status of the selected repositories
pub struct ReportCommand;

#[async_trait]
impl Command for ReportCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let repoman = context.repoman()?;
        let rows = repoman.report(&context.options).await;
        println!("{}", format_report(&rows));
        Ok(())
    }
}
