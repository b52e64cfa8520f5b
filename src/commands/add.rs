//! Add command implementation

use super::validators::AddArgs;
use super::{Command, CommandContext};
use crate::config::RepositoryBuilder;
use anyhow::Result;
use async_trait::async_trait;
use colored::*;

/// Add one repository to the configuration and check it out
pub struct AddCommand {
    pub args: AddArgs,
    pub tags: Vec<String>,
}

#[async_trait]
impl Command for AddCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let AddArgs {
            scm_type,
            name,
            url,
            assumed_type,
            derived_name,
        } = &self.args;

        if *assumed_type {
            println!("No --type specified, will assume \"git\".");
        }
        if *derived_name {
            println!(
                "You have given no --name, I have tried to figure it out from the given --url and arrived at \"{name}\"."
            );
        }

        let repo = RepositoryBuilder::new(name.clone(), url.clone())
            .with_type(*scm_type)
            .with_tags(self.tags.clone())
            .build();

        let mut repoman = context.empty_repoman();
        repoman.add(&context.config_file, repo).await?;

        println!("{}", format!("{name}: {url} has been added.").green());
        Ok(())
    }
}
