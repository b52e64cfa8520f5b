//! Base types and traits for the command pattern

use crate::config::{Config, ScmTable};
use crate::engine::{ExecutionOptions, Repoman};
use anyhow::Result;
use std::path::PathBuf;

/// Context passed to all commands containing shared configuration and options
#[derive(Clone)]
pub struct CommandContext {
    /// Path given to `--config-file`
    pub config_file: PathBuf,
    /// Directory holding the working copies
    pub workspace: PathBuf,
    /// Action table for the selected platform
    pub scms: ScmTable,
    /// Selection and failure policy from the global flags
    pub options: ExecutionOptions,
}

impl CommandContext {
    pub fn load_config(&self) -> Result<Config> {
        Config::load(&self.config_file)
    }

    /// Orchestrator over the configured repositories
    pub fn repoman(&self) -> Result<Repoman> {
        Ok(Repoman::from_config(
            self.load_config()?,
            self.scms.clone(),
            self.workspace.clone(),
        ))
    }

    /// Orchestrator that has not read the config file yet
    pub fn empty_repoman(&self) -> Repoman {
        Repoman::new(Vec::new(), self.scms.clone(), self.workspace.clone())
    }
}

/// Trait that all commands must implement
#[async_trait::async_trait]
pub trait Command {
    /// Execute the command with the given context
    async fn execute(&self, context: &CommandContext) -> Result<()>;
}
