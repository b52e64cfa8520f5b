//! Repoman - run version control commands across a workspace of git and
//! subversion repositories described by one config file

pub mod commands;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod generator;
pub mod report;
pub mod runner;
pub mod utils;

pub type Result<T> = anyhow::Result<T>;

// Re-export commonly used types
pub use commands::{Command, CommandContext};
pub use config::{Config, Repository, ScmTable, ScmType};
pub use engine::{ExecutionOptions, Repoman, Selector};
pub use error::RepomanError;
