//! Domain errors
//!
//! Plumbing code returns `anyhow::Result`; the variants here are the failures
//! callers are expected to match on (duplicate names on `add`, missing entries
//! on `remove`, a fail-fast trip during `exec`, ...).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepomanError {
    /// No configuration file at the given path (nor in the home directory)
    #[error("Config file {} does not exist", .0.display())]
    ConfigNotFound(PathBuf),

    /// Configuration file is not valid JSON or does not match the schema
    #[error("Failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration parsed but breaks a rule (empty url, bad name, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// SCM action table is malformed
    #[error("Failed to parse SCM action table: {0}")]
    ScmTableParse(#[source] serde_json::Error),

    /// `add` was asked to overwrite an existing entry
    #[error("A configuration for {0} already exists, won't overwrite.")]
    DuplicateRepository(String),

    /// `remove` was asked to delete an entry that is not configured
    #[error(
        "There is no entry in the configuration file for {0}, so there is nothing to remove."
    )]
    RepositoryNotFound(String),

    /// The `--regex` selector does not compile
    #[error("Invalid regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A required action template is absent from the SCM table
    #[error("No '{action}' command configured for {scm} repositories")]
    MissingAction { scm: String, action: String },

    /// A repository command failed while running in fail-fast mode
    #[error("Command for {name} failed ({})", describe_exit(*.exit_code))]
    CommandFailed {
        name: String,
        exit_code: Option<i32>,
    },
}

fn describe_exit(exit_code: Option<i32>) -> String {
    match exit_code {
        Some(code) => format!(
            "exit code {} ({})",
            code,
            crate::utils::get_exit_code_description(code)
        ),
        None => "could not be started".to_string(),
    }
}
