//! Rules every configured repository must satisfy
//!
//! Loading, generation and `add` all go through these checks, so a config file
//! that loads is one the orchestrator can act on.

use crate::config::Repository;
use crate::error::RepomanError;
use std::collections::HashSet;
use std::fmt;

/// A broken rule, naming the offending entry
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyRepositoryName,
    /// Name would not be a single directory below the workspace
    InvalidRepositoryName(String),
    EmptyRepositoryUrl(String),
    DuplicateRepositoryName(String),
    /// A `--tags` item that is blank
    EmptyTagFilter(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRepositoryName => f.write_str("Repository name cannot be empty"),
            Self::InvalidRepositoryName(name) => {
                write!(f, "Repository name '{name}' must be a single directory name")
            }
            Self::EmptyRepositoryUrl(name) => write!(f, "Repository '{name}' URL cannot be empty"),
            Self::DuplicateRepositoryName(name) => {
                write!(f, "Repository '{name}' is configured more than once")
            }
            Self::EmptyTagFilter(tag) => write!(f, "Tag filter cannot be empty: '{tag}'"),
        }
    }
}

/// Check a whole configuration, reporting every problem rather than the first
pub fn validate_repositories(repositories: &[Repository]) -> Result<(), Vec<ValidationError>> {
    let mut seen = HashSet::new();
    let duplicates = repositories
        .iter()
        .filter(|repo| !seen.insert(repo.name.as_str()))
        .map(|repo| ValidationError::DuplicateRepositoryName(repo.name.clone()));

    let per_entry = repositories
        .iter()
        .flat_map(|repo| validate_repository(repo).err().unwrap_or_default());

    into_result(duplicates.chain(per_entry).collect())
}

/// Check one entry on its own
pub fn validate_repository(repository: &Repository) -> Result<(), Vec<ValidationError>> {
    let mut problems = Vec::new();

    let name = repository.name.as_str();
    if name.is_empty() {
        problems.push(ValidationError::EmptyRepositoryName);
    } else if matches!(name, "." | "..") || name.contains(['/', '\\']) {
        problems.push(ValidationError::InvalidRepositoryName(name.to_string()));
    }

    if repository.url.trim().is_empty() {
        problems.push(ValidationError::EmptyRepositoryUrl(name.to_string()));
    }

    into_result(problems)
}

/// Blank tags would select nothing, so they are rejected up front
pub fn validate_tag_filters(tags: &[String]) -> Result<(), ValidationError> {
    match tags.iter().find(|tag| tag.trim().is_empty()) {
        Some(tag) => Err(ValidationError::EmptyTagFilter(tag.clone())),
        None => Ok(()),
    }
}

/// Fold a list of problems into the single error `Config` reports
pub fn validation_errors_to_error(errors: Vec<ValidationError>) -> RepomanError {
    let joined = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    RepomanError::InvalidConfig(joined)
}

fn into_result(problems: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}
