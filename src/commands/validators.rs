//! Command argument validation utilities
//!
//! Checks on argument combinations that clap cannot express on its own.

use crate::config::ScmType;
use anyhow::{Result, anyhow};
use regex::Regex;
use std::sync::LazyLock;

static GIT_URL_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^.*/(.*)\.git").ok());

/// Validation errors for command arguments
#[derive(Debug, PartialEq)]
pub enum CommandValidationError {
    /// Arguments that only work together were not all provided
    MissingCompanion { given: String, missing: String },
    /// Required argument was not provided
    MissingRequired { argument: String, hint: String },
    /// Invalid argument value
    InvalidValue {
        argument: String,
        value: String,
        reason: String,
    },
}

impl std::fmt::Display for CommandValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandValidationError::MissingCompanion { given, missing } => {
                write!(f, "{} also requires {}", given, missing)
            }
            CommandValidationError::MissingRequired { argument, hint } => {
                if hint.is_empty() {
                    write!(f, "You need to provide the mandatory parameter {}.", argument)
                } else {
                    write!(
                        f,
                        "You need to provide the mandatory parameter {}. {}",
                        argument, hint
                    )
                }
            }
            CommandValidationError::InvalidValue {
                argument,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{}' for {}: {}", value, argument, reason)
            }
        }
    }
}

impl std::error::Error for CommandValidationError {}

/// Convert validation error to anyhow::Error
pub fn validation_error_to_anyhow(error: CommandValidationError) -> anyhow::Error {
    anyhow!(error.to_string())
}

/// Name of a git repository taken from a `.../<name>.git` url
pub fn repository_name_from_url(url: &str) -> Option<String> {
    GIT_URL_NAME
        .as_ref()?
        .captures(url)?
        .get(1)
        .map(|m| m.as_str().to_string())
        .filter(|name| !name.is_empty())
}

/// Resolved arguments of `add`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    pub scm_type: ScmType,
    pub name: String,
    pub url: String,
    /// Whether the type or the name were filled in rather than given
    pub assumed_type: bool,
    pub derived_name: bool,
}

/// Validate `add` arguments
///
/// The type defaults to git. A git repository without `--name` is named after
/// the last url segment without its `.git` suffix.
pub fn validate_add_args(
    scm_type: Option<&str>,
    name: Option<&str>,
    url: Option<&str>,
) -> Result<AddArgs> {
    let (scm_type, assumed_type) = match scm_type {
        Some(value) => (value.parse::<ScmType>()?, false),
        None => (ScmType::Git, true),
    };

    let url = match url.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => url.to_string(),
        None => {
            return Err(validation_error_to_anyhow(
                CommandValidationError::MissingRequired {
                    argument: "--url".to_string(),
                    hint: String::new(),
                },
            ));
        }
    };

    let given_name = name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    let (name, derived_name) = match given_name {
        Some(name) => (name, false),
        None => match (scm_type, repository_name_from_url(&url)) {
            (ScmType::Git, Some(name)) => (name, true),
            _ => {
                return Err(validation_error_to_anyhow(
                    CommandValidationError::MissingRequired {
                        argument: "--name".to_string(),
                        hint: "It could not be figured out from the given --url.".to_string(),
                    },
                ));
            }
        },
    };

    Ok(AddArgs {
        scm_type,
        name,
        url,
        assumed_type,
        derived_name,
    })
}

/// Validate that user and password flags come in pairs
pub fn validate_credential_pair(
    user_flag: &str,
    user: &Option<String>,
    pass_flag: &str,
    pass: &Option<String>,
) -> Result<()> {
    match (user, pass) {
        (Some(_), None) => Err(validation_error_to_anyhow(
            CommandValidationError::MissingCompanion {
                given: user_flag.to_string(),
                missing: pass_flag.to_string(),
            },
        )),
        (None, Some(_)) => Err(validation_error_to_anyhow(
            CommandValidationError::MissingCompanion {
                given: pass_flag.to_string(),
                missing: user_flag.to_string(),
            },
        )),
        _ => Ok(()),
    }
}

/// Split a comma separated flag value, dropping empty items
pub fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse the comma separated `--tags` value
pub fn parse_tags(value: Option<&str>) -> Result<Vec<String>> {
    let tags: Vec<String> = match value {
        Some(value) => value.split(',').map(|tag| tag.trim().to_string()).collect(),
        None => Vec::new(),
    };
    validate_tag_filters(&tags)?;
    Ok(tags)
}

/// Validate tag arguments
///
/// Ensures tag filters are not empty when provided
pub fn validate_tag_filters(tags: &[String]) -> Result<()> {
    crate::utils::validators::validate_tag_filters(tags).map_err(|e| {
        validation_error_to_anyhow(CommandValidationError::InvalidValue {
            argument: "--tags".to_string(),
            value: tags.join(","),
            reason: e.to_string(),
        })
    })
}
