//! Configuration file loading and saving

use super::Repository;
use super::repository::RepositoryEntry;
use crate::error::RepomanError;
use crate::utils::validators;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};

/// The repositories of a workspace, in the order they appear in the file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub repositories: Vec<Repository>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the configuration file
    ///
    /// A path that exists is used as-is. A relative path that does not exist
    /// is looked up again in the user's home directory.
    pub fn locate(path: &Path) -> Option<PathBuf> {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        if path.is_relative() {
            let home_candidate = dirs::home_dir()?.join(path);
            if home_candidate.exists() {
                return Some(home_candidate);
            }
        }
        None
    }

    /// Load configuration from a file, see [`Config::locate`]
    pub fn load(path: &Path) -> Result<Self> {
        let resolved =
            Self::locate(path).ok_or_else(|| RepomanError::ConfigNotFound(path.to_path_buf()))?;
        tracing::debug!(path = %resolved.display(), "loading config");

        let content = std::fs::read_to_string(&resolved)
            .with_context(|| format!("Failed to read config file {}", resolved.display()))?;
        Ok(Self::from_json(&content, &resolved)?)
    }

    /// Parse the JSON mapping of name to repository details
    pub fn from_json(content: &str, path: &Path) -> Result<Self, RepomanError> {
        let parse_error = |source| RepomanError::ConfigParse {
            path: path.to_path_buf(),
            source,
        };

        let entries: Map<String, Value> = serde_json::from_str(content).map_err(parse_error)?;
        let mut repositories = Vec::with_capacity(entries.len());
        for (name, value) in entries {
            let entry: RepositoryEntry = serde_json::from_value(value).map_err(parse_error)?;
            repositories.push(Repository::from_entry(name, entry));
        }

        validators::validate_repositories(&repositories)
            .map_err(validators::validation_errors_to_error)?;

        Ok(Self { repositories })
    }

    /// Render the configuration as 2-space indented JSON
    pub fn to_json(&self) -> Result<String> {
        let mut entries = Map::new();
        for repo in &self.repositories {
            entries.insert(repo.name.clone(), serde_json::to_value(repo.to_entry())?);
        }
        let mut json = serde_json::to_string_pretty(&Value::Object(entries))?;
        json.push('\n');
        Ok(json)
    }

    /// Save configuration to a file
    ///
    /// The new content goes to a temporary file next to the target which then
    /// replaces it, so readers never observe a half-written file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut file = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        file.write_all(json.as_bytes())?;
        file.persist(path)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        tracing::debug!(path = %path.display(), count = self.repositories.len(), "saved config");
        Ok(())
    }

    /// Get repository by name
    pub fn get_repository(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|repo| repo.name == name)
    }

    /// Names of all repositories, in configuration order
    pub fn names(&self) -> Vec<&str> {
        self.repositories
            .iter()
            .map(|repo| repo.name.as_str())
            .collect()
    }

    /// Add a repository, refusing to overwrite an existing entry
    pub fn add_repository(&mut self, repo: Repository) -> Result<(), RepomanError> {
        if self.get_repository(&repo.name).is_some() {
            return Err(RepomanError::DuplicateRepository(repo.name));
        }

        validators::validate_repository(&repo).map_err(validators::validation_errors_to_error)?;

        self.repositories.push(repo);
        Ok(())
    }

    /// Remove a repository, returning the removed entry
    pub fn remove_repository(&mut self, name: &str) -> Option<Repository> {
        let index = self.repositories.iter().position(|repo| repo.name == name)?;
        Some(self.repositories.remove(index))
    }

    /// Merge generated repositories into this configuration
    ///
    /// Generated entries replace existing entries of the same name in place and
    /// new ones are appended. With `remove_extraneous`, existing entries the
    /// generator did not return are dropped.
    pub fn merge(&mut self, generated: Vec<Repository>, remove_extraneous: bool) {
        if remove_extraneous {
            self.repositories
                .retain(|existing| generated.iter().any(|repo| repo.name == existing.name));
        }

        for repo in generated {
            match self
                .repositories
                .iter_mut()
                .find(|existing| existing.name == repo.name)
            {
                Some(existing) => *existing = repo,
                None => self.repositories.push(repo),
            }
        }
    }

    /// Add one repository to the file at `path`, creating the file if needed
    ///
    /// The file is left untouched when the name is already configured.
    pub fn add_to_file(path: &Path, repo: Repository) -> Result<()> {
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Self::new()
        };
        config.add_repository(repo)?;
        config.save(path)
    }

    /// Remove one repository from the file at `path`
    ///
    /// The file is left untouched when the name is not configured.
    pub fn remove_from_file(path: &Path, name: &str) -> Result<Repository> {
        if !path.exists() {
            return Err(RepomanError::ConfigNotFound(path.to_path_buf()).into());
        }
        let mut config = Self::load(path)?;
        let removed = config
            .remove_repository(name)
            .ok_or_else(|| RepomanError::RepositoryNotFound(name.to_string()))?;
        config.save(path)?;
        Ok(removed)
    }
}
