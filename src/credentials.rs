//! Stored GitHub credentials

use crate::constants::credentials::{TOKEN_FILE, TOKEN_KEY};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Reads and stores the GitHub token used by the generator
pub trait CredentialProvider: Send + Sync {
    fn read_token(&self) -> Result<String>;
    fn store_token(&self, token: &str) -> Result<()>;
}

/// Token kept as `{"githubAuthToken": "..."}` in a JSON dotfile
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.repomanrc`
    pub fn in_home_dir() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine the home directory")?;
        Ok(Self::new(home.join(TOKEN_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }
}

impl CredentialProvider for FileCredentialStore {
    fn read_token(&self) -> Result<String> {
        self.read_entries()?
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .with_context(|| format!("No {} in {}", TOKEN_KEY, self.path.display()))
    }

    /// Write the token, keeping any other keys already in the file
    fn store_token(&self, token: &str) -> Result<()> {
        let mut entries = if self.path.exists() {
            self.read_entries()?
        } else {
            Map::new()
        };
        entries.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));

        let mut json = serde_json::to_string_pretty(&Value::Object(entries))?;
        json.push('\n');
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}
