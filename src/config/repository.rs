//! Repository descriptor

use crate::engine::resolver;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Source control system of a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScmType {
    Git,
    Svn,
}

impl ScmType {
    pub const ALL: [ScmType; 2] = [ScmType::Git, ScmType::Svn];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScmType::Git => "git",
            ScmType::Svn => "svn",
        }
    }
}

impl fmt::Display for ScmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScmType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "git" => Ok(ScmType::Git),
            "svn" => Ok(ScmType::Svn),
            other => Err(anyhow::anyhow!("Unknown --type \"{}\".", other)),
        }
    }
}

/// One configured repository
///
/// The name is the key of the configuration mapping and the directory of the
/// working copy relative to the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub url: String,
    pub scm_type: Option<ScmType>,
    pub tags: Vec<String>,
}

impl Repository {
    pub fn new(name: String, url: String) -> Self {
        Self {
            name,
            url,
            scm_type: None,
            tags: Vec::new(),
        }
    }

    /// Declared type, or the one inferred from the url
    pub fn resolved_type(&self) -> ScmType {
        resolver::resolve_type(self)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| self.has_tag(tag))
    }

    /// Add a tag, ignoring duplicates
    pub fn add_tag(&mut self, tag: String) {
        if !self.has_tag(&tag) {
            self.tags.push(tag);
        }
    }

    /// Working copy location inside the workspace
    pub fn target_dir(&self, workspace: &Path) -> PathBuf {
        workspace.join(&self.name)
    }

    pub(crate) fn from_entry(name: String, entry: RepositoryEntry) -> Self {
        let mut repo = Self {
            name,
            url: entry.url,
            scm_type: entry.scm_type,
            tags: Vec::new(),
        };
        for tag in entry.tags {
            repo.add_tag(tag);
        }
        repo
    }

    pub(crate) fn to_entry(&self) -> RepositoryEntry {
        RepositoryEntry {
            url: self.url.clone(),
            scm_type: self.scm_type,
            tags: self.tags.clone(),
        }
    }
}

/// Value stored under a repository name in `.repoman.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RepositoryEntry {
    pub url: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub scm_type: Option<ScmType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}
