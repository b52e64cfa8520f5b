//! Local directory configuration generator

use super::Generator;
use crate::config::{RepositoryBuilder, Repository, ScmType};
use anyhow::{Context, Result};
use async_trait::async_trait;
use ini::Ini;
use std::path::{Path, PathBuf};
use tokio::process::Command;

const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// Working copies found directly below a directory
///
/// Git clones are recognised by the `origin` remote in `.git/config`,
/// subversion checkouts by asking `svn info` for the repository root.
pub struct LocalGenerator {
    dir: PathBuf,
}

impl LocalGenerator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn candidates(&self) -> Result<Vec<(String, PathBuf)>> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read {}", self.dir.display()))?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_str()) {
                continue;
            }
            if entry.file_type()?.is_dir() {
                candidates.push((name, entry.path()));
            }
        }
        candidates.sort();
        Ok(candidates)
    }
}

#[async_trait]
impl Generator for LocalGenerator {
    async fn generate(&self) -> Result<Vec<Repository>> {
        let mut repositories = Vec::new();

        for (name, path) in self.candidates()? {
            let git_config = path.join(".git").join("config");
            if git_config.is_file() {
                match git_origin_url(&git_config) {
                    Ok(Some(url)) => repositories.push(
                        RepositoryBuilder::new(name, url)
                            .with_type(ScmType::Git)
                            .build(),
                    ),
                    Ok(None) => tracing::info!("{name} has no origin remote, skipping"),
                    Err(e) => tracing::warn!("skipping {name}: {e:#}"),
                }
            } else if path.join(".svn").is_dir() {
                match svn_repository_root(&path).await {
                    Ok(url) => repositories.push(
                        RepositoryBuilder::new(name, url)
                            .with_type(ScmType::Svn)
                            .build(),
                    ),
                    Err(e) => tracing::warn!("skipping {name}: {e:#}"),
                }
            }
        }

        Ok(repositories)
    }
}

/// `url` of `[remote "origin"]` in a git config file
fn git_origin_url(git_config: &Path) -> Result<Option<String>> {
    let config = Ini::load_from_file(git_config)
        .with_context(|| format!("Failed to parse {}", git_config.display()))?;
    // the quotes around the remote name may or may not survive parsing
    let origin = config
        .sections()
        .flatten()
        .find(|name| name.replace('"', "") == "remote origin");
    Ok(origin
        .and_then(|name| config.section(Some(name)))
        .and_then(|section| section.get("url"))
        .map(str::to_string))
}

async fn svn_repository_root(path: &Path) -> Result<String> {
    let output = Command::new("svn")
        .args(["info", "--show-item", "repos-root-url"])
        .arg(path)
        .output()
        .await
        .context("Failed to run svn info")?;

    if !output.status.success() {
        anyhow::bail!(
            "svn info failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
