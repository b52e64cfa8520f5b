//! Config command implementation

use super::{Command, CommandContext};
use crate::config::Config;
use crate::constants::config::SAMPLE_CONFIG;
use crate::credentials::FileCredentialStore;
use crate::generator::{BitbucketGenerator, Generator, GitHubAuth, GitHubGenerator, LocalGenerator};
use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::*;
use std::path::PathBuf;

/// Where the configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Bitbucket {
        user: String,
        pass: String,
    },
    GitHub {
        users: Vec<String>,
        orgs: Vec<String>,
        auth_user: Option<String>,
        auth_pass: Option<String>,
        use_ssh: bool,
    },
    Local {
        dir: PathBuf,
    },
    /// The bundled example configuration
    Sample,
}

/// Create or update the configuration file
pub struct ConfigCommand {
    pub source: ConfigSource,
    /// Drop entries the generator did not return
    pub remove_extraneous: bool,
}

impl ConfigCommand {
    fn generator(&self) -> Result<Option<Box<dyn Generator>>> {
        let generator: Box<dyn Generator> = match &self.source {
            ConfigSource::Bitbucket { user, pass } => {
                Box::new(BitbucketGenerator::new(user.clone(), pass.clone())?)
            }
            ConfigSource::GitHub {
                users,
                orgs,
                auth_user,
                auth_pass,
                use_ssh,
            } => {
                let auth = match FileCredentialStore::in_home_dir() {
                    Ok(store) => GitHubAuth::resolve(auth_user.clone(), auth_pass.clone(), &store),
                    Err(_) => match (auth_user, auth_pass) {
                        (Some(user), Some(pass)) => GitHubAuth::Basic {
                            user: user.clone(),
                            pass: pass.clone(),
                        },
                        _ => GitHubAuth::Anonymous,
                    },
                };
                Box::new(GitHubGenerator::new(
                    users.clone(),
                    orgs.clone(),
                    *use_ssh,
                    auth,
                )?)
            }
            ConfigSource::Local { dir } => Box::new(LocalGenerator::new(dir.clone())),
            ConfigSource::Sample => return Ok(None),
        };
        Ok(Some(generator))
    }
}

#[async_trait]
impl Command for ConfigCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let path = &context.config_file;

        let Some(generator) = self.generator()? else {
            if path.exists() {
                println!(
                    "{}",
                    format!("{} already exists, leaving it as is", path.display()).yellow()
                );
                return Ok(());
            }
            println!("Creating sample configuration file: {}", path.display());
            std::fs::write(path, SAMPLE_CONFIG)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            return Ok(());
        };

        let generated = generator.generate().await?;
        let count = generated.len();

        let mut config = if path.exists() {
            Config::load(path)?
        } else {
            Config::new()
        };
        config.merge(generated, self.remove_extraneous);
        config.save(path)?;

        println!(
            "{}",
            format!(
                "Wrote {} repositories to {} ({} generated)",
                config.repositories.len(),
                path.display(),
                count
            )
            .green()
        );
        Ok(())
    }
}
