//! Signin command implementation

use super::{Command, CommandContext};
use crate::credentials::{CredentialProvider, FileCredentialStore};
use crate::generator::{GitHubAuth, GitHubGenerator};
use anyhow::Result;
use async_trait::async_trait;
use colored::*;
use dialoguer::{Password, theme::ColorfulTheme};

/// Verify a GitHub personal access token and store it for the generator
pub struct SigninCommand {
    /// Token given on the command line, prompted for otherwise
    pub token: Option<String>,
    /// Override of the GitHub API root
    pub api_base: Option<String>,
}

#[async_trait]
impl Command for SigninCommand {
    async fn execute(&self, _context: &CommandContext) -> Result<()> {
        let token = match &self.token {
            Some(token) => token.clone(),
            None => Password::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter your GitHub personal access token")
                .interact()?,
        };

        let mut client = GitHubGenerator::new(
            Vec::new(),
            Vec::new(),
            false,
            GitHubAuth::Token(token.clone()),
        )?;
        if let Some(api_base) = &self.api_base {
            client = client.with_api_base(api_base.clone());
        }
        let login = client.authenticated_user().await?;

        let store = FileCredentialStore::in_home_dir()?;
        store.store_token(&token)?;

        println!(
            "{}",
            format!(
                "Signed in to GitHub as {login}, token saved to {}",
                store.path().display()
            )
            .green()
        );
        Ok(())
    }
}
