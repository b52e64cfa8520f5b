//! GitHub configuration generator

use super::{Generator, http_client};
use crate::config::Repository;
use crate::constants::github::{API_BASE, PER_PAGE, TOKEN_ENV};
use crate::credentials::CredentialProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::header::{ACCEPT, HeaderMap, LINK};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

/// How requests to the GitHub API authenticate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubAuth {
    Basic { user: String, pass: String },
    Token(String),
    Anonymous,
}

impl GitHubAuth {
    /// Pick credentials in order: explicit user and password, the
    /// `GITHUB_TOKEN` environment variable, the stored token, none
    pub fn resolve(
        user: Option<String>,
        pass: Option<String>,
        credentials: &dyn CredentialProvider,
    ) -> Self {
        if let (Some(user), Some(pass)) = (user, pass) {
            return GitHubAuth::Basic { user, pass };
        }
        if let Ok(token) = std::env::var(TOKEN_ENV)
            && !token.trim().is_empty()
        {
            return GitHubAuth::Token(token);
        }
        match credentials.read_token() {
            Ok(token) => GitHubAuth::Token(token),
            Err(e) => {
                tracing::debug!("continuing without GitHub authentication: {e:#}");
                GitHubAuth::Anonymous
            }
        }
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            GitHubAuth::Basic { user, pass } => request.basic_auth(user, Some(pass)),
            GitHubAuth::Token(token) => request.bearer_auth(token),
            GitHubAuth::Anonymous => request,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    name: String,
    clone_url: String,
    #[serde(default)]
    ssh_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

/// Repositories of GitHub users and organisations
pub struct GitHubGenerator {
    client: Client,
    api_base: String,
    auth: GitHubAuth,
    users: Vec<String>,
    orgs: Vec<String>,
    use_ssh: bool,
}

impl GitHubGenerator {
    pub fn new(users: Vec<String>, orgs: Vec<String>, use_ssh: bool, auth: GitHubAuth) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            api_base: API_BASE.to_string(),
            auth,
            users,
            orgs,
            use_ssh,
        })
    }

    /// Point the generator at another API root, e.g. GitHub Enterprise
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github.v3+json");
        let response = self
            .auth
            .apply(request)
            .send()
            .await
            .with_context(|| format!("Failed to reach {url}"))?;

        log_rate_limit(response.headers());

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Err(anyhow::anyhow!(
                "GitHub request to {} failed ({}): {}",
                url,
                status,
                error_text
            ))
        }
    }

    /// Follow `Link: rel="next"` until the last page
    async fn list_repos(&self, first_page: String) -> Result<Vec<GitHubRepo>> {
        let mut repos = Vec::new();
        let mut next = Some(first_page);
        while let Some(url) = next {
            let response = self.get(&url).await?;
            next = response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_link);
            let page: Vec<GitHubRepo> = response
                .json()
                .await
                .with_context(|| format!("Unexpected response from {url}"))?;
            repos.extend(page);
        }
        Ok(repos)
    }

    /// Login of the authenticated user
    pub async fn authenticated_user(&self) -> Result<String> {
        let url = format!("{}/user", self.api_base);
        let user: GitHubUser = self.get(&url).await?.json().await?;
        Ok(user.login)
    }

    fn to_repository(&self, repo: GitHubRepo) -> Repository {
        let url = match repo.ssh_url {
            Some(ssh_url) if self.use_ssh => ssh_url,
            _ => repo.clone_url,
        };
        Repository::new(repo.name, url)
    }
}

#[async_trait]
impl Generator for GitHubGenerator {
    async fn generate(&self) -> Result<Vec<Repository>> {
        let pages = self
            .users
            .iter()
            .map(|user| format!("{}/users/{}/repos", self.api_base, user))
            .chain(
                self.orgs
                    .iter()
                    .map(|org| format!("{}/orgs/{}/repos", self.api_base, org)),
            )
            .map(|url| self.list_repos(format!("{url}?per_page={PER_PAGE}&page=1")));

        let mut repositories: Vec<Repository> = Vec::new();
        for repo in try_join_all(pages).await?.into_iter().flatten() {
            let repo = self.to_repository(repo);
            match repositories.iter_mut().find(|r| r.name == repo.name) {
                Some(existing) => *existing = repo,
                None => repositories.push(repo),
            }
        }
        Ok(repositories)
    }
}

fn log_rate_limit(headers: &HeaderMap) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("?")
            .to_string()
    };
    tracing::info!(
        "Remaining GitHub API usage: {}/{}",
        header("x-ratelimit-remaining"),
        header("x-ratelimit-limit")
    );
}

/// Target of the `rel="next"` entry of a `Link` header
fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| param.trim() == "rel=\"next\"");
        if is_next {
            target
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .map(str::to_string)
        } else {
            None
        }
    })
}
