//! Bitbucket configuration generator

use super::{Generator, http_client};
use crate::config::Repository;
use crate::constants::bitbucket::{API_BASE, PAGE_LEN};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Page {
    values: Vec<BitbucketRepo>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BitbucketRepo {
    slug: String,
    full_name: String,
    #[serde(default)]
    scm: Option<String>,
}

/// Repositories of a Bitbucket workspace
pub struct BitbucketGenerator {
    client: Client,
    api_base: String,
    user: String,
    pass: String,
}

impl BitbucketGenerator {
    pub fn new(user: String, pass: String) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            api_base: API_BASE.to_string(),
            user,
            pass,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_page(&self, url: &str) -> Result<Page> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.user, Some(&self.pass))
            .send()
            .await
            .with_context(|| format!("Failed to reach {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Bitbucket request to {} failed ({}): {}",
                url,
                status,
                error_text
            );
        }

        response
            .json()
            .await
            .with_context(|| format!("Unexpected response from {url}"))
    }
}

#[async_trait]
impl Generator for BitbucketGenerator {
    async fn generate(&self) -> Result<Vec<Repository>> {
        let mut repositories = Vec::new();
        let mut next = Some(format!(
            "{}/repositories/{}?pagelen={}",
            self.api_base, self.user, PAGE_LEN
        ));

        while let Some(url) = next {
            let page = self.fetch_page(&url).await?;
            next = page.next;

            for repo in page.values {
                match repo.scm.as_deref() {
                    None | Some("git") => repositories.push(Repository::new(
                        repo.slug,
                        format!("ssh://git@bitbucket.org/{}.git", repo.full_name),
                    )),
                    Some(scm) => {
                        eprintln!("{} scm is not supported, skipping {}", scm, repo.slug)
                    }
                }
            }
        }

        Ok(repositories)
    }
}
