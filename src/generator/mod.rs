//! Configuration generators
//!
//! A generator discovers repositories somewhere (a hosting service, a local
//! directory) and returns them as configuration entries. The `config` command
//! merges the result into the configuration file.

pub mod bitbucket;
pub mod github;
pub mod local;

use crate::config::Repository;
use anyhow::Result;
use async_trait::async_trait;

pub use bitbucket::BitbucketGenerator;
pub use github::{GitHubAuth, GitHubGenerator};
pub use local::LocalGenerator;

/// Source of generated repository entries
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self) -> Result<Vec<Repository>>;
}

/// Build a reqwest client with the shared timeout and user agent
///
/// Proxies are taken from the standard `HTTP(S)_PROXY` variables by reqwest.
pub(crate) fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(crate::constants::github::DEFAULT_USER_AGENT)
        .timeout(std::time::Duration::from_secs(
            crate::constants::github::TIMEOUT_SECS,
        ))
        .build()?)
}
