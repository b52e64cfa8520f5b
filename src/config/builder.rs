//! Fluent construction of [`Repository`] entries

use super::{Repository, ScmType};

/// Assembles a configuration entry for `add` and the generators
pub struct RepositoryBuilder {
    repo: Repository,
    tags: Vec<String>,
}

impl RepositoryBuilder {
    pub fn new(name: String, url: String) -> Self {
        Self {
            repo: Repository::new(name, url),
            tags: Vec::new(),
        }
    }

    /// Declare the repository type instead of inferring it from the url
    pub fn with_type(mut self, scm_type: ScmType) -> Self {
        self.repo.scm_type = Some(scm_type);
        self
    }

    /// Replace the tags given so far
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Finish the entry; repeated tags are kept once
    pub fn build(self) -> Repository {
        let mut repo = self.repo;
        for tag in self.tags {
            repo.add_tag(tag);
        }
        repo
    }
}
