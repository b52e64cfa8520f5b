//! Repository selection by tags and regex

use crate::config::Repository;
use crate::error::RepomanError;
use regex::Regex;

/// Options shared by every repository-set operation
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Stop at the first failing repository
    pub fail_fast: bool,
    /// Echo rendered commands before running them
    pub verbose: bool,
    pub selector: Selector,
}

impl ExecutionOptions {
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            ..Self::default()
        }
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Tag and regex filter
///
/// Empty tags and no regex select every repository.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    tags: Vec<String>,
    regex: Option<Regex>,
}

impl Selector {
    /// Build a selector, compiling the regex up front
    pub fn new(tags: Vec<String>, regex: Option<&str>) -> Result<Self, RepomanError> {
        let regex = regex
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| RepomanError::InvalidRegex {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()?;
        Ok(Self { tags, regex })
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    /// Whether `repo` passes both the tag and the regex filter
    pub fn selected(&self, repo: &Repository) -> bool {
        self.matches_tags(repo) && self.matches_regex(repo)
    }

    /// At least one tag in common, untagged repositories never match
    fn matches_tags(&self, repo: &Repository) -> bool {
        self.tags.is_empty() || repo.has_any_tag(&self.tags)
    }

    fn matches_regex(&self, repo: &Repository) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(&repo.name) || regex.is_match(&repo.url),
            None => true,
        }
    }

    /// Selected repositories, in their original order
    pub fn filter<'a>(&self, repositories: &'a [Repository]) -> Vec<&'a Repository> {
        repositories
            .iter()
            .filter(|repo| self.selected(repo))
            .collect()
    }
}
