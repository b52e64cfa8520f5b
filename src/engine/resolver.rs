//! Repository type inference

use crate::config::{Repository, ScmType};

/// Url keywords per type; a later match overrides an earlier one
const KEYWORDS: [(ScmType, &[&str]); 2] = [
    (ScmType::Git, &["git"]),
    (ScmType::Svn, &["svn", "subversion"]),
];

/// Type of a repository: the declared one, else the last type whose keyword
/// appears in the url, else git
pub fn resolve_type(repo: &Repository) -> ScmType {
    if let Some(scm_type) = repo.scm_type {
        return scm_type;
    }

    KEYWORDS
        .iter()
        .rev()
        .find(|(_, keywords)| keywords.iter().any(|keyword| repo.url.contains(keyword)))
        .map(|(scm_type, _)| *scm_type)
        .unwrap_or(ScmType::Git)
}
