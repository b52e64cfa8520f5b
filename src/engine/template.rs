//! Command template rendering
//!
//! Templates are plain text with triple-brace placeholders such as
//! `{{{name}}}`. Only the keys of [`Placeholder`] are substituted; anything
//! else between braces is copied through unchanged.

use crate::config::Repository;
use std::path::Path;

const OPEN: &str = "{{{";
const CLOSE: &str = "}}}";

/// Recognized placeholder keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Name,
    Url,
    Workspace,
    PathSeparator,
}

impl Placeholder {
    pub const ALL: [Placeholder; 4] = [
        Placeholder::Name,
        Placeholder::Url,
        Placeholder::Workspace,
        Placeholder::PathSeparator,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Placeholder::Name => "name",
            Placeholder::Url => "url",
            Placeholder::Workspace => "workspace",
            Placeholder::PathSeparator => "pathseparator",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// The token as it appears in templates
    pub fn token(&self) -> String {
        format!("{OPEN}{}{CLOSE}", self.key())
    }
}

/// Values substituted into a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParams {
    pub name: String,
    pub url: String,
    pub workspace: String,
    pub path_separator: String,
}

impl TemplateParams {
    pub fn for_repository(repo: &Repository, workspace: &Path) -> Self {
        Self {
            name: repo.name.clone(),
            url: repo.url.clone(),
            workspace: workspace.display().to_string(),
            path_separator: std::path::MAIN_SEPARATOR.to_string(),
        }
    }

    pub fn value(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::Name => &self.name,
            Placeholder::Url => &self.url,
            Placeholder::Workspace => &self.workspace,
            Placeholder::PathSeparator => &self.path_separator,
        }
    }
}

/// Substitute every recognized placeholder in `template`
///
/// The template is scanned once from left to right, so braces inside a
/// substituted value are never expanded again.
pub fn render(template: &str, params: &TemplateParams) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        let Some(end) = after_open.find(CLOSE) else {
            rest = &rest[start..];
            break;
        };

        match Placeholder::from_key(after_open[..end].trim()) {
            Some(placeholder) => {
                output.push_str(params.value(placeholder));
                rest = &after_open[end + CLOSE.len()..];
            }
            None => {
                // keep the opening braces and resume right after them
                output.push_str(OPEN);
                rest = after_open;
            }
        }
    }

    output.push_str(rest);
    output
}
