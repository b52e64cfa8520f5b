//! SCM action tables
//!
//! A table maps an SCM type to its action templates (`init`, `get`, ...) and to
//! an optional group of report probes. Two tables are compiled in, one for
//! POSIX shells and one for the Windows command interpreter.

use super::ScmType;
use crate::constants::scm::{CHANGE_DIR_COMMAND, PLATFORM_WIN32, SCMS_POSIX, SCMS_WIN32};
use crate::error::RepomanError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Probe templates used by `report`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCommands {
    pub get_branch_name: String,
    pub has_uncommitted: String,
    pub has_unpushed: String,
}

impl ReportCommands {
    fn prefixed(&self, prefix: &str) -> Self {
        Self {
            get_branch_name: format!("{prefix}{}", self.get_branch_name),
            has_uncommitted: format!("{prefix}{}", self.has_uncommitted),
            has_unpushed: format!("{prefix}{}", self.has_unpushed),
        }
    }
}

/// Action templates of one SCM type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScmActions {
    #[serde(default)]
    pub report: Option<ReportCommands>,
    #[serde(flatten)]
    pub actions: HashMap<String, String>,
}

/// SCM type name to action templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ScmTable {
    scms: HashMap<String, ScmActions>,
}

impl ScmTable {
    /// Built-in table for a platform name such as `linux` or `win32`
    pub fn for_platform(platform: &str) -> Result<Self, RepomanError> {
        if platform == PLATFORM_WIN32 {
            Self::from_json(SCMS_WIN32)
        } else {
            Self::from_json(SCMS_POSIX)
        }
    }

    /// Platform name of the running host, in the same vocabulary as `--platform`
    pub fn host_platform() -> &'static str {
        if cfg!(windows) {
            PLATFORM_WIN32
        } else {
            std::env::consts::OS
        }
    }

    pub fn from_json(content: &str) -> Result<Self, RepomanError> {
        serde_json::from_str(content).map_err(RepomanError::ScmTableParse)
    }

    /// Load a replacement table from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read SCM table {}", path.display()))?;
        Ok(Self::from_json(&content)?)
    }

    pub fn actions(&self, scm: ScmType) -> Option<&ScmActions> {
        self.scms.get(scm.as_str())
    }

    /// Configured template for an action, if any
    pub fn action(&self, scm: ScmType, action: &str) -> Option<&str> {
        self.actions(scm)?.actions.get(action).map(String::as_str)
    }

    /// Template to run `action` against a repository of type `scm`
    ///
    /// Actions missing from the table are treated as raw shell commands run
    /// inside the repository directory.
    pub fn lookup_command(&self, scm: ScmType, action: &str) -> String {
        match self.action(scm, action) {
            Some(template) => template.to_string(),
            None => format!("{CHANGE_DIR_COMMAND}{action}"),
        }
    }

    /// Like [`ScmTable::lookup_command`] but without the raw command fallback
    pub fn require_action(&self, scm: ScmType, action: &str) -> Result<&str, RepomanError> {
        self.action(scm, action)
            .ok_or_else(|| RepomanError::MissingAction {
                scm: scm.to_string(),
                action: action.to_string(),
            })
    }

    /// Report probes, each prefixed with the change to the repository directory
    pub fn report_commands(&self, scm: ScmType) -> Option<ReportCommands> {
        self.actions(scm)?
            .report
            .as_ref()
            .map(|probes| probes.prefixed(CHANGE_DIR_COMMAND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_parse() {
        for platform in ["linux", "darwin", PLATFORM_WIN32] {
            let table = ScmTable::for_platform(platform).unwrap();
            for scm in ScmType::ALL {
                for action in ["init", "get", "changes", "save", "undo", "delete"] {
                    assert!(
                        table.action(scm, action).is_some(),
                        "{platform}: {scm} has no {action}"
                    );
                }
                assert!(table.report_commands(scm).is_some());
            }
        }
    }

    #[test]
    fn test_win32_table_uses_cmd_syntax() {
        let table = ScmTable::for_platform(PLATFORM_WIN32).unwrap();
        assert!(table.action(ScmType::Git, "get").unwrap().starts_with("cd /d"));
    }

    #[test]
    fn test_lookup_command_prefers_table_entry() {
        let table = ScmTable::from_json(r#"{"git": {"get": "git pull"}}"#).unwrap();
        assert_eq!(table.lookup_command(ScmType::Git, "get"), "git pull");
    }

    #[test]
    fn test_lookup_command_falls_back_to_raw_command() {
        let table = ScmTable::from_json(r#"{"git": {"get": "git pull"}}"#).unwrap();
        assert_eq!(
            table.lookup_command(ScmType::Git, "make build"),
            "cd \"{{{workspace}}}{{{pathseparator}}}{{{name}}}\" && make build"
        );
        // unknown scm type behaves the same
        assert_eq!(
            table.lookup_command(ScmType::Svn, "ls"),
            "cd \"{{{workspace}}}{{{pathseparator}}}{{{name}}}\" && ls"
        );
    }

    #[test]
    fn test_require_action_reports_missing_template() {
        let table = ScmTable::from_json(r#"{"svn": {}}"#).unwrap();
        let err = table.require_action(ScmType::Svn, "init").unwrap_err();
        assert_eq!(
            err.to_string(),
            "No 'init' command configured for svn repositories"
        );
    }

    #[test]
    fn test_report_commands_are_prefixed() {
        let table = ScmTable::from_json(
            r#"{"git": {"report": {
                "getBranchName": "b",
                "hasUncommitted": "c",
                "hasUnpushed": "p"
            }}}"#,
        )
        .unwrap();
        let probes = table.report_commands(ScmType::Git).unwrap();
        assert_eq!(
            probes.get_branch_name,
            format!("{CHANGE_DIR_COMMAND}b")
        );
        assert_eq!(probes.has_unpushed, format!("{CHANGE_DIR_COMMAND}p"));
        assert!(table.report_commands(ScmType::Svn).is_none());
    }

    #[test]
    fn test_malformed_table_is_an_error() {
        let err = ScmTable::from_json(r#"{"git": {"get": 42}}"#).unwrap_err();
        assert!(matches!(err, RepomanError::ScmTableParse(_)));
    }
}
