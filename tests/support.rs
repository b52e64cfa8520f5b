//! Common test support utilities and fixtures
//!
//! Shared by the integration tests through `mod support;`.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use repoman::config::{Repository, RepositoryBuilder, ScmType};
use repoman::runner::{OutputMode, Shell, ShellOutput};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use tempfile::TempDir;

/// Config with one git and one svn repository
pub const TWO_REPOS: &str = r#"{
  "couchdb": {
    "type": "git",
    "url": "https://github.com/apache/couchdb.git",
    "tags": ["database", "apache"]
  },
  "httpd": {
    "type": "svn",
    "url": "http://svn.apache.org/repos/asf/httpd/httpd/trunk/",
    "tags": ["webserver", "apache"]
  }
}
"#;

/// Shell that records every command line and answers from scripted rules
///
/// The first rule whose pattern is a substring of the command decides the
/// output; unmatched commands succeed with no output.
#[derive(Default)]
pub struct RecordingShell {
    commands: Mutex<Vec<String>>,
    rules: Vec<(String, ShellOutput)>,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail commands containing `pattern` with `exit_code`
    pub fn fail_on(mut self, pattern: &str, exit_code: i32) -> Self {
        self.rules.push((
            pattern.to_string(),
            ShellOutput {
                exit_code: Some(exit_code),
                stdout: String::new(),
                stderr: format!("{pattern} failed\n"),
            },
        ));
        self
    }

    /// Answer commands containing `pattern` with `stdout`
    pub fn respond(mut self, pattern: &str, stdout: &str) -> Self {
        self.rules.push((
            pattern.to_string(),
            ShellOutput {
                exit_code: Some(0),
                stdout: format!("{stdout}\n"),
                stderr: String::new(),
            },
        ));
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl Shell for RecordingShell {
    async fn run(&self, command: &str, _mode: OutputMode) -> Result<ShellOutput> {
        self.commands.lock().unwrap().push(command.to_string());
        let output = self
            .rules
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or(ShellOutput {
                exit_code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            });
        Ok(output)
    }
}

/// A test workspace with temporary directory and config management
pub struct Workspace {
    pub root: TempDir,
    pub config_path: PathBuf,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Create a new temporary workspace
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        let config_path = root.path().join(".repoman.json");
        Self { root, config_path }
    }

    /// Write the configuration JSON to the workspace
    pub fn write_config(&self, json: &str) {
        std::fs::write(&self.config_path, json).expect("Failed to write config");
    }

    pub fn read_config(&self) -> String {
        std::fs::read_to_string(&self.config_path).expect("Failed to read config")
    }

    /// Get the workspace root path
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// `<workspace><separator><name>` as it appears in rendered commands
    pub fn repo_dir(&self, name: &str) -> String {
        format!("{}{}{}", self.path().display(), MAIN_SEPARATOR, name)
    }
}

pub fn repo(name: &str, url: &str, scm_type: ScmType, tags: &[&str]) -> Repository {
    RepositoryBuilder::new(name.to_string(), url.to_string())
        .with_type(scm_type)
        .with_tags(tags.iter().map(|tag| tag.to_string()).collect())
        .build()
}

/// Result of running the CLI binary
#[derive(Debug)]
pub struct CliOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CliOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Run the repoman binary with given arguments inside `cwd`
pub fn run_cli(args: &[&str], cwd: &Path) -> CliOutput {
    let output = Command::new(env!("CARGO_BIN_EXE_repoman"))
        .args(args)
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute repoman");

    CliOutput {
        status: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
