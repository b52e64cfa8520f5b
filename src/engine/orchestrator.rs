//! Runs actions across the configured repositories

use super::selector::ExecutionOptions;
use super::template::{TemplateParams, render};
use crate::config::{Config, Repository, ScmTable};
use crate::constants::report::MAX_CONCURRENT_PROBES;
use crate::error::RepomanError;
use crate::report::ReportRow;
use crate::runner::{CommandRunner, OutputMode, Shell};
use crate::utils::{Logger, get_exit_code_description};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

static CHANGE_DIR_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"^cd (?:/d )?".+?" && "#).ok());

/// Drop the leading `cd "<dir>" && ` of a rendered command
pub fn strip_change_dir(command: &str) -> &str {
    match CHANGE_DIR_PREFIX.as_ref().and_then(|regex| regex.find(command)) {
        Some(prefix) => &command[prefix.end()..],
        None => command,
    }
}

/// Outcome of running one command for one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub name: String,
    /// The rendered command line
    pub command: String,
    pub success: bool,
    /// `None` when the command could not be started or was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Results of [`Repoman::exec`]
///
/// `error` is set when fail-fast stopped the run; the failing repository is
/// the last entry of `results`.
#[derive(Debug)]
pub struct ExecOutcome {
    pub results: Vec<ExecutionResult>,
    pub error: Option<RepomanError>,
}

impl ExecOutcome {
    pub fn successful(&self) -> usize {
        self.results.iter().filter(|result| result.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.successful()
    }

    pub fn into_result(self) -> Result<Vec<ExecutionResult>, RepomanError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.results),
        }
    }
}

/// The repository set of one workspace together with its action table
pub struct Repoman {
    repositories: Vec<Repository>,
    scms: ScmTable,
    workspace: PathBuf,
    shell: Arc<dyn Shell>,
    logger: Logger,
}

impl Repoman {
    pub fn new(repositories: Vec<Repository>, scms: ScmTable, workspace: PathBuf) -> Self {
        Self {
            repositories,
            scms,
            workspace,
            shell: Arc::new(CommandRunner::new()),
            logger: Logger,
        }
    }

    pub fn from_config(config: Config, scms: ScmTable, workspace: PathBuf) -> Self {
        Self::new(config.repositories, scms, workspace)
    }

    /// Replace the shell used to run commands
    pub fn with_shell(mut self, shell: Arc<dyn Shell>) -> Self {
        self.shell = shell;
        self
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    fn params(&self, repo: &Repository) -> TemplateParams {
        TemplateParams::for_repository(repo, &self.workspace)
    }

    /// Run `action` for every selected repository, one at a time
    ///
    /// `action` is looked up in the action table of each repository's type;
    /// anything not found there runs as a shell command inside the repository
    /// directory.
    pub async fn exec(&self, action: &str, options: &ExecutionOptions) -> ExecOutcome {
        let mut results = Vec::new();

        for repo in options.selector.filter(&self.repositories) {
            let template = self.scms.lookup_command(repo.resolved_type(), action);
            let command = render(&template, &self.params(repo));

            self.logger.separator(&repo.name);
            if options.verbose {
                self.logger.command(strip_change_dir(&command));
            }

            let result = self.run(repo, command).await;
            let failed = !result.success;
            let exit_code = result.exit_code;
            results.push(result);

            if failed && options.fail_fast {
                return ExecOutcome {
                    results,
                    error: Some(RepomanError::CommandFailed {
                        name: repo.name.clone(),
                        exit_code,
                    }),
                };
            }
        }

        ExecOutcome {
            results,
            error: None,
        }
    }

    async fn run(&self, repo: &Repository, command: String) -> ExecutionResult {
        match self.shell.run(&command, OutputMode::Stream).await {
            Ok(output) => {
                if let Some(code) = output.exit_code.filter(|code| *code != 0) {
                    self.logger.error(
                        &repo.name,
                        &format!(
                            "Command '{}' ended with exit code {} ({})",
                            strip_change_dir(&command),
                            code,
                            get_exit_code_description(code)
                        ),
                    );
                }
                ExecutionResult {
                    name: repo.name.clone(),
                    success: output.success(),
                    exit_code: output.exit_code,
                    stdout: output.stdout,
                    stderr: output.stderr,
                    command,
                }
            }
            Err(e) => {
                self.logger.error(&repo.name, &format!("{e:#}"));
                ExecutionResult {
                    name: repo.name.clone(),
                    success: false,
                    exit_code: None,
                    stdout: String::new(),
                    stderr: format!("{e:#}"),
                    command,
                }
            }
        }
    }

    /// Run a table action for a single repository, failing if it fails
    pub async fn run_action(&self, repo: &Repository, action: &str) -> Result<ExecutionResult> {
        let template = self.scms.require_action(repo.resolved_type(), action)?;
        let command = render(template, &self.params(repo));
        tracing::info!(repository = %repo.name, command = %command, "running {action}");

        let result = self.run(repo, command).await;
        if !result.success {
            return Err(RepomanError::CommandFailed {
                name: repo.name.clone(),
                exit_code: result.exit_code,
            }
            .into());
        }
        Ok(result)
    }

    /// Record a new repository in the config file, then check it out
    ///
    /// Nothing is written or cloned if the name is already configured.
    pub async fn add(&mut self, config_path: &Path, repo: Repository) -> Result<ExecutionResult> {
        Config::add_to_file(config_path, repo.clone())?;
        self.logger
            .info(&repo.name, &format!("Added to {}", config_path.display()));
        self.repositories.push(repo.clone());
        self.run_action(&repo, "init").await
    }

    /// Drop a repository from the config file, then delete its working copy
    pub async fn remove(&mut self, config_path: &Path, name: &str) -> Result<ExecutionResult> {
        let removed = Config::remove_from_file(config_path, name)?;
        self.logger
            .info(name, &format!("Removed from {}", config_path.display()));
        self.repositories.retain(|repo| repo.name != name);
        self.run_action(&removed, "delete").await
    }

    /// Names of the selected repositories, in configuration order
    pub fn list(&self, options: &ExecutionOptions) -> Vec<String> {
        options
            .selector
            .filter(&self.repositories)
            .into_iter()
            .map(|repo| repo.name.clone())
            .collect()
    }

    /// Branch and change status of every selected repository, sorted by name
    ///
    /// Probes run concurrently. A probe that fails or prints nothing leaves
    /// its metric as `unknown`; no probe failure stops the others.
    ///
    /// Repositories the selector filters out get no row at all. Earlier
    /// releases listed every configured repository and left the unselected
    /// ones as `unknown`.
    pub async fn report(&self, options: &ExecutionOptions) -> Vec<ReportRow> {
        let probes: Vec<_> = options
            .selector
            .filter(&self.repositories)
            .into_iter()
            .map(|repo| self.report_row(repo))
            .collect();
        let mut rows: Vec<ReportRow> = stream::iter(probes)
            .buffer_unordered(MAX_CONCURRENT_PROBES)
            .collect()
            .await;
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    async fn report_row(&self, repo: &Repository) -> ReportRow {
        let mut row = ReportRow::unknown(&repo.name);
        let scm_type = repo.resolved_type();
        let Some(probes) = self.scms.report_commands(scm_type) else {
            self.logger.warn(
                &repo.name,
                &format!("No report commands configured for {scm_type}"),
            );
            return row;
        };

        let params = self.params(repo);
        let (branch, uncommitted, unpushed) = tokio::join!(
            self.probe(repo, &probes.get_branch_name, &params),
            self.probe(repo, &probes.has_uncommitted, &params),
            self.probe(repo, &probes.has_unpushed, &params),
        );

        if let Some(branch) = branch {
            row.branch = branch;
        }
        if let Some(uncommitted) = uncommitted {
            row.uncommitted = uncommitted;
        }
        if let Some(unpushed) = unpushed {
            row.unpushed = unpushed;
        }
        row
    }

    async fn probe(
        &self,
        repo: &Repository,
        template: &str,
        params: &TemplateParams,
    ) -> Option<String> {
        let command = render(template, params);
        match self.shell.run(&command, OutputMode::Capture).await {
            Ok(output) => {
                let stderr = output.stderr.trim();
                if !stderr.is_empty() {
                    self.logger.error(&repo.name, stderr);
                }
                let value = output.stdout.trim();
                (output.success() && !value.is_empty()).then(|| value.to_string())
            }
            Err(e) => {
                self.logger.error(&repo.name, &format!("{e:#}"));
                None
            }
        }
    }

    /// Workspace entries that belong to no configured repository
    ///
    /// Dot-entries are never reported. Unless `dry_run` is set each entry is
    /// deleted, directories recursively.
    pub fn clean(&self, dry_run: bool) -> Result<Vec<String>> {
        let configured: HashSet<&str> = self
            .repositories
            .iter()
            .map(|repo| repo.name.as_str())
            .collect();

        let mut unknown = Vec::new();
        let entries = std::fs::read_dir(&self.workspace)
            .with_context(|| format!("Failed to read {}", self.workspace.display()))?;
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || configured.contains(name.as_str()) {
                continue;
            }
            unknown.push(name);
        }
        unknown.sort();

        if dry_run {
            return Ok(unknown);
        }

        for name in &unknown {
            let path = self.workspace.join(name);
            let removed = if path.is_dir() {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
            removed.with_context(|| format!("Failed to delete {}", path.display()))?;
            println!("- {name} has been deleted");
        }
        Ok(unknown)
    }
}
