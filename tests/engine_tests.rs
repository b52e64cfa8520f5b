//! Orchestrator integration tests driven by a recording shell

mod support;

use repoman::config::{Config, ScmTable, ScmType};
use repoman::engine::{ExecutionOptions, Repoman, Selector};
use repoman::error::RepomanError;
use std::path::Path;
use std::sync::Arc;
use support::{RecordingShell, TWO_REPOS, Workspace, repo};

fn two_repo_config() -> Config {
    Config::from_json(TWO_REPOS, Path::new(".repoman.json")).unwrap()
}

fn posix_table() -> ScmTable {
    ScmTable::for_platform("linux").unwrap()
}

fn repoman_with(config: Config, workspace: &Workspace, shell: Arc<RecordingShell>) -> Repoman {
    Repoman::from_config(config, posix_table(), workspace.path().to_path_buf()).with_shell(shell)
}

fn selecting(tags: &[&str], regex: Option<&str>) -> ExecutionOptions {
    let tags = tags.iter().map(|tag| tag.to_string()).collect();
    ExecutionOptions::new(Selector::new(tags, regex).unwrap())
}

#[tokio::test]
async fn test_exec_init_renders_each_repository_in_order() {
    let workspace = Workspace::new();
    let shell = Arc::new(RecordingShell::new());
    let repoman = repoman_with(two_repo_config(), &workspace, shell.clone());

    let outcome = repoman
        .exec("init", &ExecutionOptions::default().with_verbose(true))
        .await;

    assert!(outcome.error.is_none());
    assert_eq!(outcome.successful(), 2);
    assert_eq!(
        shell.commands(),
        vec![
            format!(
                "git clone https://github.com/apache/couchdb.git \"{}\"",
                workspace.repo_dir("couchdb")
            ),
            format!(
                "svn checkout http://svn.apache.org/repos/asf/httpd/httpd/trunk/ \"{}\"",
                workspace.repo_dir("httpd")
            ),
        ]
    );
}

#[tokio::test]
async fn test_exec_unknown_action_runs_inside_repository_directory() {
    let workspace = Workspace::new();
    let shell = Arc::new(RecordingShell::new());
    let repoman = repoman_with(two_repo_config(), &workspace, shell.clone());

    let outcome = repoman
        .exec("touch .gitignore;", &ExecutionOptions::default())
        .await;

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(
        shell.commands(),
        vec![
            format!(
                "cd \"{}\" && touch .gitignore;",
                workspace.repo_dir("couchdb")
            ),
            format!("cd \"{}\" && touch .gitignore;", workspace.repo_dir("httpd")),
        ]
    );
}

#[tokio::test]
async fn test_exec_selects_by_tag() {
    let workspace = Workspace::new();
    let shell = Arc::new(RecordingShell::new());
    let repoman = repoman_with(two_repo_config(), &workspace, shell.clone());

    let outcome = repoman.exec("get", &selecting(&["database"], None)).await;

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].name, "couchdb");
    assert_eq!(shell.commands().len(), 1);
    assert!(shell.commands()[0].ends_with("git pull --rebase"));
}

#[tokio::test]
async fn test_exec_selects_by_regex() {
    let workspace = Workspace::new();
    let shell = Arc::new(RecordingShell::new());
    let repoman = repoman_with(two_repo_config(), &workspace, shell.clone());

    let outcome = repoman.exec("get", &selecting(&[], Some(".*couchdb.*"))).await;

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].name, "couchdb");
}

#[tokio::test]
async fn test_exec_with_tag_and_regex_requires_both() {
    let workspace = Workspace::new();
    let shell = Arc::new(RecordingShell::new());
    let repoman = repoman_with(two_repo_config(), &workspace, shell.clone());

    let outcome = repoman
        .exec("get", &selecting(&["apache"], Some("svn\\.apache")))
        .await;

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].name, "httpd");
}

#[tokio::test]
async fn test_exec_empty_configuration_runs_nothing() {
    let workspace = Workspace::new();
    let shell = Arc::new(RecordingShell::new());
    let repoman = repoman_with(Config::new(), &workspace, shell.clone());

    let outcome = repoman.exec("init", &ExecutionOptions::default()).await;

    assert!(outcome.error.is_none());
    assert!(outcome.results.is_empty());
    assert!(shell.commands().is_empty());
}

fn three_repo_config() -> Config {
    let mut config = Config::new();
    for name in ["alpha", "beta", "gamma"] {
        config
            .add_repository(repo(
                name,
                &format!("git@example.org:team/{name}.git"),
                ScmType::Git,
                &[],
            ))
            .unwrap();
    }
    config
}

#[tokio::test]
async fn test_exec_fail_fast_stops_at_first_failure() {
    let workspace = Workspace::new();
    let shell = Arc::new(RecordingShell::new().fail_on("beta\"", 1));
    let repoman = repoman_with(three_repo_config(), &workspace, shell.clone());

    let outcome = repoman
        .exec("get", &ExecutionOptions::default().with_fail_fast(true))
        .await;

    assert_eq!(shell.commands().len(), 2);
    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.failed(), 1);
    match outcome.error {
        Some(RepomanError::CommandFailed { name, exit_code }) => {
            assert_eq!(name, "beta");
            assert_eq!(exit_code, Some(1));
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_exec_without_fail_fast_runs_everything() {
    let workspace = Workspace::new();
    let shell = Arc::new(RecordingShell::new().fail_on("beta\"", 2));
    let repoman = repoman_with(three_repo_config(), &workspace, shell.clone());

    let outcome = repoman.exec("get", &ExecutionOptions::default()).await;

    assert_eq!(shell.commands().len(), 3);
    assert!(outcome.error.is_none());
    assert_eq!(outcome.successful(), 2);
    assert_eq!(outcome.failed(), 1);
    assert_eq!(outcome.results[1].exit_code, Some(2));
    assert!(outcome.into_result().is_ok());
}

#[tokio::test]
async fn test_report_collects_probe_output_sorted_by_name() {
    let workspace = Workspace::new();
    let shell = Arc::new(
        RecordingShell::new()
            .respond("couchdb\" && git rev-parse", "main")
            .respond("couchdb\" && git diff-index", "Dirty")
            .respond("couchdb\" && git rev-list", "3")
            .respond("httpd\" && svn info", "^/httpd/trunk")
            .respond("httpd\" && test -z", "Clean")
            .respond("httpd\" && echo", "N. A."),
    );
    let mut config = two_repo_config();
    config.repositories.reverse();
    let repoman = repoman_with(config, &workspace, shell.clone());

    let rows = repoman.report(&ExecutionOptions::default()).await;

    assert_eq!(shell.commands().len(), 6);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "couchdb");
    assert_eq!(rows[0].branch, "main");
    assert!(rows[0].is_dirty());
    assert_eq!(rows[0].unpushed_count(), Some(3));
    assert_eq!(rows[1].name, "httpd");
    assert_eq!(rows[1].uncommitted, "Clean");
    assert_eq!(rows[1].unpushed, "N. A.");
}

#[tokio::test]
async fn test_report_failed_probes_are_unknown() {
    let workspace = Workspace::new();
    let shell = Arc::new(RecordingShell::new().fail_on("&& git", 128));
    let repoman = repoman_with(two_repo_config(), &workspace, shell.clone());

    let rows = repoman.report(&selecting(&["database"], None)).await;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "couchdb");
    assert!(shell.commands().iter().all(|cmd| !cmd.contains("httpd")));
    assert_eq!(rows[0].branch, "unknown");
    assert_eq!(rows[0].uncommitted, "unknown");
    assert_eq!(rows[0].unpushed, "unknown");
}

#[tokio::test]
async fn test_report_without_probe_table_is_unknown() {
    let workspace = Workspace::new();
    let shell = Arc::new(RecordingShell::new());
    let scms = ScmTable::from_json(r#"{"git": {"init": "git clone {{{url}}}"}}"#).unwrap();
    let repoman = Repoman::from_config(two_repo_config(), scms, workspace.path().to_path_buf())
        .with_shell(shell.clone());

    let rows = repoman.report(&ExecutionOptions::default()).await;

    assert!(shell.commands().is_empty());
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.branch == "unknown"));
}

#[tokio::test]
async fn test_add_records_entry_then_runs_init() {
    let workspace = Workspace::new();
    workspace.write_config(TWO_REPOS);
    let shell = Arc::new(RecordingShell::new());
    let mut repoman = repoman_with(Config::new(), &workspace, shell.clone());

    repoman
        .add(
            &workspace.config_path,
            repo(
                "zope",
                "https://github.com/zopefoundation/Zope.git",
                ScmType::Git,
                &["python"],
            ),
        )
        .await
        .unwrap();

    assert_eq!(
        shell.commands(),
        vec![format!(
            "git clone https://github.com/zopefoundation/Zope.git \"{}\"",
            workspace.repo_dir("zope")
        )]
    );
    let saved = Config::load(&workspace.config_path).unwrap();
    assert_eq!(saved.names(), vec!["couchdb", "httpd", "zope"]);
    assert_eq!(repoman.repositories().len(), 1);
}

#[tokio::test]
async fn test_add_duplicate_leaves_config_untouched() {
    let workspace = Workspace::new();
    workspace.write_config(TWO_REPOS);
    let shell = Arc::new(RecordingShell::new());
    let mut repoman = repoman_with(Config::new(), &workspace, shell.clone());

    let err = repoman
        .add(
            &workspace.config_path,
            repo("couchdb", "https://example.org/other.git", ScmType::Git, &[]),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RepomanError>(),
        Some(RepomanError::DuplicateRepository(name)) if name == "couchdb"
    ));
    assert_eq!(workspace.read_config(), TWO_REPOS);
    assert!(shell.commands().is_empty());
}

#[tokio::test]
async fn test_add_reports_failed_checkout() {
    let workspace = Workspace::new();
    let shell = Arc::new(RecordingShell::new().fail_on("git clone", 128));
    let mut repoman = repoman_with(Config::new(), &workspace, shell.clone());

    let err = repoman
        .add(
            &workspace.config_path,
            repo("zope", "https://example.org/zope.git", ScmType::Git, &[]),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RepomanError>(),
        Some(RepomanError::CommandFailed { exit_code: Some(128), .. })
    ));
    // the entry stays recorded so a later `init` can retry the checkout
    assert!(workspace.read_config().contains("\"zope\""));
}

#[tokio::test]
async fn test_remove_uses_delete_of_repository_type() {
    let workspace = Workspace::new();
    workspace.write_config(TWO_REPOS);
    let shell = Arc::new(RecordingShell::new());
    let scms = ScmTable::from_json(
        r#"{
  "git": {"delete": "git-delete {{{name}}}"},
  "svn": {"delete": "svn-delete {{{name}}}"}
}"#,
    )
    .unwrap();
    let mut repoman = Repoman::from_config(
        Config::load(&workspace.config_path).unwrap(),
        scms,
        workspace.path().to_path_buf(),
    )
    .with_shell(shell.clone());

    repoman.remove(&workspace.config_path, "httpd").await.unwrap();

    assert_eq!(shell.commands(), vec!["svn-delete httpd".to_string()]);
    assert_eq!(
        Config::load(&workspace.config_path).unwrap().names(),
        vec!["couchdb"]
    );
    assert_eq!(repoman.repositories().len(), 1);
}

#[tokio::test]
async fn test_remove_missing_entry_changes_nothing() {
    let workspace = Workspace::new();
    workspace.write_config(TWO_REPOS);
    let shell = Arc::new(RecordingShell::new());
    let mut repoman = repoman_with(Config::new(), &workspace, shell.clone());

    let err = repoman
        .remove(&workspace.config_path, "zope")
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "There is no entry in the configuration file for zope, so there is nothing to remove."
    );
    assert_eq!(workspace.read_config(), TWO_REPOS);
    assert!(shell.commands().is_empty());
}

#[test]
fn test_clean_lists_then_deletes_unknown_entries() {
    let workspace = Workspace::new();
    workspace.write_config(TWO_REPOS);
    std::fs::create_dir(workspace.path().join("couchdb")).unwrap();
    std::fs::create_dir_all(workspace.path().join("stale/nested")).unwrap();
    std::fs::write(workspace.path().join("notes.txt"), "x").unwrap();

    let repoman = Repoman::from_config(
        Config::load(&workspace.config_path).unwrap(),
        posix_table(),
        workspace.path().to_path_buf(),
    );

    assert_eq!(repoman.clean(true).unwrap(), vec!["notes.txt", "stale"]);
    assert!(workspace.path().join("stale").exists());

    assert_eq!(repoman.clean(false).unwrap(), vec!["notes.txt", "stale"]);
    assert!(!workspace.path().join("stale").exists());
    assert!(!workspace.path().join("notes.txt").exists());
    assert!(workspace.path().join("couchdb").exists());
    assert!(workspace.config_path.exists());
}
