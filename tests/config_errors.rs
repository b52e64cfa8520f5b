//! Config file error scenario tests

use repoman::config::{Config, ScmTable};
use repoman::engine::Selector;
use repoman::error::RepomanError;
use std::fs;
use tempfile::TempDir;

fn load_error(content: &str) -> anyhow::Error {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".repoman.json");
    fs::write(&path, content).expect("Failed to write test file");
    Config::load(&path).unwrap_err()
}

#[test]
fn test_config_file_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nonexistent.json");

    let error = Config::load(&path).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<RepomanError>(),
        Some(RepomanError::ConfigNotFound(_))
    ));
    assert!(error.to_string().contains("does not exist"));
}

#[test]
fn test_config_file_invalid_json() {
    let error = load_error(r#"{"couchdb": {"url": "#);
    assert!(matches!(
        error.downcast_ref::<RepomanError>(),
        Some(RepomanError::ConfigParse { .. })
    ));
    assert!(error.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_config_file_not_a_mapping() {
    let error = load_error(r#"[{"name": "couchdb"}]"#);
    assert!(error.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_config_entry_without_url() {
    let error = load_error(r#"{"couchdb": {"type": "git"}}"#);
    assert!(error.to_string().contains("url"));
}

#[test]
fn test_config_entry_with_unknown_type() {
    let error = load_error(r#"{"couchdb": {"type": "hg", "url": "u"}}"#);
    assert!(error.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_config_entry_with_empty_url() {
    let error = load_error(r#"{"couchdb": {"url": "  "}}"#);
    assert!(matches!(
        error.downcast_ref::<RepomanError>(),
        Some(RepomanError::InvalidConfig(_))
    ));
    assert!(error.to_string().contains("URL cannot be empty"));
}

#[test]
fn test_config_entry_with_path_as_name() {
    let error = load_error(r#"{"../escape": {"url": "u"}}"#);
    assert!(error.to_string().contains("single directory name"));
}

#[test]
fn test_config_file_empty() {
    let error = load_error("");
    assert!(error.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_config_directory_instead_of_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config_dir.json");
    fs::create_dir(&path).expect("Failed to create directory");

    let error = Config::load(&path).unwrap_err();
    assert!(error.to_string().contains("Failed to read config file"));
}

#[test]
fn test_invalid_regex_selector() {
    let error = Selector::new(Vec::new(), Some("couch(db")).unwrap_err();
    assert!(matches!(error, RepomanError::InvalidRegex { .. }));
    assert!(error.to_string().starts_with("Invalid regex 'couch(db'"));
}

#[test]
fn test_malformed_scm_table() {
    let error = ScmTable::from_json(r#"{"git": {"init": 42}}"#).unwrap_err();
    assert!(matches!(error, RepomanError::ScmTableParse(_)));
}

#[test]
fn test_missing_scm_table_file() {
    let temp_dir = TempDir::new().unwrap();
    let error = ScmTable::load(&temp_dir.path().join("scms.json")).unwrap_err();
    assert!(error.to_string().contains("Failed to read SCM table"));
}
