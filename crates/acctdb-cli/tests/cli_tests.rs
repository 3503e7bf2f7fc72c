//! CLI integration tests for acctdb.
//!
//! These tests verify command-line argument parsing, help output,
//! and exit codes for various error conditions.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the acctdb binary.
fn cmd() -> Command {
    Command::cargo_bin("acctdb").unwrap()
}

const VALID_CONFIG: &str = "\
database:
  database: accounts
  user: app
  schema: accounting
";

const VALID_ENTITIES: &str = "\
- entity: currency
  table: currency
  columns:
    - name: code
      type: text
      length: 10
      nullable: false
      primary: true
    - name: name
      type: text
      length: 50
";

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("ddl"))
        .stdout(predicate::str::contains("health-check"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("acctdb"));
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_missing_config_exits_with_code_2() {
    // Missing file is an IO error (code 2)
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "ddl"])
        .assert()
        .code(2);
}

#[test]
fn test_invalid_config_yaml_exits_with_code_2() {
    let config = write_temp("invalid: yaml: content: [");

    cmd()
        .args(["--config", config.path().to_str().unwrap(), "ddl"])
        .assert()
        .code(2);
}

#[test]
fn test_missing_entities_exits_with_code_2() {
    let config = write_temp(VALID_CONFIG);

    cmd()
        .args([
            "--config",
            config.path().to_str().unwrap(),
            "--entities",
            "nonexistent_entities.yaml",
            "ddl",
        ])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_semantic_type_exits_with_code_2() {
    let config = write_temp(VALID_CONFIG);
    let entities = write_temp(
        "\
- entity: currency
  table: currency
  columns:
    - name: code
      type: uuid
",
    );

    cmd()
        .args([
            "--config",
            config.path().to_str().unwrap(),
            "--entities",
            entities.path().to_str().unwrap(),
            "ddl",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported column type"));
}

// =============================================================================
// DDL Output Tests (no database required)
// =============================================================================

#[test]
fn test_ddl_prints_bootstrap_statements() {
    let config = write_temp(VALID_CONFIG);
    let entities = write_temp(VALID_ENTITIES);

    cmd()
        .args([
            "--config",
            config.path().to_str().unwrap(),
            "--entities",
            entities.path().to_str().unwrap(),
            "ddl",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "create schema if not exists accounting;",
        ))
        .stdout(predicate::str::contains(
            "create table if not exists accounting.currency(\
             code varchar(10) not null, name varchar(50) , primary key(code));",
        ));
}
