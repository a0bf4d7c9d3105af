//! Integration tests for `outpost validate`

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn outpost() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("outpost"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("OUTPOST_CONFIG");
    cmd.env_remove("HCLOUD_TOKEN");
    cmd
}

fn write_fleet(dir: &tempfile::TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("outpost.yaml");
    std::fs::write(&path, content).expect("write fleet file");
    path
}

#[test]
fn test_valid_fleet_file_passes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(
        &dir,
        r"
machines:
  - name: alpha
    user: ops
    password:
      env: FLEET_PW
",
    );

    outpost()
        .args(["validate", "-c"])
        .arg(&fleet)
        .env("FLEET_PW", "s3cret")
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid (1 machine)"));
}

#[test]
fn test_valid_fleet_file_json_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(
        &dir,
        r"
machines:
  - name: alpha
    user: ops
    password:
      env: FLEET_PW
",
    );

    outpost()
        .args(["validate", "--json", "-c"])
        .arg(&fleet)
        .env("FLEET_PW", "s3cret")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""valid": true"#))
        .stdout(predicate::str::contains(r#""alpha""#));
}

#[test]
fn test_duplicate_machine_names_fail() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(
        &dir,
        r"
machines:
  - name: alpha
    user: ops
    password:
      plain: one23
  - name: alpha
    user: ops
    password:
      plain: two34
",
    );

    outpost()
        .args(["validate", "-c"])
        .arg(&fleet)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Duplicate machine name 'alpha'"))
        .stderr(predicate::str::contains("failed validation"));
}

#[test]
fn test_invalid_fleet_file_json_report_exits_nonzero() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(
        &dir,
        r"
machines:
  - name: UPPER
    user: ops
    password:
      plain: one23
",
    );

    outpost()
        .args(["validate", "--json", "-c"])
        .arg(&fleet)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""valid": false"#));
}

#[test]
fn test_missing_password_env_names_the_variable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(
        &dir,
        r"
machines:
  - name: alpha
    user: ops
    password:
      env: OUTPOST_TEST_UNSET_PW
",
    );

    outpost()
        .args(["validate", "-c"])
        .arg(&fleet)
        .env_remove("OUTPOST_TEST_UNSET_PW")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("OUTPOST_TEST_UNSET_PW"))
        .stderr(predicate::str::contains("not set"));
}

#[test]
fn test_plain_password_warns_but_passes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(
        &dir,
        r"
machines:
  - name: alpha
    user: ops
    password:
      plain: s3cret
",
    );

    outpost()
        .args(["validate", "-c"])
        .arg(&fleet)
        .assert()
        .success()
        .stdout(predicate::str::contains("plain-text passwords"));
}

#[test]
fn test_missing_fleet_file_fails() {
    outpost()
        .args(["validate", "-c", "/nonexistent/outpost.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn test_misspelled_machine_field_fails_parse() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(
        &dir,
        r"
machines:
  - name: alpha
    user: ops
    pasword:
      plain: s3cret
",
    );

    outpost()
        .args(["validate", "-c"])
        .arg(&fleet)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}
