//! Integration tests for `outpost render`

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

const SINGLE_MACHINE: &str = r"
machines:
  - name: machine1
    user: hola
    password:
      plain: pola
";

const TWO_MACHINES: &str = r"
machines:
  - name: alpha
    user: ops
    password:
      plain: one23
  - name: beta
    user: ops
    password:
      plain: two34
";

#[test]
fn test_render_sole_machine_prints_bootstrap_script() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(&dir, SINGLE_MACHINE);

    outpost()
        .args(["render", "-c"])
        .arg(&fleet)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#!/bin/bash"))
        .stdout(predicate::str::contains("do_user hola pola"))
        .stdout(predicate::str::contains("adduser hola docker"))
        .stdout(predicate::str::contains(
            "echo \"hola ALL=(ALL:ALL) NOPASSWD:ALL\" > /etc/sudoers.d/90-hola",
        ));
}

#[test]
fn test_render_named_machine_in_multi_machine_fleet() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(&dir, TWO_MACHINES);

    outpost()
        .args(["render", "beta", "-c"])
        .arg(&fleet)
        .assert()
        .success()
        .stdout(predicate::str::contains("do_user ops two34"));
}

#[test]
fn test_render_unknown_machine_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(&dir, TWO_MACHINES);

    outpost()
        .args(["render", "gamma", "-c"])
        .arg(&fleet)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No machine named 'gamma'"));
}

#[test]
fn test_render_without_name_is_ambiguous_for_two_machines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(&dir, TWO_MACHINES);

    outpost()
        .args(["render", "-c"])
        .arg(&fleet)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("alpha, beta"));
}

#[test]
fn test_render_mime_envelope() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(&dir, SINGLE_MACHINE);

    outpost()
        .args(["render", "--mime", "-c"])
        .arg(&fleet)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Content-Type: multipart/mixed; boundary=\"MIMEBOUNDARY\"",
        ))
        .stdout(predicate::str::contains("filename=\"initialize.sh\""))
        .stdout(predicate::str::contains("Content-Type: text/x-shellscript"))
        .stdout(predicate::str::contains("--MIMEBOUNDARY--"));
}

#[test]
fn test_render_is_deterministic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(&dir, SINGLE_MACHINE);

    let first = outpost()
        .args(["render", "--mime", "-c"])
        .arg(&fleet)
        .output()
        .expect("first render");
    let second = outpost()
        .args(["render", "--mime", "-c"])
        .arg(&fleet)
        .output()
        .expect("second render");

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_render_resolves_env_passwords() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fleet = write_fleet(
        &dir,
        r"
machines:
  - name: machine1
    user: hola
    password:
      env: OUTPOST_TEST_RENDER_PW
",
    );

    outpost()
        .args(["render", "-c"])
        .arg(&fleet)
        .env("OUTPOST_TEST_RENDER_PW", "fromenv1")
        .assert()
        .success()
        .stdout(predicate::str::contains("do_user hola fromenv1"));
}
