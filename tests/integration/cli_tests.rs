//! Integration tests for the outpost CLI surface
//!
//! These verify the command hierarchy and argument parsing.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn outpost() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("outpost"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("OUTPOST_CONFIG");
    cmd.env_remove("HCLOUD_TOKEN");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    outpost().assert().code(2).stderr(predicate::str::contains(
        "Provision disposable dev fleets on Hetzner Cloud",
    ));
}

#[test]
fn test_cli_help_flag_shows_help() {
    outpost()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    outpost()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("outpost"));
}

#[test]
fn test_version_command_shows_version() {
    outpost()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("outpost 0.3.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    outpost()
        .arg("version")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"version":"0.3.0"}"#));
}

// --- Command hierarchy tests ---

#[test]
fn test_help_shows_up_command() {
    outpost()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("up"));
}

#[test]
fn test_help_shows_render_command() {
    outpost()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"));
}

#[test]
fn test_help_shows_validate_command() {
    outpost()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_unknown_command_fails() {
    outpost().arg("teleport").assert().code(2);
}

#[test]
fn test_no_color_env_var_accepted() {
    // Per the NO_COLOR convention: truthy values set the flag and an empty
    // value leaves it unset, but none of them may break argument parsing.
    for value in ["true", "1", ""] {
        outpost()
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success();
    }
}

#[test]
fn test_up_help_lists_flags() {
    outpost()
        .args(["up", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--show-secrets"))
        .stdout(predicate::str::contains("--yes"));
}

#[test]
fn test_render_help_lists_mime_flag() {
    outpost()
        .args(["render", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--mime"));
}
