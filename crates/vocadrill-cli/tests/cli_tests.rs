//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vocadrill() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("vocadrill").unwrap()
}

#[test]
fn help_output() {
    vocadrill()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vocabulary drill-challenge client"));
}

#[test]
fn version_output() {
    vocadrill()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vocadrill"));
}

#[test]
fn unknown_challenge_kind_fails() {
    vocadrill()
        .args([
            "play",
            "--kind",
            "hangman",
            "--challenge",
            "chal-1",
            "--drill",
            "drill-1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown challenge kind"));
}

#[test]
fn play_requires_challenge_and_drill() {
    vocadrill()
        .args(["play", "--kind", "context-master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn missing_explicit_config_fails() {
    vocadrill()
        .args([
            "preview",
            "--kind",
            "context-master",
            "--challenge",
            "chal-1",
            "--drill",
            "drill-1",
            "--config",
            "no_such_config.toml",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    vocadrill()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created vocadrill.toml"));

    assert!(dir.path().join("vocadrill.toml").exists());
}

#[test]
fn init_skips_existing_config() {
    let dir = TempDir::new().unwrap();

    vocadrill()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    vocadrill()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

// An unreachable service is not an error: every fetch failure is normalized
// to an empty collection, and the empty branch renders.
#[test]
fn preview_against_unreachable_service_renders_empty_branch() {
    vocadrill()
        .args([
            "preview",
            "--kind",
            "word-scramble",
            "--challenge",
            "chal-1",
            "--drill",
            "drill-1",
            "--base-url",
            "http://127.0.0.1:1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No playable items found"));
}

#[test]
fn play_against_unreachable_service_renders_empty_branch() {
    vocadrill()
        .args([
            "play",
            "--kind",
            "context-master",
            "--challenge",
            "chal-1",
            "--drill",
            "drill-1",
            "--base-url",
            "http://127.0.0.1:1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No playable items found"));
}
