//! End-to-end tests for the `tl` binary's headless subcommands

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tl(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tl").unwrap_or_else(|err| panic!("Binary not found: {err}"));
    cmd.env("NO_COLOR", "1")
        .current_dir(data_dir)
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

/// First listed id of the task with this text
fn id_for(data_dir: &Path, text: &str) -> String {
    let output = tl(data_dir).arg("list").output().expect("run tl list");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    stdout
        .lines()
        .find(|line| line.contains(&format!("] {}  ", text)))
        .and_then(|line| line.split_whitespace().last())
        .map(str::to_string)
        .unwrap_or_else(|| panic!("no task '{}' in:\n{}", text, stdout))
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    tl(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("clear-completed"));
}

#[test]
fn test_empty_list() {
    let dir = TempDir::new().unwrap();
    tl(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 / 0"))
        .stdout(predicate::str::contains("No tasks yet"));
}

#[test]
fn test_add_persists_between_runs() {
    let dir = TempDir::new().unwrap();
    tl(dir.path())
        .args(["add", "Buy", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"))
        .stdout(predicate::str::contains("1 / 1"));

    tl(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ] Buy milk"));
    assert!(dir.path().join("minimal_todos_v1").exists());
}

#[test]
fn test_toggle_and_clear_completed() {
    let dir = TempDir::new().unwrap();
    tl(dir.path()).args(["add", "A"]).assert().success();
    tl(dir.path()).args(["add", "B"]).assert().success();

    let a = id_for(dir.path(), "A");
    tl(dir.path())
        .args(["toggle", &a])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 / 2"))
        .stdout(predicate::str::contains("[✓] A"));

    tl(dir.path())
        .arg("clear-completed")
        .assert()
        .success()
        .stdout(predicate::str::contains("B"))
        .stdout(predicate::str::contains("] A ").not());
}

#[test]
fn test_edit_and_remove() {
    let dir = TempDir::new().unwrap();
    tl(dir.path()).args(["add", "X"]).assert().success();
    let x = id_for(dir.path(), "X");

    tl(dir.path())
        .args(["edit", &x, "Y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ] Y"));

    tl(dir.path())
        .args(["remove", &x])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 / 0"));
}

#[test]
fn test_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    tl(dir.path())
        .args(["toggle", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No task matches"));
}

#[test]
fn test_clear_all_with_yes() {
    let dir = TempDir::new().unwrap();
    tl(dir.path()).args(["add", "A"]).assert().success();
    tl(dir.path()).args(["add", "B"]).assert().success();

    tl(dir.path())
        .args(["clear-all", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 / 0"));
}

#[test]
fn test_theme_toggle() {
    let dir = TempDir::new().unwrap();
    tl(dir.path())
        .arg("theme")
        .assert()
        .success()
        .stdout(predicate::str::contains("light"));

    tl(dir.path())
        .args(["theme", "toggle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dark"));

    let stored = std::fs::read_to_string(dir.path().join("minimal_theme_v1")).unwrap();
    assert_eq!(stored, "dark");
}

#[test]
fn test_ephemeral_writes_nothing() {
    let dir = TempDir::new().unwrap();
    tl(dir.path())
        .args(["--ephemeral", "add", "temp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("temp"));
    assert!(!dir.path().join("minimal_todos_v1").exists());
}

#[test]
fn test_broken_local_config_is_logged_and_skipped() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".tasklist.yml"), "ui: [not, a, map]\n").unwrap();

    tl(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 / 0"));

    let log = std::fs::read_to_string(dir.path().join("logs").join("tasklist.log")).unwrap();
    assert!(log.contains("Failed to load config from .tasklist.yml"), "log was:\n{}", log);
}
