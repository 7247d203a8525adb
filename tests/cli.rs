use assert_cmd::prelude::*;
use predicates::str::{contains, is_empty};
use std::process::Command;
use tempfile::TempDir;

fn kvapi(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kvapi").unwrap();
    cmd.arg("--path").arg(temp_dir.path());
    cmd
}

// `kvapi` with no args should exit with a non-zero code.
#[test]
fn cli_no_args() {
    Command::cargo_bin("kvapi").unwrap().assert().failure();
}

#[test]
fn cli_version() {
    Command::cargo_bin("kvapi")
        .unwrap()
        .args(["-V"])
        .assert()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_add_get() {
    let temp_dir = TempDir::new().unwrap();
    kvapi(&temp_dir)
        .args(["add", "name", "John"])
        .assert()
        .success()
        .stdout(is_empty());

    kvapi(&temp_dir)
        .args(["get", "name"])
        .assert()
        .success()
        .stdout("John\n");
}

#[test]
fn cli_add_conflict() {
    let temp_dir = TempDir::new().unwrap();
    kvapi(&temp_dir).args(["add", "name", "John"]).assert().success();

    kvapi(&temp_dir)
        .args(["add", "name", "Jane"])
        .assert()
        .failure()
        .stderr(contains("is used"));

    kvapi(&temp_dir)
        .args(["get", "name"])
        .assert()
        .success()
        .stdout("John\n");
}

#[test]
fn cli_get_missing() {
    let temp_dir = TempDir::new().unwrap();
    kvapi(&temp_dir)
        .args(["get", "city"])
        .assert()
        .failure()
        .stdout("Key not found\n");
}

#[test]
fn cli_update_delete() {
    let temp_dir = TempDir::new().unwrap();
    kvapi(&temp_dir).args(["update", "name", "John"]).assert().success();
    kvapi(&temp_dir).args(["update", "name", "Jane"]).assert().success();
    kvapi(&temp_dir)
        .args(["get", "name"])
        .assert()
        .success()
        .stdout("Jane\n");

    kvapi(&temp_dir).args(["delete", "name"]).assert().success();
    kvapi(&temp_dir).args(["delete", "name"]).assert().success();
    kvapi(&temp_dir)
        .args(["get", "name"])
        .assert()
        .failure()
        .stdout("Key not found\n");
}

#[test]
fn cli_view_and_clear() {
    let temp_dir = TempDir::new().unwrap();
    kvapi(&temp_dir).args(["add", "name", "Jane"]).assert().success();
    kvapi(&temp_dir)
        .args(["add", "email", "jane@example.com"])
        .assert()
        .success();

    kvapi(&temp_dir)
        .args(["view"])
        .assert()
        .success()
        .stdout("email: jane@example.com\nname: Jane\n");

    kvapi(&temp_dir).args(["clear"]).assert().success();
    kvapi(&temp_dir)
        .args(["view"])
        .assert()
        .success()
        .stdout(is_empty());
}

#[test]
fn cli_invalid_subcommand() {
    let temp_dir = TempDir::new().unwrap();
    kvapi(&temp_dir).args(["set", "key", "value"]).assert().failure();
    kvapi(&temp_dir).args(["get"]).assert().failure();
    kvapi(&temp_dir).args(["add", "key"]).assert().failure();
}
