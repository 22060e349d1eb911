//! End-to-end tests running the built binaries.
//!
//! Only paths that never reach a Docker daemon are exercised: help, dry
//! run, and argument errors.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;
use std::process::{Command, Output};

fn run(bin: &str, home: &Path, args: &[&str]) -> Output {
    Command::new(bin)
        .args(args)
        .current_dir(home)
        .env("HOME", home)
        .env_remove("BUBBLES_CONFIG")
        .env_remove("BUBBLES_DOCKER")
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should start")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn bubble_help_exits_zero() {
    let home = tempfile::tempdir().unwrap();
    let output = run(env!("CARGO_BIN_EXE_bubble"), home.path(), &["--help"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("--rebuild"), "got: {out}");
    assert!(out.contains("--dryRun"), "got: {out}");
    assert!(out.contains("--packages"), "got: {out}");
}

#[test]
fn bubble_dry_run_prints_dockerfile_and_command() {
    let home = tempfile::tempdir().unwrap();
    let output = run(
        env!("CARGO_BIN_EXE_bubble"),
        home.path(),
        &["--dryRun", "--offline", "--packages", "git", "-c", "ls"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("FROM node:lts"), "got: {out}");
    assert!(out.contains("RUN apt update && apt install -y git"), "got: {out}");
    assert!(out.contains("--network none"), "got: {out}");
    assert!(out.contains("bubble-sandbox-image -c ls"), "got: {out}");
}

#[test]
fn bubble_bg_dry_run_is_detached() {
    let home = tempfile::tempdir().unwrap();
    let output = run(env!("CARGO_BIN_EXE_bubble-bg"), home.path(), &["--dry-run"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("--name bubble-background"), "got: {out}");
    assert!(!out.contains(" -it "), "got: {out}");
}

#[test]
fn config_file_changes_defaults() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join(".config").join("bubbles");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.json"),
        r#"{ "namePrefix": "dev-", "dockerBinary": "podman" }"#,
    )
    .unwrap();

    let output = run(env!("CARGO_BIN_EXE_bubble"), home.path(), &["--dryRun"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("podman run"), "got: {out}");
    assert!(out.contains("--name dev-sandbox"), "got: {out}");
}

#[test]
fn malformed_value_exits_one() {
    let home = tempfile::tempdir().unwrap();
    let output = run(env!("CARGO_BIN_EXE_bubble"), home.path(), &["--npm"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("--npm"), "got: {}", stderr(&output));
}

#[test]
fn burst_help_exits_zero() {
    let home = tempfile::tempdir().unwrap();
    let output = run(env!("CARGO_BIN_EXE_bubble-burst"), home.path(), &["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("--yes"));
}

#[test]
fn short_h_reaches_the_container() {
    let home = tempfile::tempdir().unwrap();
    let output = run(env!("CARGO_BIN_EXE_bubble"), home.path(), &["--dryRun", "-h"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("bubble-sandbox-image -h"), "got: {out}");
}
