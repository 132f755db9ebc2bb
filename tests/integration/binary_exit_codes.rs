//! End-to-end tests for the vrg binary: stable exit codes and stream usage.

use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

use super::support::OneShotServer;

const CLEARED_VARS: &[&str] = &[
    "VERGE_HOST",
    "VERGE_USERNAME",
    "VERGE_PASSWORD",
    "VERGE_TOKEN",
    "VERGE_VERIFY_SSL",
    "VRG_LOG",
    "VRG_LOG_FORMAT",
    "VRG_LOG_OUTPUT",
    "VRG_DEFAULT_PROFILE",
    "VRG_OUTPUT__FORMAT",
];

fn vrg(home: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_vrg");
    let mut command = Command::new(bin);
    for name in CLEARED_VARS {
        command.env_remove(name);
    }
    command
        .env("HOME", home.join("home"))
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_STATE_HOME", home.join("state"))
        .env("NO_COLOR", "1")
        .stdin(Stdio::null())
        .args(args)
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_conflicting_create_flags_exit_usage() {
    let temp = TempDir::new().unwrap();
    let output = vrg(
        temp.path(),
        &["snapshot", "create", "--retention", "3600", "--never-expire"],
    );
    assert_eq!(output.status.code(), Some(2), "stderr={}", stderr(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_missing_host_exits_config() {
    let temp = TempDir::new().unwrap();
    let output = vrg(temp.path(), &["snapshot", "list"]);
    assert_eq!(output.status.code(), Some(3), "stderr={}", stderr(&output));
    assert!(stderr(&output).contains("no VergeOS host configured"));
}

#[test]
fn test_zero_retention_exits_validation_before_connecting() {
    let temp = TempDir::new().unwrap();
    // No host configured: validation must fire first.
    let output = vrg(temp.path(), &["snapshot", "create", "--retention", "0"]);
    assert_eq!(output.status.code(), Some(8), "stderr={}", stderr(&output));
}

#[test]
fn test_unknown_profile_exits_config() {
    let temp = TempDir::new().unwrap();
    let output = vrg(temp.path(), &["--profile", "nope", "snapshot", "list"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_connection_refused_exits_connection() {
    let temp = TempDir::new().unwrap();
    let output = vrg(
        temp.path(),
        &[
            "--host",
            "http://127.0.0.1:1",
            "--token",
            "x",
            "snapshot",
            "get",
            "5",
        ],
    );
    assert_eq!(output.status.code(), Some(10), "stderr={}", stderr(&output));
}

#[test]
fn test_not_found_exits_six() {
    let temp = TempDir::new().unwrap();
    let server = OneShotServer::start(vec![(200, "[]")]);
    let output = vrg(
        temp.path(),
        &[
            "--host",
            server.url.as_str(),
            "--token",
            "x",
            "snapshot",
            "get",
            "ghost",
        ],
    );
    server.finish();
    assert_eq!(output.status.code(), Some(6), "stderr={}", stderr(&output));
    assert!(stderr(&output).contains("Snapshot not found: ghost"));
}

#[test]
fn test_list_prints_table_to_stdout() {
    let temp = TempDir::new().unwrap();
    let server = OneShotServer::start(vec![(
        200,
        r#"[{"$key": 7, "name": "nightly", "created": 1700000000, "expires": 0, "status": "normal"}]"#,
    )]);
    let output = vrg(
        temp.path(),
        &["--host", server.url.as_str(), "--token", "x", "snapshot", "list"],
    );
    server.finish();
    assert!(output.status.success(), "stderr={}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("nightly"));
    assert!(out.contains("never"));
    assert!(!out.contains('\u{1b}'));
}

#[test]
fn test_config_show_succeeds_without_connection() {
    let temp = TempDir::new().unwrap();
    let output = vrg(temp.path(), &["config", "show"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert!(stdout(&output).contains("default_profile"));
}

#[test]
fn test_delete_without_terminal_requires_yes() {
    let temp = TempDir::new().unwrap();
    let server = OneShotServer::start(vec![(
        200,
        r#"{"$key": 7, "name": "nightly", "expires": 0, "status": "normal"}"#,
    )]);
    let output = vrg(
        temp.path(),
        &[
            "--host",
            server.url.as_str(),
            "--token",
            "x",
            "snapshot",
            "delete",
            "7",
        ],
    );
    let requests = server.finish();
    assert_eq!(output.status.code(), Some(8), "stderr={}", stderr(&output));
    assert!(stderr(&output).contains("--yes"));
    assert_eq!(requests.len(), 1);
    assert!(requests[0].request_line.starts_with("GET /api/v4/cloud_snapshots/7"));
    assert!(!requests.iter().any(|r| r.request_line.starts_with("DELETE")));
}
