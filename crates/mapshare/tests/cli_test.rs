//! Integration tests for the `mapshare` CLI binary.
//!
//! Argument parsing, config commands and error exit codes run offline;
//! the send paths run against a wiremock MapShare.
#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `mapshare` binary with env isolation.
///
/// Clears all `MAPSHARE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn mapshare_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mapshare");
    cmd.env("HOME", "/tmp/mapshare-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/mapshare-cli-test-nonexistent")
        .env_remove("MAPSHARE_PROFILE")
        .env_remove("MAPSHARE_CONFIG")
        .env_remove("MAPSHARE_LINK")
        .env_remove("MAPSHARE_BASE_URL")
        .env_remove("MAPSHARE_OUTPUT")
        .env_remove("MAPSHARE_TIMEOUT")
        .env_remove("MAPSHARE_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &Path, contents: &str) -> String {
    let path = dir.join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path.display().to_string()
}

fn profile_config(base_url: &str) -> String {
    format!(
        r#"
default_profile = "trail"

[profiles.trail]
link_name = "TrailCrew"
base_url = "{base_url}"
password = "hunter2"
from_addr = "Basecamp"
timeout = 5

[profiles.trail.devices.300012345]
Id = "99"
Name = "Alice inReach"
"Map Display Name" = "Alice"
"#
    )
}

async fn mount_mapshare(server: &MockServer, send_status: u16) {
    Mock::given(method("GET"))
        .and(path("/TrailCrew/"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "ASP.NET_SessionId=abc; path=/"),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/TrailCrew/Map/SendMessageToDevices"))
        .respond_with(ResponseTemplate::new(send_status))
        .mount(server)
        .await;
}

async fn posted_bodies(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|req| req.method.as_str() == "POST")
        .map(|req| String::from_utf8_lossy(&req.body).into_owned())
        .collect()
}

/// Run the binary off the async test thread.
async fn run(cmd: assert_cmd::Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || {
        let mut cmd = cmd;
        cmd.assert()
    })
    .await
    .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = mapshare_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Expected 'Usage' in output:\n{stderr}");
}

#[test]
fn test_help_lists_commands() {
    mapshare_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("send")
            .and(predicate::str::contains("notify"))
            .and(predicate::str::contains("config"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn test_version_flag() {
    mapshare_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mapshare"));
}

#[test]
fn test_completions_bash() {
    mapshare_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_send_requires_a_target() {
    mapshare_cmd()
        .args(["--link", "TrailCrew", "send", "hello"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--to"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");

    mapshare_cmd()
        .args(["--config", path.to_str().unwrap(), "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_show_masks_passwords() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &profile_config("http://127.0.0.1:9/"));

    mapshare_cmd()
        .args(["--config", &config, "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("TrailCrew")
                .and(predicate::str::contains("********"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_config_show_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &profile_config("http://127.0.0.1:9/"));

    mapshare_cmd()
        .args(["--config", &config, "-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"default_profile\": \"trail\""));
}

// ── Error exit codes ────────────────────────────────────────────────

#[test]
fn test_send_without_link_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    mapshare_cmd()
        .args(["--config", config.to_str().unwrap(), "send", "hi", "--to", "99"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No MapShare link configured"));
}

#[test]
fn test_unknown_profile_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &profile_config("http://127.0.0.1:9/"));

    mapshare_cmd()
        .args(["--config", &config, "-p", "lab", "send", "hi", "--to", "99"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("lab").and(predicate::str::contains("trail")));
}

#[test]
fn test_invalid_base_url_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    mapshare_cmd()
        .args([
            "--config",
            config.to_str().unwrap(),
            "--link",
            "TrailCrew",
            "--base-url",
            "not a url",
            "send",
            "hi",
            "--to",
            "99",
        ])
        .assert()
        .code(2);
}

// ── Sending ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_send_raw_id_with_link_flag() {
    let server = MockServer::start().await;
    mount_mapshare(&server, 200).await;
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let mut cmd = mapshare_cmd();
    cmd.args([
        "--config",
        config.to_str().unwrap(),
        "--link",
        "TrailCrew",
        "--base-url",
        &server.uri(),
        "send",
        "hello there",
        "--to",
        "12345",
    ]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Sent to 12345"));

    let bodies = posted_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains("deviceIds=12345"), "body: {}", bodies[0]);
    assert!(bodies[0].contains("fromAddr=HomeAssistant"), "body: {}", bodies[0]);
}

#[tokio::test]
async fn test_send_device_key_uses_profile_devices() {
    let server = MockServer::start().await;
    mount_mapshare(&server, 200).await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &profile_config(&server.uri()));

    let mut cmd = mapshare_cmd();
    cmd.args([
        "--config", &config, "-o", "json-compact", "send", "hi", "--to", "300012345",
    ]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains(
            r#"{"outcome":"sent","device_ids":["99"]}"#,
        ));

    let bodies = posted_bodies(&server).await;
    assert!(bodies[0].contains("deviceIds=99"), "body: {}", bodies[0]);
    assert!(bodies[0].contains("fromAddr=Basecamp"), "body: {}", bodies[0]);
}

#[tokio::test]
async fn test_notify_by_display_name() {
    let server = MockServer::start().await;
    mount_mapshare(&server, 200).await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &profile_config(&server.uri()));

    let mut cmd = mapshare_cmd();
    cmd.args([
        "--config", &config, "notify", "camp at the lake", "-t", "Alice", "--from", "Ranger",
    ]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Sent to 99"));

    let bodies = posted_bodies(&server).await;
    assert!(bodies[0].contains("fromAddr=Ranger"), "body: {}", bodies[0]);
}

#[tokio::test]
async fn test_notify_unknown_name_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &profile_config(&server.uri()));

    let mut cmd = mapshare_cmd();
    cmd.args(["--config", &config, "notify", "hello", "-t", "Carol"]);
    run(cmd)
        .await
        .code(4)
        .stderr(predicate::str::contains("No valid device targets"));
}

#[tokio::test]
async fn test_rejected_send_exits_with_connection_code() {
    let server = MockServer::start().await;
    mount_mapshare(&server, 500).await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &profile_config(&server.uri()));

    let mut cmd = mapshare_cmd();
    cmd.args(["--config", &config, "send", "hi", "--to", "300012345"]);
    run(cmd)
        .await
        .code(7)
        .stderr(predicate::str::contains("Sending the message failed"));
}
