//! Integration tests for the `surfbatch` CLI binary.
//!
//! Argument parsing and input checks run without any upstream; batch
//! runs point `--base-url` at a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `surfbatch` binary with env isolation.
///
/// Clears all `SURFBATCH_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn surfbatch_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("surfbatch");
    cmd.env("HOME", "/tmp/surfbatch-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/surfbatch-cli-test-nonexistent")
        .env_remove("SURFBATCH_CONFIG")
        .env_remove("SURFBATCH_BASE_URL")
        .env_remove("SURFBATCH_EMAIL")
        .env_remove("SURFBATCH_PASSWORD")
        .env_remove("SURFBATCH_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Command wired to a mock upstream with credentials in the environment.
fn batch_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = surfbatch_cmd();
    cmd.env("SURFBATCH_BASE_URL", format!("{}/v2", server.uri()))
        .env("SURFBATCH_EMAIL", "ops@example.com")
        .env("SURFBATCH_PASSWORD", "pw");
    cmd
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v2/authenticate"))
        .and(body_json(json!({"email": "ops@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "token": "tok", "organizationId": "org" }
        })))
        .mount(server)
        .await;
}

/// Run a prepared command off the async runtime so wiremock keeps serving.
async fn output_of(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = surfbatch_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_subcommands() {
    surfbatch_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("validate")
            .and(predicate::str::contains("billing"))
            .and(predicate::str::contains("quality"))
            .and(predicate::str::contains("serve")),
    );
}

#[test]
fn test_version_flag() {
    surfbatch_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("surfbatch"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    surfbatch_cmd()
        .args(["--config", "/tmp/surfbatch-custom.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/surfbatch-custom.toml"));
}

#[test]
fn test_config_show_masks_password() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(
        &file,
        "[account]\nemail = \"ops@example.com\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    surfbatch_cmd()
        .args(["--config", file.to_str().unwrap(), "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ops@example.com")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

// ── Input checks (no upstream) ──────────────────────────────────────

#[test]
fn test_validate_rejects_non_digit_imei() {
    let output = surfbatch_cmd()
        .args(["validate", "12ab"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("digits"));
}

#[test]
fn test_validate_without_imeis_is_usage_error() {
    let output = surfbatch_cmd().arg("validate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("No IMEIs given"));
}

#[test]
fn test_quality_level_out_of_range() {
    for level in ["1", "7"] {
        let output = surfbatch_cmd()
            .args(["quality", "--level", level, "111"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(2), "level {level}");
        assert!(combined_output(&output).contains("between 2 and 6"));
    }
}

#[test]
fn test_billing_rejects_unknown_status() {
    surfbatch_cmd()
        .args(["billing", "--status", "activated", "111"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_billing_needs_yes_without_terminal() {
    let output = surfbatch_cmd()
        .args(["billing", "--status", "suspended", "111"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("requires confirmation"));
}

#[test]
fn test_validate_without_email_is_auth_error() {
    let output = surfbatch_cmd()
        .args(["validate", "111"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("No account email configured"));
}

// ── Batches against a mock upstream ─────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_validate_json_output() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/v2/devices/111/billing-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "billingStatus": "suspended" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/devices/222/billing-status"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut cmd = batch_cmd(&server);
    cmd.args(["-o", "json-compact", "validate", "111,222"]);
    let output = output_of(cmd).await;

    assert_eq!(output.status.code(), Some(0), "{}", combined_output(&output));
    let records: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records[0]["imei"], json!("111"));
    assert_eq!(records[0]["detail"], json!("Suspended"));
    assert_eq!(records[1]["found"], json!(false));
    assert_eq!(records[1]["statusCode"], json!(404));
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 ok, 1 not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_billing_with_yes_makes_one_bulk_call() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("PUT"))
        .and(path("/v2/devices/billing-status/pendingActivation"))
        .and(body_json(json!({"imeis": ["111", "222"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = batch_cmd(&server);
    cmd.args([
        "-y",
        "-o",
        "plain",
        "billing",
        "--status",
        "pending-activation",
        "111",
        "222",
    ]);
    let output = output_of(cmd).await;

    assert_eq!(output.status.code(), Some(0), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        "111\tPending Activation\n222\tPending Activation"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_billing_rejection_exits_with_upstream_code() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("PUT"))
        .and(path("/v2/devices/billing-status/suspended"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "bad list"})))
        .mount(&server)
        .await;

    let mut cmd = batch_cmd(&server);
    cmd.args(["-y", "billing", "--status", "suspended", "111"]);
    let output = output_of(cmd).await;

    assert_eq!(output.status.code(), Some(5));
    assert!(combined_output(&output).contains("bad list"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_rejected_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/authenticate"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "nope"})))
        .mount(&server)
        .await;

    let mut cmd = batch_cmd(&server);
    cmd.args(["validate", "111"]);
    let output = output_of(cmd).await;

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("Authentication failed"));
}
