//! Integration tests for the `lwmig` binary.
//!
//! Argument parsing, help output, completions, config display and
//! configuration errors, all without a live Tektelic or Things Stack server.
#![allow(clippy::unwrap_used)]

use std::io::Write as _;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command with env isolation: no deployment env vars and a config
/// directory that does not exist.
fn lwmig_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("lwmig");
    cmd.env("HOME", "/tmp/lwmig-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/lwmig-cli-test-nonexistent")
        .env_remove("RUST_LOG")
        .env_remove("LWMIG_CONFIG")
        .env_remove("LWMIG_DEVICES")
        .env_remove("LWMIG_CONCURRENCY")
        .env_remove("LWMIG_TIMEOUT")
        .env_remove("LWMIG_LOG_FORMAT")
        .env_remove("TEKTELIC_BASE_URL")
        .env_remove("TEKTELIC_BEARER_TOKEN")
        .env_remove("TEKTELIC_APP_ID")
        .env_remove("TTS_BASE_URL")
        .env_remove("TTS_HOST")
        .env_remove("TTS_BEARER_TOKEN")
        .env_remove("TTS_APP_ID");
    cmd
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const FULL: &str = r#"
[source]
base_url = "http://127.0.0.1:9"
app_id = "tek-app"
bearer_token = "tektelic-secret"

[target]
base_url = "http://127.0.0.1:9"
host = "eu1.cloud.thethings.network"
app_id = "migrated"
bearer_token = "NNSXS.SECRET"
"#;

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    lwmig_cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_subcommands() {
    lwmig_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("migrate")
            .and(predicate::str::contains("inspect"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn version_flag() {
    lwmig_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lwmig"));
}

#[test]
fn completions_bash() {
    lwmig_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn zero_concurrency_is_rejected_by_parser() {
    lwmig_cmd()
        .args(["migrate", "--concurrency", "0"])
        .assert()
        .code(2);
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn config_path_honors_flag() {
    lwmig_cmd()
        .args(["config", "path", "--config", "/etc/lwmig/site.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/etc/lwmig/site.toml"));
}

#[test]
fn config_show_redacts_tokens() {
    let file = config_file(FULL);
    lwmig_cmd()
        .args(["config", "show", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("app_id = \"tek-app\"")
                .and(predicate::str::contains("********"))
                .and(predicate::str::contains("tektelic-secret").not())
                .and(predicate::str::contains("NNSXS.SECRET").not()),
        );
}

#[test]
fn config_show_includes_environment() {
    let file = config_file(FULL);
    lwmig_cmd()
        .args(["config", "show", "--config"])
        .arg(file.path())
        .env("TTS_APP_ID", "from-env")
        .assert()
        .success()
        .stdout(predicate::str::contains("app_id = \"from-env\""));
}

#[test]
fn missing_explicit_config_file_fails() {
    lwmig_cmd()
        .args(["migrate", "--config", "/tmp/lwmig-cli-test-nonexistent/none.toml"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn migrate_without_settings_reports_missing_setting() {
    lwmig_cmd()
        .arg("migrate")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("source.base_url"));
}

#[test]
fn malformed_device_flag_fails_validation() {
    let file = config_file(FULL);
    lwmig_cmd()
        .args(["migrate", "--device", "not-an-eui", "--config"])
        .arg(file.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("migration.devices"));
}

// ── Runs against unreachable backends ───────────────────────────────

#[test]
fn migrate_with_unreachable_source_still_exits_zero() {
    let file = config_file(FULL);
    lwmig_cmd()
        .args(["migrate", "--timeout", "2", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("No devices found for application tek-app"));
}

#[test]
fn inspect_with_unreachable_source_fails() {
    let file = config_file(FULL);
    lwmig_cmd()
        .args(["inspect", "--timeout", "2", "--config"])
        .arg(file.path())
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Could not connect"));
}
