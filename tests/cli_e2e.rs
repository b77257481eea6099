//! End-to-end CLI tests for vkpack.
//!
//! These tests run the actual binary and check argument handling. Anything
//! past argument parsing would hit the real API, so network-dependent
//! behavior is covered by the integration tests over fakes instead.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;

fn vkpack() -> Command {
    Command::cargo_bin("vkpack").expect("binary should build")
}

// ============================================================================
// Argument validation
// ============================================================================

#[test]
fn test_no_args_shows_usage() {
    vkpack()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_action_fails() {
    vkpack()
        .args(["12345", "token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ACTION").or(predicate::str::contains("action")));
}

#[test]
fn test_unknown_action_fails() {
    vkpack()
        .args(["12345", "token", "spreadsheet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_unknown_flag_fails() {
    vkpack()
        .args(["--bogus", "12345", "token", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bogus"));
}

// ============================================================================
// Help and version
// ============================================================================

#[test]
fn test_help_lists_actions() {
    vkpack()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("json"))
        .stdout(predicate::str::contains("text"))
        .stdout(predicate::str::contains("audio"))
        .stdout(predicate::str::contains("photo"))
        .stdout(predicate::str::contains("html"))
        .stdout(predicate::str::contains("archive"));
}

#[test]
fn test_help_documents_positionals() {
    vkpack()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PEER_ID"))
        .stdout(predicate::str::contains("TOKEN"));
}

#[test]
fn test_version_prints_crate_version() {
    vkpack()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
