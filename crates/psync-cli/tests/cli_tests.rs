//! Black-box CLI tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_both_families() {
    Command::cargo_bin("psync")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("prompts"))
        .stdout(predicate::str::contains("connections"));
}

#[test]
fn test_prompt_push_help_lists_flags() {
    Command::cargo_bin("psync")
        .unwrap()
        .args(["prompts", "push", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--debug-diff"))
        .stdout(predicate::str::contains("--commit"));
}

#[test]
fn test_missing_registry_url_fails_with_exit_one() {
    Command::cargo_bin("psync")
        .unwrap()
        .env_remove("PSYNC_REGISTRY_URL")
        .args(["prompts", "check"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("PSYNC_REGISTRY_URL"));
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    Command::cargo_bin("psync")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}
