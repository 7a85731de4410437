//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("cidash").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("emails"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("cidash").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Create missing tables"));
}

#[test]
fn test_emails_lookup_help() {
    let mut cmd = Command::cargo_bin("cidash").unwrap();
    cmd.arg("emails").arg("lookup").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Notification category code"));
}

#[test]
fn test_emails_lookup_requires_category() {
    let mut cmd = Command::cargo_bin("cidash").unwrap();
    cmd.args(["emails", "lookup", "--user", "1", "--build", "2"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--category"));
}

#[test]
fn test_emails_record_help() {
    let mut cmd = Command::cargo_bin("cidash").unwrap();
    cmd.arg("emails").arg("record").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Recipient address"))
        .stdout(predicate::str::contains("Subject line"));
}
