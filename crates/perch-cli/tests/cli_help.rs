use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("perch")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("personas"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("transcribe"));
}

#[test]
fn test_personas_help_shows_subcommands() {
    cargo_bin_cmd!("perch")
        .args(["personas", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("describe"))
        .stdout(predicate::str::contains("rate"));
}

#[test]
fn test_chat_help_shows_temperature() {
    cargo_bin_cmd!("perch")
        .args(["chat", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("temperature"))
        .stdout(predicate::str::contains("no-history"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("perch")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
