//! Tests of the `update-dependencies` binary.
//!
//! Only argument handling is exercised here: anything past parsing would hit
//! the root guard when the suite itself runs as root, and the real pipeline
//! needs git, Maven and network access.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_flags() {
    Command::cargo_bin("update-dependencies")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--flatpak"))
        .stdout(predicate::str::contains("--manifest"))
        .stdout(predicate::str::contains("--module"))
        .stdout(predicate::str::contains("FLATPAK_MAVEN_DEPS_MANIFEST"));
}

#[test]
fn test_version() {
    Command::cargo_bin("update-dependencies")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("update-dependencies "));
}

#[test]
fn test_verbose_and_quiet_rejected() {
    Command::cargo_bin("update-dependencies")
        .unwrap()
        .args(["--verbose", "--quiet"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_positional_arguments_rejected() {
    Command::cargo_bin("update-dependencies")
        .unwrap()
        .arg("install")
        .assert()
        .failure()
        .code(2);
}
