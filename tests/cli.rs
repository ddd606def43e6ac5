use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_percent_argument() {
    Command::cargo_bin("ramstress")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PERCENT"));
}

#[test]
fn missing_percent_argument_is_a_usage_error() {
    Command::cargo_bin("ramstress")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("PERCENT"));
}

#[test]
fn malformed_percentage_is_rejected_before_any_allocation() {
    Command::cargo_bin("ramstress")
        .unwrap()
        .arg("not-a-percent")
        .assert()
        .failure();
}

#[test]
fn verbose_and_quiet_are_mutually_exclusive() {
    Command::cargo_bin("ramstress")
        .unwrap()
        .args(["50%", "-v", "-q"])
        .assert()
        .failure();
}
