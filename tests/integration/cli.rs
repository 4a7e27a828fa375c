//! Binary-level tests for the contest CLI.

use assert_cmd::Command;
use predicates::prelude::*;

fn contest() -> Command {
    Command::cargo_bin("contest").expect("contest binary")
}

#[test]
fn missing_arguments_fail_with_usage() {
    contest()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_command_fails_with_usage() {
    contest()
        .args(["contest_recipe.yaml", "lonely"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn records_a_simple_command() {
    let dir = tempfile::tempdir().unwrap();

    contest()
        .current_dir(dir.path())
        .args(["contest_recipe.yaml", "smoke", "echo", "hello"])
        .assert()
        .success();

    let text = std::fs::read_to_string(dir.path().join("contest_recipe.yaml")).unwrap();
    assert!(text.contains("executable: echo"));
    assert!(text.contains("smoke:"));
    assert!(text.contains("return-code: 0"));
}

#[cfg(unix)]
#[test]
fn records_interactive_input_from_stdin() {
    let dir = tempfile::tempdir().unwrap();

    contest()
        .current_dir(dir.path())
        .args([
            "contest_recipe.yaml",
            "typed",
            "sh",
            "-c",
            "read line; echo \"got $line\"",
        ])
        .write_stdin("ping\n")
        .assert()
        .success();

    let text = std::fs::read_to_string(dir.path().join("contest_recipe.yaml")).unwrap();
    assert!(text.contains("- ping"));
    assert!(text.contains("got ping"));
}

#[test]
fn duplicate_name_exits_nonzero_with_message() {
    let dir = tempfile::tempdir().unwrap();

    contest()
        .current_dir(dir.path())
        .args(["contest_recipe.yaml", "smoke", "echo", "hello"])
        .assert()
        .success();

    contest()
        .current_dir(dir.path())
        .args(["contest_recipe.yaml", "smoke", "echo", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "smoke is already a test case! Choose a new name!",
        ));
}

#[test]
fn missing_executable_exits_nonzero_with_message() {
    let dir = tempfile::tempdir().unwrap();

    contest()
        .current_dir(dir.path())
        .args(["contest_recipe.yaml", "ghost", "contest-no-such-binary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to start"));
}
