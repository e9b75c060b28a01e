//! End-to-end tests against the demo binaries

mod common;

use common::demo;
use predicates::prelude::*;

#[test]
fn test_clone_prints_in_verbose_mode() {
    demo("bad-git")
        .args(["-v", "clone", "repo-url", "dest-dir"])
        .assert()
        .success()
        .stdout("git clone repo-url dest-dir\n");
}

#[test]
fn test_clone_with_branch_and_trailing_global() {
    demo("bad-git")
        .args(["clone", "url", "dir", "--branch", "dev", "-v"])
        .assert()
        .success()
        .stdout("git clone -b dev url dir\n");
}

#[test]
fn test_clone_is_quiet_without_verbose() {
    demo("bad-git")
        .args(["clone", "url", "dir"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_commit_switch_and_value() {
    demo("bad-git")
        .args(["commit", "-a", "-m", "hi"])
        .assert()
        .success()
        .stdout("all=true\nmessage=hi\n");
}

#[test]
fn test_commit_defaults() {
    demo("bad-git")
        .arg("commit")
        .assert()
        .success()
        .stdout("all=false\nmessage=None\n");
}

#[test]
fn test_add_variadic_files() {
    demo("bad-git")
        .args(["-v", "add", "x.txt", "y.txt", "-u"])
        .assert()
        .success()
        .stdout("adding files: [\"x.txt\", \"y.txt\"]\nupdated only\n");
}

#[test]
fn test_push_force_switch() {
    demo("bad-git")
        .args(["push", "origin", "main", "--force", "-v"])
        .assert()
        .success()
        .stdout("git push -f origin main\n");
}

#[test]
fn test_missing_subcommand_prints_help() {
    demo("bad-git")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"))
        .stderr(predicate::str::contains("clone"));
}

#[test]
fn test_missing_positional_is_usage_error() {
    demo("bad-git")
        .args(["clone", "only-url"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    demo("bad-git")
        .args(["commit", "--amend"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_subcommand_help_uses_doc_and_defaults() {
    demo("bad-git")
        .args(["clone", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Clone the branch so you can melt your computer."))
        .stdout(predicate::str::contains("Repository to clone"))
        .stdout(predicate::str::contains("default: None"));
}

#[test]
fn test_debug_toggle_traces_construction() {
    demo("bad-git")
        .env("SIGCLI_DEBUG", "1")
        .args(["commit"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[DEBUG]"))
        .stderr(predicate::str::contains("adding flag"));
}

#[test]
fn test_no_debug_output_by_default() {
    demo("bad-git")
        .args(["commit"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[DEBUG]").not());
}

#[test]
fn test_greet_defaults() {
    demo("greet")
        .arg("bob")
        .assert()
        .success()
        .stdout("sup, bob\n");
}

#[test]
fn test_greet_overridden_short_flag() {
    demo("greet")
        .args(["bob", "-g", "hey", "--num-times", "2"])
        .assert()
        .success()
        .stdout("hey, bob\nhey, bob\n");
}

#[test]
fn test_greet_type_coercion_failure() {
    demo("greet")
        .args(["bob", "--num-times", "two"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("two"));
}

#[test]
fn test_greet_handler_error() {
    demo("greet")
        .args(["bob", "--num-times=-1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("num-times must not be negative"));
}

#[test]
fn test_greet_help_and_version() {
    demo("greet")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reach out and greet somebody."))
        .stdout(predicate::str::contains("Who to greet"))
        .stdout(predicate::str::contains("Greeting to use. default: sup"));

    demo("greet")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(sigcli::VERSION));
}
