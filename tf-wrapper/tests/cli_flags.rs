//! CLI tests for flag validation.
//!
//! Conflicting action flags must fail before the executable is resolved or the
//! config is read.

use std::fs;
use std::process::Command;

use tf_wrapper::exit_codes;

#[test]
fn apply_with_destroy_fails_before_any_work() {
    let temp = tempfile::tempdir().expect("tempdir");
    let empty_path = tempfile::tempdir().expect("tempdir");

    let output = Command::new(env!("CARGO_BIN_EXE_tf-wrapper"))
        .current_dir(temp.path())
        .env("PATH", empty_path.path())
        .args(["-apply", "-destroy"])
        .output()
        .expect("run tf-wrapper");

    assert_eq!(output.status.code(), Some(exit_codes::FATAL));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot use both -apply and -destroy flags simultaneously."));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Terraform"), "unexpected stdout: {stdout}");

    let leftovers: Vec<_> = fs::read_dir(temp.path()).expect("read dir").collect();
    assert!(leftovers.is_empty(), "working directory was touched");
}

#[test]
fn double_dash_spelling_is_also_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = Command::new(env!("CARGO_BIN_EXE_tf-wrapper"))
        .current_dir(temp.path())
        .args(["--destroy", "--apply"])
        .output()
        .expect("run tf-wrapper");

    assert_eq!(output.status.code(), Some(exit_codes::FATAL));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot use both"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let temp = tempfile::tempdir().expect("tempdir");

    let status = Command::new(env!("CARGO_BIN_EXE_tf-wrapper"))
        .current_dir(temp.path())
        .arg("-plan")
        .status()
        .expect("run tf-wrapper");

    assert!(!status.success());
}

#[test]
fn explicit_true_values_also_conflict() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = Command::new(env!("CARGO_BIN_EXE_tf-wrapper"))
        .current_dir(temp.path())
        .args(["-apply=true", "-destroy=T"])
        .output()
        .expect("run tf-wrapper");

    assert_eq!(output.status.code(), Some(exit_codes::FATAL));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot use both"));
}
