//! Integration tests for CLI argument handling
//!
//! Runs the compiled binary and checks the argument surface; nothing here
//! touches the network, since every case fails before the first request.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_meteospain"))
        .args(args)
        .env_remove("AEMET_API_KEY")
        .output()
        .expect("Failed to execute meteospain")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("meteospain"), "Help should mention meteospain");
    assert!(stdout.contains("province"), "Help should mention --province");
    assert!(stdout.contains("api-key"), "Help should mention --api-key");
}

#[test]
fn test_version_flag_exits_successfully() {
    let output = run_cli(&["--version"]);
    assert!(output.status.success());
}

#[test]
fn test_missing_api_key_fails() {
    let output = run_cli(&["08019"]);
    assert!(
        !output.status.success(),
        "Expected missing API key to fail"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("api-key") || stderr.contains("AEMET_API_KEY"),
        "Should point at the missing API key: {}",
        stderr
    );
}

#[test]
fn test_invalid_location_code_fails() {
    let output = run_cli(&["8019", "--api-key", "test-key"]);
    assert!(
        !output.status.success(),
        "Expected a 4-digit code to be rejected"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid location code"),
        "Should explain the code format: {}",
        stderr
    );
}

#[test]
fn test_names_without_dictionary_fail() {
    let output = run_cli(&[
        "--province",
        "Barcelona",
        "--municipality",
        "Igualada",
        "--api-key",
        "test-key",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("--municipalities"),
        "Should ask for the dictionary file: {}",
        stderr
    );
}
