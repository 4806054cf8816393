//! End-to-end tests for the `immunograph` binary

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn sample(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("samples/graphs")
        .join(name)
}

/// Run the binary with its config directory redirected into `home`
fn run(home: &Path, args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_immunograph"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("APPDATA", home)
        .output()
        .expect("Failed to run immunograph")
}

#[test]
fn test_renders_svg_and_exits_zero() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = temp_dir.path().join("triangle.svg");

    let result = run(temp_dir.path(), &[&sample("triangle.csv"), &output]);

    assert!(result.status.success(), "{result:?}");
    assert!(fs::metadata(&output).unwrap().len() > 0);
    assert!(String::from_utf8_lossy(&result.stdout).contains("Rendered"));
}

#[test]
fn test_parse_failure_exits_with_load_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = temp_dir.path().join("broken.svg");

    let result = run(temp_dir.path(), &[&sample("missing_sentinel.csv"), &output]);

    assert_eq!(result.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Failed to load"));
    assert!(stderr.contains("row 2"));
    assert!(!output.exists());
}

#[test]
fn test_oversized_header_exits_with_load_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("huge.csv");
    let output = temp_dir.path().join("huge.svg");
    fs::write(&input, "9223372036854775807\n0,1,-1\n").unwrap();

    let result = run(temp_dir.path(), &[&input, &output]);

    assert_eq!(result.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Failed to load"));
    assert!(stderr.contains("exceeds the limit"));
    assert!(!output.exists());
}

#[test]
fn test_missing_input_exits_with_access_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("absent.csv");
    let output = temp_dir.path().join("absent.svg");

    let result = run(temp_dir.path(), &[&input, &output]);

    assert_eq!(result.status.code(), Some(3));
    assert!(!output.exists());
}

#[test]
fn test_unknown_extension_exits_with_render_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = temp_dir.path().join("graph.unknown");

    let result = run(temp_dir.path(), &[&sample("triangle.csv"), &output]);

    assert_eq!(result.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&result.stderr).contains("Failed to render"));
    assert!(!output.exists());
}

#[test]
fn test_missing_arguments_is_usage_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let result = run(temp_dir.path(), &[&sample("triangle.csv")]);

    assert_eq!(result.status.code(), Some(2));
}
