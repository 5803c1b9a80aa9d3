//! Exit status of the command line tool.

use json2relcsv::melt::{EXIT_FATAL, EXIT_PARTIAL_EXPORT, EXIT_SUCCESS};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn run(input: &str, out_dir: &Path) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_json2relcsv"))
        .arg("--out-dir")
        .arg(out_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn status(output: &Output) -> i32 {
    output.status.code().unwrap()
}

#[test]
fn complete_export_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(r#"{"name": "Ann", "tags": ["x"]}"#, dir.path());

    assert_eq!(status(&output), i32::from(EXIT_SUCCESS));
    assert!(dir.path().join("root.csv").is_file());
    assert!(dir.path().join("root_tags.csv").is_file());
}

#[test]
fn malformed_input_exits_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(r#"{"name": "#, dir.path());

    assert_eq!(status(&output), i32::from(EXIT_FATAL));
    assert!(!dir.path().join("root.csv").exists());
}

#[test]
fn blocked_table_exits_partial() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("root.csv")).unwrap();

    let output = run(r#"{"name": "Ann", "tags": ["x"]}"#, dir.path());

    assert_eq!(status(&output), i32::from(EXIT_PARTIAL_EXPORT));
    assert!(dir.path().join("root_tags.csv").is_file());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not write"));
}

#[test]
fn overly_deep_input_exits_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&"[".repeat(200_000), dir.path());

    assert_eq!(status(&output), i32::from(EXIT_FATAL));
}
