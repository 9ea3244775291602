//! Integration tests for the `godecl` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn godecl(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_godecl"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

/// Workspace with one valid file in a nested package and one broken file.
fn setup_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    let pkg = dir.path().join("pkg");
    fs::create_dir(&pkg).unwrap();

    fs::write(
        pkg.join("person.go"),
        "package pkg\n\ntype Person struct {\n\tName string\n}\n",
    )
    .unwrap();
    fs::write(pkg.join("notes.txt"), "not go").unwrap();
    fs::write(dir.path().join("broken.go"), "package broken\n\nfunc (\n").unwrap();
    dir
}

#[test]
fn parse_help() {
    let dir = TempDir::new().unwrap();
    let output = godecl(&["parse", "--help"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--encoding"));
    assert!(stdout.contains("--trailing-footer"));
}

#[test]
fn parse_prints_json_tree() {
    let dir = setup_workspace();
    let output = godecl(&["parse", "--compact", "pkg/person.go"], dir.path());

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let tree: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();

    assert_eq!(tree["nodes"][0]["type"], "Package");
    assert_eq!(tree["nodes"][0]["name"], "pkg");
    assert_eq!(tree["containers"][0]["type"], "Struct");
    assert_eq!(tree["containers"][0]["name"], "Person");
    assert_eq!(tree["containers"][0]["headerSpan"]["start"], 12);
    assert_eq!(tree["footerSpan"]["end"], -1);
    assert!(tree["parsingErrors"].is_null());
}

#[test]
fn parse_walks_directories_for_go_files() {
    let dir = setup_workspace();
    let output = godecl(&["parse", "--compact", "."], dir.path());

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let trees: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(trees.len(), 2);
    // broken.go sorts before pkg/person.go and carries its syntax error
    assert_eq!(trees[0]["parsingErrors"].as_array().unwrap().len(), 1);
    assert_eq!(trees[1]["containers"][0]["name"], "Person");
}

#[test]
fn parse_rejects_unsupported_encoding() {
    let dir = setup_workspace();
    let output = godecl(&["parse", "--encoding", "latin1", "pkg/person.go"], dir.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported encoding 'latin1'"), "{stderr}");
}

#[test]
fn trailing_footer_flag() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("tail.go"),
        "package tail\n\nconst A = 1\n\n// end of file\n",
    )
    .unwrap();

    let output = godecl(&["parse", "--compact", "--trailing-footer", "tail.go"], dir.path());
    assert!(output.status.success(), "{output:?}");
    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree["footerSpan"]["start"], 26);
    assert_eq!(tree["footerSpan"]["end"], 42);
}

#[test]
fn config_file_is_discovered() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("godecl.toml"),
        "[parse]\ntrailing_footer = true\n",
    )
    .unwrap();
    fs::write(dir.path().join("tail.go"), "package tail\n\n// trailing\n").unwrap();

    let output = godecl(&["parse", "--compact", "tail.go"], dir.path());
    assert!(output.status.success(), "{output:?}");
    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree["footerSpan"]["start"], 13);
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.toml"), "[parse]\nencoding = \"UTF-16\"\n").unwrap();
    fs::write(dir.path().join("a.go"), "package a\n").unwrap();

    let output = godecl(&["parse", "--config", "bad.toml", "a.go"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("UTF-16"), "{stderr}");
}

#[test]
fn check_reports_syntax_errors() {
    let dir = setup_workspace();
    let output = godecl(&["check", "."], dir.path());

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("person.go"));
    assert!(stderr.contains("broken.go"));
    assert!(stdout.contains("1 with syntax errors"));
}

#[test]
fn check_succeeds_on_clean_tree() {
    let dir = setup_workspace();
    let output = godecl(&["check", "pkg"], dir.path());
    assert!(output.status.success(), "{output:?}");
}
