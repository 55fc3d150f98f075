//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the ansisym-cli binary (finds it in target/debug when run via cargo test).
fn ansisym_cli() -> Command {
    cargo_bin_cmd!("ansisym-cli")
}

/// Path to ansisym library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("ansisym")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = ansisym_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("gEDA"));
}

#[test]
fn test_cli_version() {
    let mut cmd = ansisym_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_generate_writes_symbols() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = ansisym_cli();

    cmd.arg("generate")
        .arg(fixtures_dir().join("7404.json"))
        .arg("--output")
        .arg(out.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("7404.sym"))
        .stdout(predicate::str::contains("Wrote 2 file(s)"));

    let text = std::fs::read_to_string(out.path().join("7404.sym")).unwrap();
    assert!(text.starts_with("v 20100214 1\n"));
    assert!(text.contains("numslots=6"));
    assert!(out.path().join("7404-pwr.sym").exists());
}

#[test]
fn test_cli_generate_single_block() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = ansisym_cli();

    cmd.arg("generate")
        .arg(fixtures_dir().join("7404.json"))
        .arg("-o")
        .arg(out.path())
        .arg("--block")
        .arg("7404-pwr");

    cmd.assert().success();
    assert!(out.path().join("7404-pwr.sym").exists());
    assert!(!out.path().join("7404.sym").exists());
}

#[test]
fn test_cli_generate_to_stdout() {
    let mut cmd = ansisym_cli();

    cmd.arg("generate")
        .arg(fixtures_dir().join("single_pin.json"))
        .arg("--stdout");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("v 20100214 1"))
        .stdout(predicate::str::contains("pintype=in"))
        .stderr(predicate::str::contains("Standard attribute"));
}

#[test]
fn test_cli_generate_broken_part_fails() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = ansisym_cli();

    cmd.arg("generate")
        .arg(fixtures_dir().join("broken.json"))
        .arg("-o")
        .arg(out.path());

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("Pin 4 not used by package SO8."));
    assert!(!out.path().join("broken.sym").exists());
}

#[test]
fn test_cli_strict_mode() {
    let out = tempfile::tempdir().unwrap();
    let path = fixtures_dir().join("single_pin.json");

    let mut cmd = ansisym_cli();
    cmd.arg("generate").arg(&path).arg("-o").arg(out.path());
    cmd.assert().success();

    let strict_out = tempfile::tempdir().unwrap();
    let mut cmd = ansisym_cli();
    cmd.arg("generate")
        .arg(&path)
        .arg("-o")
        .arg(strict_out.path())
        .arg("--strict");
    cmd.assert().code(1);
    assert!(!strict_out.path().join("testpoint.sym").exists());
}

#[test]
fn test_cli_check_json_output() {
    let mut cmd = ansisym_cli();
    let path = fixtures_dir().join("74161.json");

    cmd.arg("check").arg(path).arg("--format").arg("json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["total_files"], 1);
    assert_eq!(value["summary"]["fatal"], 0);
}

#[test]
fn test_cli_check_directory() {
    let mut cmd = ansisym_cli();

    cmd.arg("check").arg(fixtures_dir());

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("broken.json"))
        .stdout(predicate::str::contains("7404.json"));
}

#[test]
fn test_cli_check_fail_on_warning() {
    let path = fixtures_dir().join("single_pin.json");

    let mut cmd = ansisym_cli();
    cmd.arg("check").arg(&path);
    cmd.assert().code(0);

    let mut cmd = ansisym_cli();
    cmd.arg("check").arg(&path).arg("--fail-on").arg("warning");
    cmd.assert().code(1);
}

#[test]
fn test_cli_check_nonexistent_file() {
    let mut cmd = ansisym_cli();

    cmd.arg("check").arg("does_not_exist.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_github_format() {
    let mut cmd = ansisym_cli();
    let path = fixtures_dir().join("broken.json");

    cmd.arg("check").arg(path).arg("--format").arg("github");

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("::error file="))
        .stdout(predicate::str::contains(",line=7::"));
}

#[test]
fn test_cli_directives_command() {
    let mut cmd = ansisym_cli();

    cmd.arg("directives");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("bidirstyle"))
        .stdout(predicate::str::contains("samewidth"));
}

#[test]
fn test_cli_directives_long() {
    let mut cmd = ansisym_cli();

    cmd.arg("directives").arg("--long");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Value: an integer"))
        .stdout(predicate::str::contains("Range: 0 to 1000000"));
}

#[test]
fn test_cli_out_of_range_directive_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.json");
    std::fs::write(
        &path,
        r#"{
            "attrs": [{"name": "refdes", "value": "U?"}, {"name": "device", "value": "WIDE"}],
            "directives": {"minwidth": 2147483600},
            "blocks": [{"kind": "block", "packages": [{"package": "P", "name": "wide"}],
                        "bands": [{"band": "top"},
                                  {"band": "io", "left": {"name": "A", "pins": {"P": [1]}}},
                                  {"band": "bottom"}]}]
        }"#,
    )
    .unwrap();

    let mut cmd = ansisym_cli();
    cmd.arg("generate").arg(&path).arg("-o").arg(dir.path());

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("out of range"));
    assert!(!dir.path().join("wide.sym").exists());
}

#[test]
fn test_cli_output_formats_are_different() {
    let path = fixtures_dir().join("broken.json");

    let mut cmd_human = ansisym_cli();
    cmd_human.arg("check").arg(&path).arg("--format").arg("human");
    let human_output = cmd_human.output().unwrap();

    let mut cmd_json = ansisym_cli();
    cmd_json.arg("check").arg(&path).arg("--format").arg("json");
    let json_output = cmd_json.output().unwrap();

    assert_ne!(
        human_output.stdout,
        json_output.stdout,
        "Different formats should produce different output"
    );
}
