//! CLI tests for the `drill` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn drill(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_drill"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("run drill")
}

fn shipped_cases() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("cases")
}

fn write_case(dir: &Path, id: &str, bonus: bool, expect: &str) {
    let contents = format!(
        "[case]\nid = \"{id}\"\nbonus = {bonus}\n\n[[checks]]\ntype = \"ranges\"\ninput = \"1-3\"\nexpect = {expect}\n"
    );
    fs::write(dir.join(format!("{id}.toml")), contents).expect("write case");
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn shipped_cases_all_succeed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let cases = shipped_cases();
    let output = drill(
        temp.path(),
        &["run", "--cases", cases.to_str().expect("utf-8 path")],
    );

    let text = stdout(&output);
    assert_eq!(output.status.code(), Some(0), "{text}");
    assert!(text.contains("run: case=ranges outcome=pass"));
    assert!(text.contains("run: case=ranges-arrows outcome=unexpected_success"));
    assert!(text.contains("run: case=registry outcome=unexpected_success checks=2/2"));
    assert!(text.contains("fail=0"));
}

#[test]
fn list_marks_bonus_cases() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_case(temp.path(), "core", false, "[1, 2, 3]");
    write_case(temp.path(), "extra", true, "[1, 2, 3]");

    let output = drill(temp.path(), &["list", "--cases", "."]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "core\nextra (bonus)\n");
}

#[test]
fn failing_core_case_fails_the_run() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_case(temp.path(), "core", false, "[1, 2]");

    let output = drill(temp.path(), &["run", "--cases", "."]);

    let text = stdout(&output);
    assert_eq!(output.status.code(), Some(1), "{text}");
    assert!(text.contains("outcome=fail"));
    assert!(text.contains("expected [1, 2], got [1, 2, 3]"));
}

#[test]
fn failing_bonus_case_is_tolerated() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_case(temp.path(), "core", false, "[1, 2, 3]");
    write_case(temp.path(), "extra", true, "[1, 2]");

    let output = drill(temp.path(), &["run", "--cases", "."]);

    let text = stdout(&output);
    assert_eq!(output.status.code(), Some(0), "{text}");
    assert!(text.contains("run: case=extra outcome=expected_failure"));
    assert!(text.contains("pass=1 fail=0 expected_failure=1"));
}

#[test]
fn run_single_case_and_write_json() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_case(temp.path(), "core", false, "[1, 2, 3]");
    write_case(temp.path(), "broken", false, "[0]");

    let output = drill(
        temp.path(),
        &["run", "core", "--cases", ".", "--json", "out/report.json"],
    );

    assert_eq!(output.status.code(), Some(0));
    let report = fs::read_to_string(temp.path().join("out/report.json")).expect("read report");
    let report: serde_json::Value = serde_json::from_str(&report).expect("json");
    assert_eq!(report["summary"]["cases"], 1);
    assert_eq!(report["cases"][0]["id"], "core");
    assert_eq!(report["cases"][0]["checks"][0]["status"], "passed");
}

#[test]
fn unknown_case_is_a_harness_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_case(temp.path(), "core", false, "[1, 2, 3]");

    let output = drill(temp.path(), &["run", "missing", "--cases", "."]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("case missing not found"));
}

#[test]
fn invalid_case_file_is_a_harness_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("bad.toml"), "[case]\nid = \"Bad Id\"\n").expect("write");

    let output = drill(temp.path(), &["list", "--cases", "."]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("case.id"));
}
