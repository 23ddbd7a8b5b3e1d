use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

mod common;

use common::{setup_sample_project, write_file};

/// Builds the binary command running inside `dir`, in English and without colours.
fn doctor(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("doctor-testerson").unwrap();
    cmd.current_dir(dir).env("NO_COLOR", "1").arg("--lang").arg("en");
    cmd
}

/// Running passing targets succeeds and prints the results table with a
/// total row.
///
/// 运行通过的目标会成功，并打印带有合计行的结果表格。
#[test]
fn test_successful_run() {
    let project = setup_sample_project();

    doctor(project.path())
        .arg("mathy.py")
        .arg("README.md")
        .assert()
        .success()
        .stdout(predicate::str::contains("Doctest Results"))
        .stdout(predicate::str::contains("mathy"))
        .stdout(predicate::str::contains("README.md"))
        .stdout(predicate::str::contains("Total"))
        .stdout(predicate::str::contains("100"));
}

/// Without fail-fast, failing examples are reported but the exit code is 0.
///
/// 未启用快速失败时，失败的示例会被报告，但退出码为 0。
#[test]
fn test_failures_reported_without_fail_fast() {
    let project = setup_sample_project();

    doctor(project.path())
        .arg("broken.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed example:"))
        .stdout(predicate::str::contains("    broken()"))
        .stdout(predicate::str::contains("Expected:"))
        .stdout(predicate::str::contains("Got:"))
        .stdout(predicate::str::contains("Doctest Results"));
}

/// With fail-fast, a failure exits with code 1, prints the notice to stderr
/// and skips the summary table.
///
/// 启用快速失败时，失败会以退出码 1 结束，在 stderr 打印提示并跳过摘要表格。
#[test]
fn test_fail_fast_exit_code() {
    let project = setup_sample_project();

    doctor(project.path())
        .arg("--fail-fast")
        .arg("broken.py")
        .arg("mathy.py")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed... FAST"))
        .stdout(predicate::str::contains("Doctest Results").not());
}

/// Fail-fast with only passing targets still succeeds.
#[test]
fn test_fail_fast_all_passing() {
    let project = setup_sample_project();

    doctor(project.path())
        .arg("-f")
        .arg("mathy.py")
        .assert()
        .success();
}

/// An unknown module is reported as an error for that target, not for the run.
///
/// 未知模块作为该目标的错误被报告，而不是整个运行的错误。
#[test]
fn test_unknown_module_is_reported() {
    let project = setup_sample_project();

    doctor(project.path())
        .arg("no_such_module_here")
        .arg("mathy.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("no module named 'no_such_module_here'"))
        .stdout(predicate::str::contains("error"));
}

/// `--empty` shows only targets with no examples.
#[test]
fn test_empty_filter() {
    let project = setup_sample_project();

    doctor(project.path())
        .arg("--empty")
        .arg("quiet.py")
        .arg("mathy.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("quiet"))
        .stdout(predicate::str::contains("mathy").not());
}

/// `--no-empty` hides targets with no examples.
#[test]
fn test_no_empty_filter() {
    let project = setup_sample_project();

    doctor(project.path())
        .arg("-E")
        .arg("quiet.py")
        .arg("mathy.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("mathy"))
        .stdout(predicate::str::contains("quiet").not());
}

/// `--empty` and `--no-empty` cannot be combined.
///
/// `--empty` 和 `--no-empty` 不能同时使用。
#[test]
fn test_conflicting_empty_flags() {
    let project = setup_sample_project();

    doctor(project.path())
        .arg("--empty")
        .arg("--no-empty")
        .arg("mathy.py")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be used with"));
}

/// At least one target is required.
#[test]
fn test_missing_targets() {
    let project = setup_sample_project();

    doctor(project.path()).assert().code(1);
}

/// The header panel lists the targets.
#[test]
fn test_panel() {
    let project = setup_sample_project();

    doctor(project.path())
        .arg("--panel")
        .arg("README.md")
        .assert()
        .success()
        .stdout(predicate::str::contains("+++ Dr. Testerson +++"))
        .stdout(predicate::str::contains("Dr. T! These files need your help!"))
        .stdout(predicate::str::contains("└── README.md"));
}

/// `--json` writes a machine-readable report.
#[test]
fn test_json_report() {
    let project = setup_sample_project();
    let report = project.path().join("report.json");

    doctor(project.path())
        .arg("--json")
        .arg(&report)
        .arg("mathy.py")
        .arg("broken.py")
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["totals"]["attempted"], 5);
    assert_eq!(json["totals"]["failed"], 1);
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
}

/// `--html` writes a report page.
#[test]
fn test_html_report() {
    let project = setup_sample_project();
    let report = project.path().join("report.html");

    doctor(project.path())
        .arg("--html")
        .arg(&report)
        .arg("mathy.py")
        .assert()
        .success();

    let page = fs::read_to_string(&report).unwrap();
    assert!(page.contains("mathy"));
}

/// The builtin `testerson` module is always available by name.
#[test]
fn test_builtin_module() {
    let project = setup_sample_project();
    let report = project.path().join("builtin.json");

    doctor(project.path())
        .arg("--json")
        .arg(&report)
        .arg("testerson")
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["totals"]["attempted"], 6);
    assert_eq!(json["totals"]["failed"], 0);
}

/// `--lang zh-CN` switches the report labels.
///
/// `--lang zh-CN` 会切换报告标签。
#[test]
fn test_chinese_output() {
    let project = setup_sample_project();

    let mut cmd = Command::cargo_bin("doctor-testerson").unwrap();
    cmd.current_dir(project.path())
        .env("NO_COLOR", "1")
        .arg("--lang")
        .arg("zh-CN")
        .arg("mathy.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("示例测试结果"))
        .stdout(predicate::str::contains("合计"));
}

/// Settings from `Testerson.toml` apply: fail-fast turned on in the file.
#[test]
fn test_config_file_enables_fail_fast() {
    let project = setup_sample_project();
    write_file(project.path(), "Testerson.toml", "fail_fast = true\n");

    doctor(project.path())
        .arg("broken.py")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed... FAST"));
}

/// An invalid configuration file stops the run with an error.
#[test]
fn test_invalid_config_file() {
    let project = setup_sample_project();
    write_file(project.path(), "bad.toml", "unknown_key = 1\n");

    doctor(project.path())
        .arg("--config")
        .arg("bad.toml")
        .arg("mathy.py")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse configuration file"));
}
