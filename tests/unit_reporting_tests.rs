//! # Reporting Unit Tests / 报告单元测试
//!
//! Tests for the summary table rows, the failure layout and the HTML and
//! JSON report files.
//!
//! 摘要表格行、失败布局以及 HTML 和 JSON 报告文件的测试。

use doctor_testerson::core::aggregate::aggregate;
use doctor_testerson::core::error::{LoadError, TargetError};
use doctor_testerson::core::models::{
    ExampleOutcome, ExampleReport, OutcomeKind, ResolvedTarget, RunResult,
};
use doctor_testerson::reporting::console::{format_failure, format_millis, summary_rows, PercentCell};
use doctor_testerson::reporting::html::render_html_report;
use doctor_testerson::reporting::{generate_html_report, generate_json_report};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

fn outcome() -> ExampleOutcome {
    ExampleOutcome {
        owner: "pkg.mod.f".to_string(),
        file: Some("pkg/mod.py".to_string()),
        line: 12,
        source: "f(2)".to_string(),
        expected: "5\n".to_string(),
        actual: "4\n".to_string(),
        kind: OutcomeKind::Mismatch,
        diff: Some("Expected:\n    5\nGot:\n    4\n".to_string()),
    }
}

fn results() -> Vec<RunResult> {
    let failing = ExampleReport {
        attempted: 2,
        failed: 1,
        elapsed: Duration::from_micros(1500),
        failures: vec![outcome()],
    };
    let passing = ExampleReport {
        attempted: 3,
        failed: 0,
        elapsed: Duration::from_millis(1),
        failures: Vec::new(),
    };
    let missing = TargetError::Load(LoadError::NotFound {
        module: "gone".to_string(),
    });
    vec![
        RunResult::completed("zeta", &ResolvedTarget::module("zeta"), failing, Duration::from_micros(2500)),
        RunResult::completed("alpha", &ResolvedTarget::module("alpha"), passing, Duration::from_millis(1)),
        RunResult::errored("gone", Some(&ResolvedTarget::module("gone")), missing, Duration::ZERO),
        RunResult::skipped("later"),
    ]
}

#[cfg(test)]
mod console_tests {
    use super::*;

    #[test]
    fn test_format_millis_two_decimals() {
        assert_eq!(format_millis(Duration::from_micros(1500)), "1.50");
        assert_eq!(format_millis(Duration::ZERO), "0.00");
    }

    #[test]
    fn test_rows_sorted_by_name() {
        let rows = summary_rows(&results());
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "gone", "later", "zeta"]);
    }

    #[test]
    fn test_row_cells() {
        let rows = summary_rows(&results());
        let zeta = &rows[3];
        assert_eq!(zeta.delta, "2.50");
        assert_eq!(zeta.passed, "1");
        assert_eq!(zeta.failed, "1");
        assert!(matches!(zeta.percent, PercentCell::Percent(50, _)));
        assert_eq!(zeta.percent.text(), "50");

        assert!(matches!(rows[0].percent, PercentCell::Percent(100, _)));
        assert!(matches!(rows[1].percent, PercentCell::Errored(_)));
        assert!(matches!(rows[2].percent, PercentCell::Skipped(_)));
    }

    #[test]
    fn test_failure_layout() {
        let text = format_failure(&outcome());
        assert!(text.contains("pkg/mod.py"));
        assert!(text.contains("12"));
        assert!(text.contains("pkg.mod.f"));
        assert!(text.contains("    f(2)\n"));
        assert!(text.ends_with("Expected:\n    5\nGot:\n    4\n"));
    }
}

#[cfg(test)]
mod file_report_tests {
    use super::*;

    #[test]
    fn test_html_report_contents() {
        let results = results();
        let totals = aggregate(&results);
        let page = render_html_report(&results, &totals).into_string();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("alpha"));
        assert!(page.contains("zeta"));
        assert!(page.contains("no module named &#39;gone&#39;") || page.contains("no module named 'gone'"));
        assert!(page.contains("status-errored"));
    }

    #[test]
    fn test_html_report_written_to_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.html");
        let results = results();

        generate_html_report(&results, &aggregate(&results), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("<table>"));
    }

    #[test]
    fn test_json_report_structure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let results = results();

        generate_json_report(&results, &aggregate(&results), &path).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["tool"], "doctor-testerson");
        assert_eq!(json["totals"]["attempted"], 5);
        assert_eq!(json["totals"]["failed"], 1);
        assert_eq!(json["totals"]["errored"], 1);
        assert_eq!(json["pass_percent"], 80);
        assert_eq!(json["results"].as_array().unwrap().len(), 4);
        assert!(json["generated_at"].as_str().is_some());
    }

    #[test]
    fn test_report_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/report.json");
        let results = results();
        assert!(generate_json_report(&results, &aggregate(&results), &path).is_err());
    }
}
