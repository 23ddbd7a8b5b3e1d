//! # Models Module Unit Tests / Models 模块单元测试
//!
//! This module contains unit tests for the `models.rs` module: run results,
//! totals and their aggregation, and the empty-target filter.
//!
//! 此模块包含 `models.rs` 模块的单元测试：运行结果、汇总及其归约，以及空目标过滤器。

use doctor_testerson::core::aggregate::{aggregate, filter};
use doctor_testerson::core::error::{ResolutionError, TargetError};
use doctor_testerson::core::models::{
    pass_percent, EmptyFilter, ExampleReport, ResolvedTarget, RunResult, TargetKind, Totals,
};
use std::time::Duration;

/// Helper function to create a completed result / 创建已完成结果的辅助函数
fn completed(name: &str, attempted: usize, failed: usize, millis: u64) -> RunResult {
    let report = ExampleReport {
        attempted,
        failed,
        elapsed: Duration::from_millis(millis),
        failures: Vec::new(),
    };
    RunResult::completed(
        name,
        &ResolvedTarget::module(name),
        report,
        Duration::from_millis(millis + 1),
    )
}

fn errored(name: &str) -> RunResult {
    let error = TargetError::Resolution(ResolutionError::NotAFile {
        target: name.to_string(),
    });
    RunResult::errored(name, None, error, Duration::from_millis(2))
}

#[cfg(test)]
mod run_result_tests {
    use super::*;

    #[test]
    fn test_completed_result() {
        let result = completed("pkg.mod", 4, 1, 10);
        assert_eq!(result.name, "pkg.mod");
        assert_eq!(result.kind, Some(TargetKind::Module));
        assert_eq!(result.passed(), 3);
        assert_eq!(result.elapsed, Duration::from_millis(11));
        assert_eq!(result.execution_time, Duration::from_millis(10));
        assert!(result.has_failures());
        assert!(!result.is_errored());
        assert!(!result.is_empty());
    }

    #[test]
    fn test_passing_result_has_no_failures() {
        assert!(!completed("ok", 2, 0, 1).has_failures());
    }

    #[test]
    fn test_errored_result() {
        let result = errored("some/dir");
        assert_eq!(result.name, "some/dir");
        assert_eq!(result.kind, None);
        assert_eq!(result.attempted, 0);
        assert_eq!(result.failed, 0);
        assert!(result.is_errored());
        assert!(result.is_empty());
        assert!(result.has_failures());
    }

    #[test]
    fn test_skipped_result() {
        let result = RunResult::skipped("later");
        assert!(result.is_skipped());
        assert!(!result.has_failures());
        assert_eq!(result.elapsed, Duration::ZERO);
    }

    #[test]
    fn test_text_file_display_name() {
        let resolved = ResolvedTarget::TextFile {
            path: "docs/guide.md".into(),
        };
        assert_eq!(resolved.display_name(), "docs/guide.md");
        assert_eq!(resolved.kind().to_string(), "text file");
    }
}

#[cfg(test)]
mod totals_tests {
    use super::*;

    #[test]
    fn test_aggregate_empty() {
        let totals = aggregate(&[]);
        assert_eq!(totals, Totals::default());
        assert_eq!(totals.attempted, 0);
        assert_eq!(totals.pass_percent(), None);
    }

    #[test]
    fn test_aggregate_single() {
        let result = completed("a", 5, 2, 3);
        let totals = aggregate(std::slice::from_ref(&result));
        assert_eq!(totals.attempted, result.attempted);
        assert_eq!(totals.failed, 2);
        assert_eq!(totals.passed, 3);
        assert_eq!(totals.targets, 1);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let a = completed("a", 5, 2, 3);
        let b = completed("b", 1, 0, 7);
        let c = errored("c");

        let forward = aggregate(&[a.clone(), b.clone(), c.clone()]);
        let backward = aggregate(&[c.clone(), b.clone(), a.clone()]);
        let grouped = aggregate(&[a.clone(), b.clone()]) + aggregate(&[c]);

        assert_eq!(forward, backward);
        assert_eq!(forward, grouped);
        assert_eq!(forward.errored, 1);
        assert_eq!(forward.elapsed, Duration::from_millis(4 + 8 + 2));
    }

    #[test]
    fn test_pass_percent_rounds_half_to_even() {
        assert_eq!(pass_percent(0, 0), None);
        assert_eq!(pass_percent(1, 1), Some(100));
        assert_eq!(pass_percent(1, 2), Some(50));
        assert_eq!(pass_percent(2, 3), Some(67));
        assert_eq!(pass_percent(1, 8), Some(12));
        assert_eq!(pass_percent(0, 5), Some(0));
    }
}

#[cfg(test)]
mod filter_tests {
    use super::*;

    fn sample() -> Vec<RunResult> {
        vec![completed("full", 2, 0, 1), completed("none", 0, 0, 1), errored("bad")]
    }

    #[test]
    fn test_from_flag() {
        assert_eq!(EmptyFilter::from_flag(None), EmptyFilter::All);
        assert_eq!(EmptyFilter::from_flag(Some(true)), EmptyFilter::OnlyEmpty);
        assert_eq!(EmptyFilter::from_flag(Some(false)), EmptyFilter::OnlyNonEmpty);
    }

    #[test]
    fn test_filter_all_keeps_everything() {
        assert_eq!(filter(sample(), EmptyFilter::All).len(), 3);
    }

    #[test]
    fn test_filter_only_empty() {
        let names: Vec<_> = filter(sample(), EmptyFilter::OnlyEmpty)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["none", "bad"]);
    }

    #[test]
    fn test_filter_only_non_empty() {
        let names: Vec<_> = filter(sample(), EmptyFilter::OnlyNonEmpty)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["full"]);
    }
}
