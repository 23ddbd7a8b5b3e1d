//! # Target Runner Integration Tests / 目标运行器集成测试
//!
//! End-to-end tests over a temporary project on disk: classification,
//! loading, running and the uniform per-target results, including errored
//! and skipped targets.
//!
//! 在磁盘上的临时项目中进行的端到端测试：分类、加载、运行以及统一的每目标结果，
//! 包括出错和跳过的目标。

mod common;

use common::setup_sample_project;
use doctor_testerson::core::aggregate::{aggregate, filter};
use doctor_testerson::core::checker::ComparisonOptions;
use doctor_testerson::core::classifier::TargetClassifier;
use doctor_testerson::core::engine::ExampleEngine;
use doctor_testerson::core::error::{LoadError, TargetError};
use doctor_testerson::core::execution::TargetRunner;
use doctor_testerson::core::models::{EmptyFilter, RunResult, TargetKind, TargetStatus};
use doctor_testerson::infra::clock::MonotonicClock;
use doctor_testerson::infra::loader::{ChainLoader, Registry, SourceLoader};
use std::path::Path;

/// Runs `targets` (relative to `root`) through a fully wired runner.
fn run_in(root: &Path, targets: &[&str], options: &ComparisonOptions) -> Vec<RunResult> {
    let classifier = TargetClassifier::default();
    let loader = ChainLoader::new()
        .with(Registry::with_builtins())
        .with(SourceLoader::new(vec![root.to_path_buf()], vec!["py".to_string()]));
    let clock = MonotonicClock;
    let engine = ExampleEngine::new(&loader, &clock);
    let runner = TargetRunner::new(&classifier, engine, &clock);

    let targets: Vec<String> = targets
        .iter()
        .map(|t| {
            let path = root.join(t);
            if path.exists() {
                path.to_string_lossy().into_owned()
            } else {
                t.to_string()
            }
        })
        .collect();
    runner.run_targets(&targets, options)
}

#[cfg(test)]
mod runner_tests {
    use super::*;

    #[test]
    fn test_every_target_yields_one_result_in_order() {
        let project = setup_sample_project();
        let results = run_in(
            project.path(),
            &["mathy.py", "README.md", "testerson", "no_such_module_here"],
            &ComparisonOptions::default(),
        );

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].name, "mathy");
        assert_eq!(results[0].kind, Some(TargetKind::Module));
        assert_eq!(results[0].attempted, 3);
        assert_eq!(results[1].kind, Some(TargetKind::TextFile));
        assert_eq!(results[1].attempted, 1);
        assert_eq!(results[2].name, "testerson");
        assert_eq!(results[2].failed, 0);
        assert!(results[3].is_errored());
    }

    #[test]
    fn test_module_name_found_through_search_path() {
        let project = setup_sample_project();
        let results = run_in(project.path(), &["broken"], &ComparisonOptions::default());

        assert_eq!(results[0].status, TargetStatus::Ran);
        assert_eq!(results[0].attempted, 2);
        assert_eq!(results[0].failed, 1);
        assert_eq!(
            results[0].failures[0].file.as_deref(),
            Some(project.path().join("broken.py").to_string_lossy().as_ref())
        );
    }

    #[test]
    fn test_errored_target_is_reported_not_raised() {
        let project = setup_sample_project();
        let results = run_in(project.path(), &["no_such_module_here"], &ComparisonOptions::default());

        let result = &results[0];
        assert_eq!(result.attempted, 0);
        assert_eq!(result.failed, 0);
        assert_eq!(
            result.error(),
            Some(&TargetError::Load(LoadError::NotFound {
                module: "no_such_module_here".to_string()
            }))
        );
        assert!(result.has_failures());
    }

    #[test]
    fn test_fail_fast_skips_remaining_targets() {
        let project = setup_sample_project();
        let options = ComparisonOptions {
            fail_fast: true,
            ..ComparisonOptions::default()
        };
        let results = run_in(project.path(), &["mathy.py", "broken.py", "README.md"], &options);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, TargetStatus::Ran);
        assert_eq!(results[1].failed, 1);
        assert!(results[2].is_skipped());
        assert_eq!(results[2].attempted, 0);
    }

    #[test]
    fn test_without_fail_fast_everything_runs() {
        let project = setup_sample_project();
        let results = run_in(
            project.path(),
            &["broken.py", "README.md"],
            &ComparisonOptions::default(),
        );
        assert!(results.iter().all(|r| r.status == TargetStatus::Ran));
    }

    #[test]
    fn test_filter_and_aggregate_over_results() {
        let project = setup_sample_project();
        let results = run_in(
            project.path(),
            &["mathy.py", "quiet.py", "README.md"],
            &ComparisonOptions::default(),
        );

        let totals = aggregate(&results);
        assert_eq!(totals.targets, 3);
        assert_eq!(totals.attempted, 4);
        assert_eq!(totals.passed, 4);
        assert_eq!(totals.pass_percent(), Some(100));

        let empty = filter(results.clone(), EmptyFilter::OnlyEmpty);
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].name, "quiet");

        let non_empty = filter(results, EmptyFilter::OnlyNonEmpty);
        assert_eq!(non_empty.len(), 2);
    }
}
