//! # Example Engine Unit Tests / 示例引擎单元测试
//!
//! Tests for running the examples of modules and text files: counting,
//! fail-fast, owner scoping and how failures are recorded.
//!
//! 运行模块和文本文件示例的测试：计数、快速失败、所属者作用域以及失败的记录方式。

mod common;

use common::{registry_with, run_module, run_text, FAILING_MODULE, PASSING_MODULE};
use doctor_testerson::core::checker::ComparisonOptions;
use doctor_testerson::core::engine::ExampleEngine;
use doctor_testerson::core::error::{LoadError, TargetError};
use doctor_testerson::core::models::{OutcomeKind, ResolvedTarget};
use doctor_testerson::infra::clock::MonotonicClock;
use doctor_testerson::infra::loader::{ModuleLoader, Registry};

fn fail_fast() -> ComparisonOptions {
    ComparisonOptions {
        fail_fast: true,
        ..ComparisonOptions::default()
    }
}

#[cfg(test)]
mod text_tests {
    use super::*;

    #[test]
    fn test_passing_text_example() {
        let report = run_text(">>> 2 + 2\n4\n", &ComparisonOptions::default());
        assert_eq!(report.attempted, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.passed(), 1);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_failing_text_example_records_actual_output() {
        let report = run_text(">>> 2 + 2\n5\n", &ComparisonOptions::default());
        assert_eq!(report.attempted, 1);
        assert_eq!(report.failed, 1);

        let failure = &report.failures[0];
        assert_eq!(failure.kind, OutcomeKind::Mismatch);
        assert_eq!(failure.actual, "4\n");
        assert_eq!(failure.expected, "5\n");
        assert_eq!(failure.line, 1);
        assert_eq!(failure.diff.as_deref(), Some("Expected:\n    5\nGot:\n    4\n"));
    }

    #[test]
    fn test_no_examples() {
        let report = run_text("Nothing to see.\n", &ComparisonOptions::default());
        assert_eq!(report.attempted, 0);
        assert_eq!(report.failed, 0);
        assert_eq!(report.passed(), 0);
    }

    #[test]
    fn test_text_examples_share_one_context() {
        let text = ">>> x = 40\n\nSome prose.\n\n>>> x + 2\n42\n";
        let report = run_text(text, &ComparisonOptions::default());
        assert_eq!(report.attempted, 2);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_exception_counts_as_failure() {
        let report = run_text(">>> 1 / 0\n1\n", &ComparisonOptions::default());
        assert_eq!(report.failed, 1);
        let failure = &report.failures[0];
        assert_eq!(failure.kind, OutcomeKind::Exception);
        assert_eq!(failure.actual, "ZeroDivisionError: division by zero");
        assert!(failure.diff.as_deref().unwrap().starts_with("Exception raised:"));
    }

    #[test]
    fn test_loop_output_matches_expected_lines() {
        let report = run_text(">>> for i in range(3):\n...     i\n0\n1\n2\n", &ComparisonOptions::default());
        assert_eq!(report.attempted, 1);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_oversized_example_fails_without_stopping_the_run() {
        let text = ">>> len('ab' * 10**18)\n0\n>>> 1\n1\n";
        let report = run_text(text, &ComparisonOptions::default());
        assert_eq!(report.attempted, 2);
        assert_eq!(report.failed, 1);

        let failure = &report.failures[0];
        assert_eq!(failure.kind, OutcomeKind::Exception);
        assert_eq!(failure.actual, "MemoryError: sequence too large");
    }

    #[test]
    fn test_deeply_nested_example_fails_without_stopping_the_run() {
        let text = format!(">>> {}1{}\n1\n>>> 1\n1\n", "(".repeat(20_000), ")".repeat(20_000));
        let report = run_text(&text, &ComparisonOptions::default());
        assert_eq!(report.attempted, 2);
        assert_eq!(report.failed, 1);
        assert!(report.failures[0].actual.starts_with("SyntaxError"));
    }

    #[test]
    fn test_fail_fast_stops_after_first_failure() {
        let text = ">>> 1\n1\n>>> 2\n3\n>>> 3\n3\n";

        let report = run_text(text, &fail_fast());
        assert_eq!(report.attempted, 2);
        assert_eq!(report.failed, 1);

        let report = run_text(text, &ComparisonOptions::default());
        assert_eq!(report.attempted, 3);
        assert_eq!(report.failed, 1);
    }
}

#[cfg(test)]
mod module_tests {
    use super::*;

    #[test]
    fn test_passing_module() {
        let registry = registry_with(&[("mathy", PASSING_MODULE)]);
        let report = run_module(&registry, "mathy", &ComparisonOptions::default());
        assert_eq!(report.attempted, 3);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_failing_module_names_owner() {
        let registry = registry_with(&[("broken", FAILING_MODULE)]);
        let report = run_module(&registry, "broken", &ComparisonOptions::default());
        assert_eq!(report.attempted, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].owner, "broken.broken");
        assert_eq!(report.failures[0].actual, "1\n");
    }

    #[test]
    fn test_sibling_owners_are_isolated() {
        let source = r#"
def first():
    """
    >>> secret = 1
    >>> secret
    1
    """

def second():
    """
    >>> secret
    1
    """
"#;
        let registry = registry_with(&[("scoped", source)]);
        let report = run_module(&registry, "scoped", &ComparisonOptions::default());
        assert_eq!(report.attempted, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].owner, "scoped.second");
        assert_eq!(report.failures[0].actual, "NameError: name 'secret' is not defined");
    }

    #[test]
    fn test_nested_owners_see_parent_bindings() {
        let source = r#"
class Box:
    """
    >>> shared = 'from class'
    """

    def open(self):
        """
        >>> shared
        'from class'
        """
"#;
        let registry = registry_with(&[("boxes", source)]);
        let report = run_module(&registry, "boxes", &ComparisonOptions::default());
        assert_eq!(report.attempted, 2);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_examples_see_module_globals() {
        let source = "\"\"\"\n>>> LIMIT\n10\n\"\"\"\nLIMIT = 10\n";
        let registry = registry_with(&[("limits", source)]);
        let report = run_module(&registry, "limits", &ComparisonOptions::default());
        assert_eq!(report.attempted, 1);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_builtin_testerson_module_passes() {
        let registry = Registry::with_builtins();
        let report = run_module(&registry, "testerson", &ComparisonOptions::default());
        assert_eq!(report.attempted, 6);
        assert_eq!(report.failed, 0);
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_unknown_module_is_a_load_error() {
        let registry = Registry::new();
        let clock = MonotonicClock;
        let engine = ExampleEngine::new(&registry, &clock);

        let error = engine
            .run(&ResolvedTarget::module("missing"), &ComparisonOptions::default())
            .unwrap_err();

        assert_eq!(
            error,
            TargetError::Load(LoadError::NotFound {
                module: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_import_error_is_a_load_error() {
        let registry = registry_with(&[("bad", "x = 1 / 0\n")]);
        let error = registry.load("bad", None).unwrap_err();
        match error {
            LoadError::Import { module, message } => {
                assert_eq!(module, "bad");
                assert_eq!(message, "ZeroDivisionError: division by zero");
            }
            other => panic!("expected an import error, got {other:?}"),
        }
    }

    #[test]
    fn test_syntax_error_at_import() {
        let registry = registry_with(&[("bad", "def (:\n")]);
        assert!(matches!(registry.load("bad", None), Err(LoadError::Import { .. })));
    }
}
