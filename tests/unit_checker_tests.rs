//! # Checker Module Unit Tests / Checker 模块单元测试
//!
//! Tests for output comparison: exact matches, whitespace normalization,
//! ellipsis wildcards, the `<BLANKLINE>` marker and mismatch descriptions.
//!
//! 输出比较的测试：精确匹配、空白规范化、省略号通配符、`<BLANKLINE>` 标记以及差异描述。

use doctor_testerson::core::checker::{
    check_output, describe_mismatch, ellipsis_match, normalize_whitespace, ComparisonOptions,
};

fn options(normalize_whitespace: bool, ellipsis: bool) -> ComparisonOptions {
    ComparisonOptions {
        normalize_whitespace,
        ellipsis,
        fail_fast: false,
    }
}

#[cfg(test)]
mod ellipsis_tests {
    use super::*;

    #[test]
    fn test_ellipsis_matches_text_in_between() {
        assert!(ellipsis_match("a...z", "aXYZz"));
    }

    #[test]
    fn test_ellipsis_matches_empty_text() {
        assert!(ellipsis_match("a...z", "az"));
    }

    #[test]
    fn test_ellipsis_requires_suffix() {
        assert!(!ellipsis_match("a...z", "a"));
    }

    #[test]
    fn test_ellipsis_prefix_and_suffix_cannot_overlap() {
        assert!(!ellipsis_match("aa...aa", "aa"));
        assert!(ellipsis_match("aa...aa", "aaaa"));
    }

    #[test]
    fn test_ellipsis_multiple_wildcards_in_order() {
        assert!(ellipsis_match("[1, ..., 5, ..., 9]", "[1, 2, 3, 4, 5, 6, 7, 8, 9]"));
        assert!(!ellipsis_match("[...9, ..., 1]", "[1, 9]"));
    }

    #[test]
    fn test_without_marker_is_exact() {
        assert!(ellipsis_match("abc", "abc"));
        assert!(!ellipsis_match("abc", "abd"));
    }

    #[test]
    fn test_ellipsis_disabled_is_literal() {
        assert!(!check_output("a...z\n", "aXYZz\n", &options(true, false)));
        assert!(check_output("a...z\n", "a...z\n", &options(true, false)));
    }
}

#[cfg(test)]
mod whitespace_tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_runs() {
        assert_eq!(normalize_whitespace("  a \n\t b  "), "a b");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_whitespace_matches_only_when_enabled() {
        assert!(check_output("a  b\n", "a b\n", &options(true, false)));
        assert!(!check_output("a  b\n", "a b\n", &options(false, false)));
    }

    #[test]
    fn test_strict_options_need_exact_output() {
        let strict = ComparisonOptions::strict();
        assert!(check_output("4\n", "4\n", &strict));
        assert!(!check_output("4\n", "4 \n", &strict));
    }

    #[test]
    fn test_defaults_enable_both_relaxations() {
        let defaults = ComparisonOptions::default();
        assert!(defaults.normalize_whitespace);
        assert!(defaults.ellipsis);
        assert!(!defaults.fail_fast);
    }
}

#[cfg(test)]
mod blankline_tests {
    use super::*;

    #[test]
    fn test_blankline_marker_matches_empty_line() {
        let strict = ComparisonOptions::strict();
        assert!(check_output("a\n<BLANKLINE>\nb\n", "a\n\nb\n", &strict));
    }

    #[test]
    fn test_whitespace_only_line_counts_as_blank() {
        let strict = ComparisonOptions::strict();
        assert!(check_output("a\n<BLANKLINE>\nb\n", "a\n   \nb\n", &strict));
    }
}

#[cfg(test)]
mod describe_tests {
    use super::*;

    #[test]
    fn test_describe_mismatch_layout() {
        let text = describe_mismatch("5\n", "4\n");
        assert_eq!(text, "Expected:\n    5\nGot:\n    4\n");
    }

    #[test]
    fn test_describe_mismatch_with_nothing() {
        assert_eq!(describe_mismatch("", "4\n"), "Expected nothing\nGot:\n    4\n");
        assert_eq!(describe_mismatch("4\n", ""), "Expected:\n    4\nGot nothing\n");
    }
}
