//! # Output Checker Module / 输出检查模块
//!
//! Decides whether an example's actual output matches its expected output,
//! and renders the explanation shown when it does not.
//!
//! 判断示例的实际输出是否与预期输出匹配，并生成不匹配时显示的说明。

use serde::Serialize;

/// Marker standing for an empty line in expected output.
/// 在预期输出中表示空行的标记。
pub const BLANKLINE_MARKER: &str = "<BLANKLINE>";

/// Placeholder matching any text when ellipsis matching is on.
/// 启用省略号匹配时可匹配任意文本的占位符。
pub const ELLIPSIS_MARKER: &str = "...";

/// How expected and actual output are compared. Immutable once built.
/// 预期输出与实际输出的比较方式。构建后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonOptions {
    pub normalize_whitespace: bool,
    pub ellipsis: bool,
    /// Stop running a target's examples after its first failure.
    /// 目标的首个示例失败后停止运行其余示例。
    pub fail_fast: bool,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            ellipsis: true,
            fail_fast: false,
        }
    }
}

impl ComparisonOptions {
    /// Exact comparison: no whitespace normalization, no ellipsis.
    pub fn strict() -> Self {
        Self {
            normalize_whitespace: false,
            ellipsis: false,
            fail_fast: false,
        }
    }
}

/// Whether `actual` output satisfies `expected` under `options`.
///
/// 在 `options` 下，`actual` 输出是否满足 `expected`。
///
/// ```
/// use doctor_testerson::core::checker::{check_output, ComparisonOptions};
///
/// let options = ComparisonOptions::default();
/// assert!(check_output("a...z\n", "aXYZz\n", &options));
/// assert!(!check_output("a...z\n", "a\n", &options));
/// ```
pub fn check_output(expected: &str, actual: &str, options: &ComparisonOptions) -> bool {
    if expected == actual {
        return true;
    }

    let expected = expected.replace(BLANKLINE_MARKER, "");
    let actual = blank_whitespace_lines(actual);
    if expected == actual {
        return true;
    }

    let (expected, actual) = if options.normalize_whitespace {
        (normalize_whitespace(&expected), normalize_whitespace(&actual))
    } else {
        (expected, actual)
    };
    if expected == actual {
        return true;
    }

    options.ellipsis && ellipsis_match(&expected, &actual)
}

/// Lines holding only whitespace become empty.
fn blank_whitespace_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| if line.trim().is_empty() { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse every run of whitespace (newlines included) into one space.
/// 将每一段连续空白（包括换行）合并为一个空格。
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Match `want` against `got`, where each `...` in `want` stands for any
/// (possibly empty) text. The fixed prefix and suffix must match exactly;
/// pieces in between are found left to right, taking the first occurrence.
///
/// 将 `want` 与 `got` 进行匹配，`want` 中的每个 `...` 代表任意（可为空）文本。
/// 固定的前缀和后缀必须完全匹配；中间的片段从左到右查找，取第一次出现的位置。
pub fn ellipsis_match(want: &str, got: &str) -> bool {
    if !want.contains(ELLIPSIS_MARKER) {
        return want == got;
    }

    let pieces: Vec<&str> = want.split(ELLIPSIS_MARKER).collect();
    let (first, rest) = match pieces.split_first() {
        Some(split) => split,
        None => return want == got,
    };
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return want == got,
    };

    let mut start = 0;
    let mut end = got.len();

    if !got.starts_with(first) {
        return false;
    }
    start += first.len();

    if !got.ends_with(last) {
        return false;
    }
    end -= last.len();

    // Prefix and suffix overlap: "aa...aa" cannot match "aa".
    if start > end {
        return false;
    }

    for piece in middle {
        match got[start..end].find(piece) {
            Some(offset) => start += offset + piece.len(),
            None => return false,
        }
    }
    true
}

/// Describe how `actual` differs from `expected`, in the usual
/// "Expected: / Got:" layout, each block indented by four spaces.
///
/// 以通常的 "Expected: / Got:" 布局描述 `actual` 与 `expected` 的差异，
/// 每个块缩进四个空格。
pub fn describe_mismatch(expected: &str, actual: &str) -> String {
    let mut text = String::new();
    if expected.is_empty() {
        text.push_str("Expected nothing\n");
    } else {
        text.push_str("Expected:\n");
        text.push_str(&indent(expected));
    }
    if actual.is_empty() {
        text.push_str("Got nothing\n");
    } else {
        text.push_str("Got:\n");
        text.push_str(&indent(actual));
    }
    text
}

fn indent(block: &str) -> String {
    block
        .lines()
        .map(|line| format!("    {line}\n"))
        .collect()
}
