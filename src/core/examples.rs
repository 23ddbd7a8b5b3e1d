//! # Example Extraction Module / 示例提取模块
//!
//! Splits documentation text into [`ExampleBlock`]s. A block starts at a
//! `>>> ` prompt, continues over `... ` lines at the same indentation, and is
//! followed by its expected output: every line up to the next blank line or
//! prompt.
//!
//! 将文档文本拆分为 [`ExampleBlock`]。示例块以 `>>> ` 提示符开始，
//! 延续到相同缩进的 `... ` 行，其后是预期输出：直到下一个空行或提示符为止的所有行。

use serde::Serialize;

const PROMPT: &str = ">>>";
const CONTINUATION: &str = "...";

/// One simulated interactive input and the output it should produce.
/// 一段模拟的交互式输入及其应产生的输出。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleBlock {
    /// Source lines with prompts removed, joined by `\n`.
    /// 去除提示符后的源代码行，以 `\n` 连接。
    pub source: String,
    /// Expected output, each line terminated by `\n`; empty when none.
    /// 预期输出，每行以 `\n` 结尾；没有输出时为空。
    pub expected: String,
    /// 1-based line of the `>>>` prompt.
    pub line: usize,
    /// Indentation of the prompt, in characters.
    /// 提示符的缩进（字符数）。
    pub indent: usize,
}

/// If `line` is a prompt of kind `marker` (`>>>` or `...`), return the code after it.
fn strip_prompt<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    if rest.is_empty() {
        Some("")
    } else {
        rest.strip_prefix(' ')
    }
}

fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

fn split_at_char(line: &str, chars: usize) -> (&str, &str) {
    let byte = line
        .char_indices()
        .nth(chars)
        .map_or(line.len(), |(index, _)| index);
    line.split_at(byte)
}

/// Extract every example block from `text`, in document order.
/// `first_line` is the line number of the first line of `text`.
///
/// 按文档顺序从 `text` 中提取所有示例块。`first_line` 是 `text` 第一行的行号。
///
/// ```
/// use doctor_testerson::core::examples::extract_examples;
///
/// let blocks = extract_examples(">>> 2 + 2\n4\n", 1);
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].source, "2 + 2");
/// assert_eq!(blocks[0].expected, "4\n");
/// ```
pub fn extract_examples(text: &str, first_line: usize) -> Vec<ExampleBlock> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let indent = indentation(lines[i]);
        let (margin, body) = split_at_char(lines[i], indent);
        let Some(first) = strip_prompt(body, PROMPT) else {
            i += 1;
            continue;
        };

        let line = first_line + i;
        let mut source = vec![first];
        i += 1;

        while let Some(next) = lines.get(i) {
            let continued = next
                .strip_prefix(margin)
                .and_then(|rest| strip_prompt(rest, CONTINUATION));
            match continued {
                Some(code) => {
                    source.push(code);
                    i += 1;
                }
                None => break,
            }
        }

        let mut expected = Vec::new();
        while let Some(next) = lines.get(i) {
            if next.trim().is_empty() {
                break;
            }
            let (_, body) = split_at_char(next, indentation(next));
            if strip_prompt(body, PROMPT).is_some() {
                break;
            }
            expected.push(next.strip_prefix(margin).unwrap_or(body));
            i += 1;
        }

        let mut expected_text = expected.join("\n");
        if !expected_text.is_empty() {
            expected_text.push('\n');
        }
        blocks.push(ExampleBlock {
            source: source.join("\n"),
            expected: expected_text,
            line,
            indent,
        });
    }

    blocks
}
