//! # Example Extraction Unit Tests / 示例提取单元测试
//!
//! Tests for splitting documentation text into example blocks.
//!
//! 将文档文本拆分为示例块的测试。

use doctor_testerson::core::examples::extract_examples;

#[cfg(test)]
mod extraction_tests {
    use super::*;

    #[test]
    fn test_no_prompts_no_blocks() {
        assert!(extract_examples("Just prose.\nNothing to run.\n", 1).is_empty());
        assert!(extract_examples("", 1).is_empty());
    }

    #[test]
    fn test_single_block_with_output() {
        let blocks = extract_examples("Intro\n\n>>> 2 + 2\n4\n", 1);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].source, "2 + 2");
        assert_eq!(blocks[0].expected, "4\n");
        assert_eq!(blocks[0].line, 3);
        assert_eq!(blocks[0].indent, 0);
    }

    #[test]
    fn test_block_without_output() {
        let blocks = extract_examples(">>> x = 1\n>>> x\n1\n", 1);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].source, "x = 1");
        assert_eq!(blocks[0].expected, "");
        assert_eq!(blocks[1].source, "x");
        assert_eq!(blocks[1].expected, "1\n");
    }

    #[test]
    fn test_continuation_lines() {
        let text = ">>> def f():\n...     return 3\n>>> f()\n3\n";
        let blocks = extract_examples(text, 1);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].source, "def f():\n    return 3");
        assert_eq!(blocks[1].expected, "3\n");
    }

    #[test]
    fn test_indented_docstring_strips_margin() {
        let text = "Doc.\n\n    >>> print('a')\n    a\n      indented\n    ";
        let blocks = extract_examples(text, 10);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].indent, 4);
        assert_eq!(blocks[0].line, 12);
        assert_eq!(blocks[0].source, "print('a')");
        assert_eq!(blocks[0].expected, "a\n  indented\n");
    }

    #[test]
    fn test_output_ends_at_blank_line() {
        let text = ">>> 1\n1\n\nnot output\n";
        let blocks = extract_examples(text, 1);
        assert_eq!(blocks[0].expected, "1\n");
    }

    #[test]
    fn test_bare_prompt_is_empty_source() {
        let blocks = extract_examples(">>>\n", 1);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].source, "");
    }

    #[test]
    fn test_prompt_needs_a_space() {
        assert!(extract_examples(">>>x\n", 1).is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let blocks = extract_examples(">>> 1 + 1\r\n2\r\n", 1);
        assert_eq!(blocks[0].source, "1 + 1");
        assert_eq!(blocks[0].expected, "2\n");
    }
}
