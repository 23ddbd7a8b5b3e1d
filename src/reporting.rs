//! # Reporting Module / 报告模块
//!
//! This module presents run results: colourful console output (header panel,
//! failure details, summary table) plus optional HTML and JSON report files.
//!
//! 此模块展示运行结果：彩色控制台输出（标题面板、失败详情、摘要表格），
//! 以及可选的 HTML 和 JSON 报告文件。

pub mod console;
pub mod html;
pub mod json;

// Re-export common reporting functions
pub use console::{print_failed_fast, print_failure_details, print_header_panel, print_summary};
pub use html::generate_html_report;
pub use json::generate_json_report;
