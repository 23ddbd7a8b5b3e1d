//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders run results as a standalone HTML page: summary counts,
//! a results table and, under each target, the details of its failed examples
//! or the error that stopped it.
//!
//! 此模块将运行结果渲染为独立的 HTML 页面：汇总计数、结果表格，
//! 以及每个目标下其失败示例的详情或导致其停止的错误。

use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs;
use std::path::Path;

use crate::core::models::{RunResult, TargetStatus, Totals};
use crate::infra::t;
use crate::reporting::console::{format_failure, format_millis, summary_rows, PercentCell};

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2em; color: #222; }
h1 { font-size: 1.6em; }
.summary-container { display: flex; gap: 1.5em; margin-bottom: 1.5em; }
.summary-item { display: flex; flex-direction: column; align-items: center; padding: 0.6em 1.2em; border: 1px solid #ddd; border-radius: 6px; }
.summary-item .count { font-size: 1.5em; font-weight: bold; }
.passed-text { color: #2e7d32; }
.failed-text { color: #c62828; }
.errored-text { color: #ad1457; }
table { border-collapse: collapse; width: 100%; }
th, td { padding: 0.4em 0.8em; border-bottom: 1px solid #eee; text-align: left; }
td.num, th.num { text-align: right; }
tr.total td { font-weight: bold; border-top: 2px solid #999; }
.status-cell { font-weight: bold; }
.status-passed { color: #2e7d32; }
.status-failed, .status-errored { color: #c62828; }
.status-skipped { color: #888; }
details pre { background: #f6f8fa; padding: 0.8em; overflow-x: auto; }
"#;

/// Generates an HTML report from run results and writes it to `output_path`.
///
/// 从运行结果生成 HTML 报告并写入 `output_path`。
///
/// # Errors / 错误
/// Returns an error if the file cannot be written.
/// 如果无法写入文件，则返回错误。
pub fn generate_html_report(results: &[RunResult], totals: &Totals, output_path: &Path) -> Result<()> {
    let page = render_html_report(results, totals);
    fs::write(output_path, page.into_string())
        .with_context(|| t!("report_write_failed", path = output_path.display()).to_string())
}

/// Renders the report page without writing it anywhere.
/// 渲染报告页面但不写入任何位置。
pub fn render_html_report(results: &[RunResult], totals: &Totals) -> Markup {
    let rows = summary_rows(results);
    let mut sorted: Vec<&RunResult> = results.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    let total_percent = totals
        .pass_percent()
        .map_or_else(|| "-".to_string(), |p| p.to_string());

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title").to_string()) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header").to_string()) }
                p { (t!("html_report.generated_at", time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S")).to_string()) }
                div class="summary-container" {
                    (summary_item(totals.targets, "", &t!("html_report.summary.targets")))
                    (summary_item(totals.attempted, "", &t!("html_report.summary.attempted")))
                    (summary_item(totals.passed, "passed-text", &t!("html_report.summary.passed")))
                    (summary_item(totals.failed, "failed-text", &t!("html_report.summary.failed")))
                    (summary_item(totals.errored, "errored-text", &t!("html_report.summary.errored")))
                }
                table {
                    thead {
                        tr {
                            th { (t!("table.test").to_string()) }
                            th class="num" { (t!("table.delta").to_string()) }
                            th class="num" { (t!("table.passed").to_string()) }
                            th class="num" { (t!("table.failed").to_string()) }
                            th class="num" { "%" }
                        }
                    }
                    tbody {
                        @for (row, result) in rows.iter().zip(&sorted) {
                            tr {
                                td { (row.name) }
                                td class="num" { (row.delta) }
                                td class="num" { (row.passed) }
                                td class="num" { (row.failed) }
                                td class="num" {
                                    span class={ "status-cell " (status_class(&row.percent)) } { (row.percent.text()) }
                                }
                            }
                            @if result.has_failures() {
                                tr {
                                    td colspan="5" { (details(result)) }
                                }
                            }
                        }
                        tr class="total" {
                            td { (t!("table.total").to_string()) }
                            td class="num" { (format_millis(totals.elapsed)) }
                            td class="num" { (totals.passed.to_string()) }
                            td class="num" { (totals.failed.to_string()) }
                            td class="num" { (total_percent) }
                        }
                    }
                }
            }
        }
    }
}

fn summary_item(count: usize, class: &str, label: &str) -> Markup {
    html! {
        div class="summary-item" {
            span class={ "count " (class) } { (count.to_string()) }
            span class="label" { (label) }
        }
    }
}

fn details(result: &RunResult) -> Markup {
    html! {
        details {
            summary { (t!("html_report.toggle_output").to_string()) }
            @match &result.status {
                TargetStatus::Errored(error) => {
                    pre { (error.to_string()) }
                }
                _ => {
                    @for outcome in &result.failures {
                        pre { (format_failure(outcome)) }
                    }
                }
            }
        }
    }
}

fn status_class(cell: &PercentCell) -> &'static str {
    match cell {
        PercentCell::Percent(100, _) => "status-passed",
        PercentCell::Percent(..) => "status-failed",
        PercentCell::Errored(_) => "status-errored",
        PercentCell::Skipped(_) => "status-skipped",
        PercentCell::NotAttempted => "",
    }
}
