//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints run results to the terminal: the optional header panel,
//! doctest-style details for every failed example and errored target, and the
//! summary table with a total row.
//!
//! 此模块将运行结果打印到终端：可选的标题面板、每个失败示例和出错目标的
//! doctest 风格详情，以及带合计行的摘要表格。

use colored::*;
use std::time::Duration;

use crate::core::models::{ExampleOutcome, RunResult, TargetStatus, Totals};
use crate::infra::fs::relative_to_cwd;
use crate::infra::t;

const PANEL_TITLE: &str = "+++ Dr. Testerson +++";
const DETAIL_RULE_WIDTH: usize = 70;

/// Prints the header panel listing the targets about to run, each shown
/// relative to the current directory when possible.
///
/// 打印列出即将运行的目标的标题面板，目标尽可能以相对当前目录的路径显示。
///
/// # Output Format / 输出格式
/// ```text
/// ┏━━━━━━ +++ Dr. Testerson +++ ━━━━━━┓
/// ┃ Dr. T! These files need your help! ┃
/// ┃ ├── src/pkg/util.py                ┃
/// ┃ └── README.md                      ┃
/// ┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛
/// ```
pub fn print_header_panel(targets: &[String]) {
    for line in panel_lines(targets) {
        println!("{line}");
    }
}

/// Builds the panel rows, coloured black on red.
/// 构建面板行，黑字红底。
fn panel_lines(targets: &[String]) -> Vec<String> {
    let heading = t!("panel_heading").to_string();
    let mut body = vec![(heading, true)];
    for (i, target) in targets.iter().enumerate() {
        let branch = if i + 1 == targets.len() { "└──" } else { "├──" };
        body.push((format!("{branch} {}", relative_to_cwd(target)), false));
    }

    let title = format!(" {PANEL_TITLE} ");
    let inner = body
        .iter()
        .map(|(text, _)| text.chars().count() + 2)
        .chain(std::iter::once(title.chars().count() + 2))
        .max()
        .unwrap_or(0);

    let fill = inner - title.chars().count();
    let left = fill / 2;
    let top = format!(
        "{}{}{}{}{}",
        "┏".black().on_red(),
        "━".repeat(left).black().on_red(),
        title.black().on_red().bold(),
        "━".repeat(fill - left).black().on_red(),
        "┓".black().on_red()
    );

    let mut lines = vec![top];
    for (text, is_heading) in body {
        let padded = format!(" {text:<width$} ", width = inner - 2);
        let cell = if is_heading {
            padded.black().on_red().italic()
        } else {
            padded.black().on_red()
        };
        lines.push(format!("{}{}{}", "┃".black().on_red(), cell, "┃".black().on_red()));
    }
    lines.push(format!("┗{}┛", "━".repeat(inner)).black().on_red().to_string());
    lines
}

/// Prints a doctest-style report for every failed example and every target
/// that could not be run.
///
/// 为每个失败的示例和每个无法运行的目标打印 doctest 风格的报告。
pub fn print_failure_details(results: &[RunResult]) {
    let rule = "*".repeat(DETAIL_RULE_WIDTH);
    for result in results {
        if let Some(error) = result.error() {
            println!("{}", rule.red());
            println!(
                "{} {}",
                t!("target_errored", name = result.name.as_str()).red().bold(),
                error
            );
            continue;
        }
        for outcome in &result.failures {
            println!("{}", rule.red());
            print!("{}", format_failure(outcome));
        }
    }
}

/// Renders one failed example the way doctest does.
/// 以 doctest 的方式渲染一个失败示例。
pub fn format_failure(outcome: &ExampleOutcome) -> String {
    let file = outcome.file.as_deref().unwrap_or("<unknown>");
    let mut text = format!(
        "{}\n{}\n",
        t!(
            "failure_location",
            file = file,
            line = outcome.line,
            owner = outcome.owner.as_str()
        ),
        t!("failed_example")
    );
    for line in outcome.source.lines() {
        text.push_str("    ");
        text.push_str(line);
        text.push('\n');
    }
    if let Some(diff) = &outcome.diff {
        text.push_str(diff);
    }
    text
}

/// Prints the summary table: one row per result sorted by name, a blank
/// separator and a bold total row.
///
/// 打印摘要表格：每个结果一行并按名称排序，然后是空白分隔行和加粗的合计行。
///
/// # Output Format / 输出格式
/// ```text
///           Doctest Results
///  test        Δt   passed  failed     %
///  pkg.util  1.52        3       0   100
///  README    0.40        1       1    50
///
///  Total     1.92        4       1    80
/// ```
pub fn print_summary(results: &[RunResult], totals: &Totals) {
    let rows = summary_rows(results);
    let total = SummaryRow {
        name: t!("table.total").to_string(),
        delta: format_millis(totals.elapsed),
        passed: totals.passed.to_string(),
        failed: totals.failed.to_string(),
        percent: PercentCell::from_percent(totals.pass_percent()),
    };

    let headers = [
        t!("table.test").to_string(),
        t!("table.delta").to_string(),
        t!("table.passed").to_string(),
        t!("table.failed").to_string(),
        "%".to_string(),
    ];

    let mut widths: [usize; 5] = std::array::from_fn(|i| headers[i].chars().count());
    for row in rows.iter().chain(std::iter::once(&total)) {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let table_width = widths.iter().sum::<usize>() + 2 * widths.len();

    let title = t!("table.title").to_string();
    println!("\n{}", format!("{title:^table_width$}").italic());
    println!("{}", render_line(&headers, &widths).bold());
    println!("{}", "─".repeat(table_width));
    for row in &rows {
        println!("{}", render_row(row, &widths, false));
    }
    println!();
    println!("{}", render_row(&total, &widths, true));
}

/// One table row, with every cell already formatted as text.
/// 表格的一行，每个单元格都已格式化为文本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub name: String,
    pub delta: String,
    pub passed: String,
    pub failed: String,
    pub percent: PercentCell,
}

impl SummaryRow {
    fn cells(&self) -> [&str; 5] {
        [
            &self.name,
            &self.delta,
            &self.passed,
            &self.failed,
            self.percent.text(),
        ]
    }
}

/// The `%` column: a percentage, a dash, or the reason nothing ran.
/// `%` 列：百分比、横线，或未运行的原因。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PercentCell {
    Percent(u32, String),
    NotAttempted,
    Errored(String),
    Skipped(String),
}

impl PercentCell {
    fn from_percent(percent: Option<u32>) -> Self {
        match percent {
            Some(p) => Self::Percent(p, p.to_string()),
            None => Self::NotAttempted,
        }
    }

    fn from_result(result: &RunResult) -> Self {
        match &result.status {
            TargetStatus::Errored(_) => Self::Errored(t!("table.errored").to_string()),
            TargetStatus::Skipped => Self::Skipped(t!("table.skipped").to_string()),
            TargetStatus::Ran => Self::from_percent(Totals::of(result).pass_percent()),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Percent(_, text) | Self::Errored(text) | Self::Skipped(text) => text,
            Self::NotAttempted => "-",
        }
    }

    fn paint(&self, padded: String) -> ColoredString {
        match self {
            Self::Percent(100, _) => padded.green(),
            Self::Percent(..) | Self::Errored(_) => padded.red(),
            Self::Skipped(_) => padded.dimmed(),
            Self::NotAttempted => padded.normal(),
        }
    }
}

/// Rows for `results`, sorted by name.
/// `results` 对应的表格行，按名称排序。
pub fn summary_rows(results: &[RunResult]) -> Vec<SummaryRow> {
    let mut sorted: Vec<&RunResult> = results.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
        .into_iter()
        .map(|result| SummaryRow {
            name: result.name.clone(),
            delta: format_millis(result.elapsed),
            passed: result.passed().to_string(),
            failed: result.failed.to_string(),
            percent: PercentCell::from_result(result),
        })
        .collect()
}

/// Milliseconds with two decimals.
/// 以毫秒表示，保留两位小数。
pub fn format_millis(duration: Duration) -> String {
    format!("{:.2}", duration.as_secs_f64() * 1000.0)
}

fn render_line(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let mut line = format!(" {:<w$} ", cells[0], w = widths[0]);
    for (cell, width) in cells.iter().zip(widths.iter().copied()).skip(1) {
        line.push_str(&format!(" {cell:>width$} "));
    }
    line
}

fn render_row(row: &SummaryRow, widths: &[usize; 5], bold: bool) -> String {
    let cells = row.cells();
    // Pad before colouring so escape codes don't count towards the width.
    let plain = format!(
        " {:<w0$}  {:>w1$}  {:>w2$}  {:>w3$} ",
        cells[0],
        cells[1],
        cells[2],
        cells[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3]
    );
    let percent = row.percent.paint(format!(" {:>w$} ", cells[4], w = widths[4]));
    if bold {
        format!("{}{}", plain.bold(), percent.bold())
    } else {
        format!("{plain}{percent}")
    }
}

/// Prints the fail-fast notice to stderr.
/// 将快速失败提示打印到标准错误。
pub fn print_failed_fast() {
    eprintln!("{}", t!("failed_fast").red());
}
