//! # JSON Reporting Module / JSON 报告模块
//!
//! Writes results and totals as a JSON document for other tools to consume.
//!
//! 将结果和汇总写为 JSON 文档，供其他工具使用。

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::models::{RunResult, Totals};
use crate::infra::t;

/// Top-level shape of the JSON report.
/// JSON 报告的顶层结构。
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    /// RFC 3339 local time at which the report was generated.
    pub generated_at: String,
    pub totals: &'a Totals,
    /// `None` when no example was attempted.
    pub pass_percent: Option<u32>,
    pub results: &'a [RunResult],
}

impl<'a> JsonReport<'a> {
    pub fn new(results: &'a [RunResult], totals: &'a Totals) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            generated_at: chrono::Local::now().to_rfc3339(),
            totals,
            pass_percent: totals.pass_percent(),
            results,
        }
    }
}

/// Serializes the report to pretty-printed JSON and writes it to `output_path`.
///
/// 将报告序列化为格式化的 JSON 并写入 `output_path`。
pub fn generate_json_report(results: &[RunResult], totals: &Totals, output_path: &Path) -> Result<()> {
    let report = JsonReport::new(results, totals);
    let json = serde_json::to_string_pretty(&report)
        .with_context(|| t!("report_serialize_failed").to_string())?;
    fs::write(output_path, json)
        .with_context(|| t!("report_write_failed", path = output_path.display()).to_string())
}
