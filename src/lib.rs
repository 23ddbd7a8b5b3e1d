//! # Doctor Testerson Library / Doctor Testerson 库
//!
//! This library provides the core functionality for Doctor Testerson, a
//! driver that finds the examples embedded in module documentation and text
//! files, runs them, and reports per-target and total results.
//!
//! 此库为 Doctor Testerson 提供核心功能。它查找嵌入在模块文档和文本文件中的示例，
//! 运行它们，并报告每个目标及总计的结果。
//!
//! ## Modules / 模块
//!
//! - `core` - Target classification, example engine, runner and aggregation
//! - `infra` - Module loading, file system helpers, clock and logging
//! - `interp` - The language embedded examples are written in
//! - `reporting` - Console, HTML and JSON reports
//! - `cli` / `commands` - Command-line interface
//!
//! - `core` - 目标分类、示例引擎、运行器和汇总
//! - `infra` - 模块加载、文件系统辅助、时钟和日志
//! - `interp` - 嵌入式示例所用的语言
//! - `reporting` - 控制台、HTML 和 JSON 报告
//! - `cli` / `commands` - 命令行接口

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod interp;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::execution;
pub use core::models;

/// Picks the UI language: the requested one if given, else the system locale.
///
/// It tries the full locale (e.g., "zh-CN") first, then just the language
/// code (e.g., "en" from "en-US"), and finally falls back to "en".
///
/// 选择界面语言：优先使用请求的语言，否则使用系统语言。
/// 先尝试完整的区域设置（如 "zh-CN"），再尝试语言代码（如 "en-US" 中的 "en"），
/// 最后回退到 "en"。
pub fn select_locale(requested: Option<&str>) -> String {
    let locale = requested
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&locale.as_str()) {
        return locale;
    }
    locale
        .split(['-', '_'])
        .next()
        .filter(|code| !code.is_empty())
        .and_then(|code| available_locales.iter().find(|l| l.starts_with(code)))
        .map_or_else(|| "en".to_string(), |l| l.to_string())
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
