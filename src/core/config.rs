//! # Configuration Module / 配置模块
//!
//! The optional `Testerson.toml` file. Every field has a default, so an empty
//! file (or no file at all) is a valid configuration. Command-line flags take
//! precedence over values read here.
//!
//! 可选的 `Testerson.toml` 配置文件。每个字段都有默认值，因此空文件（或没有文件）
//! 也是有效配置。命令行参数优先于此处读取的值。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::checker::ComparisonOptions;
use crate::infra::t;

/// File looked up in the current directory when `--config` is not given.
/// 未指定 `--config` 时在当前目录查找的文件。
pub const DEFAULT_CONFIG_FILE: &str = "Testerson.toml";

/// Settings loaded from the configuration file.
/// 从配置文件加载的设置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DoctorConfig {
    /// UI language (e.g., "en", "zh-CN"). Detected from the system when unset.
    /// 界面语言（例如 "en", "zh-CN"）。未设置时从系统检测。
    #[serde(default)]
    pub language: Option<String>,
    /// Collapse runs of whitespace before comparing output.
    /// 比较输出前合并连续空白。
    #[serde(default = "default_true")]
    pub normalize_whitespace: bool,
    /// Let `...` in expected output match any text.
    /// 允许预期输出中的 `...` 匹配任意文本。
    #[serde(default = "default_true")]
    pub ellipsis: bool,
    /// Stop at the first failure.
    /// 在第一次失败时停止。
    #[serde(default)]
    pub fail_fast: bool,
    /// File extensions treated as module source.
    /// 被视为模块源码的文件扩展名。
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,
    /// Directories searched for modules named on the command line.
    /// May contain `~` and environment variables.
    ///
    /// 用于查找命令行中指定模块的目录。可以包含 `~` 和环境变量。
    #[serde(default = "default_search_paths")]
    pub search_paths: Vec<String>,
    /// Evaluation steps allowed per example before it is aborted.
    /// 每个示例在被中止前允许的求值步数。
    #[serde(default = "default_step_limit")]
    pub step_limit: u64,
}

fn default_true() -> bool {
    true
}

fn default_source_extensions() -> Vec<String> {
    vec!["py".to_string()]
}

fn default_search_paths() -> Vec<String> {
    vec![".".to_string()]
}

fn default_step_limit() -> u64 {
    crate::interp::eval::DEFAULT_STEP_LIMIT
}

impl Default for DoctorConfig {
    fn default() -> Self {
        Self {
            language: None,
            normalize_whitespace: true,
            ellipsis: true,
            fail_fast: false,
            source_extensions: default_source_extensions(),
            search_paths: default_search_paths(),
            step_limit: default_step_limit(),
        }
    }
}

impl DoctorConfig {
    /// Comparison policy, with the command line's fail-fast flag OR-ed in.
    /// 比较策略，并合并命令行的快速失败标志。
    pub fn comparison_options(&self, fail_fast: bool) -> ComparisonOptions {
        ComparisonOptions {
            normalize_whitespace: self.normalize_whitespace,
            ellipsis: self.ellipsis,
            fail_fast: self.fail_fast || fail_fast,
        }
    }

    /// Search paths with `~` and `$VARS` expanded.
    /// 展开 `~` 和 `$VARS` 之后的搜索路径。
    pub fn expanded_search_paths(&self) -> Result<Vec<PathBuf>> {
        self.search_paths
            .iter()
            .map(|raw| {
                shellexpand::full(raw)
                    .map(|expanded| PathBuf::from(expanded.as_ref()))
                    .with_context(|| t!("config_bad_search_path", path = raw).to_string())
            })
            .collect()
    }
}

/// Read and parse a configuration file.
/// 读取并解析配置文件。
pub fn load_config(path: &Path) -> Result<DoctorConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| t!("config_read_failed", path = path.display()).to_string())?;
    toml::from_str(&content)
        .with_context(|| t!("config_parse_failed", path = path.display()).to_string())
}

/// Load the explicit file if given, else `Testerson.toml` if present, else defaults.
///
/// 如果指定了文件则加载该文件；否则在存在时加载 `Testerson.toml`；否则使用默认值。
pub fn resolve_config(explicit: Option<&Path>) -> Result<DoctorConfig> {
    match explicit {
        Some(path) => load_config(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                load_config(default_path)
            } else {
                Ok(DoctorConfig::default())
            }
        }
    }
}
