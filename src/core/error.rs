//! # Error Types Module / 错误类型模块
//!
//! Target-level errors. Any of these makes a whole target unusable; they are
//! recovered at the runner boundary and reported as an errored target.
//! Failures of individual examples are not errors, they are counted.
//!
//! 目标级错误。任何一种都会使整个目标不可用；它们在运行器边界被恢复，
//! 并报告为出错的目标。单个示例的失败不是错误，而是被计数。

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Raised while turning a raw target string into a [`ResolvedTarget`](crate::core::models::ResolvedTarget).
/// 在将原始目标字符串解析为 `ResolvedTarget` 时产生。
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ResolutionError {
    /// The path exists but is a directory or another non-regular entry.
    /// 路径存在，但不是普通文件。
    #[error("'{target}' exists but is not a regular file")]
    NotAFile { target: String },
    /// No package root was found above a source file.
    /// 在源文件之上未找到包根目录。
    #[error("no package root found above '{}'", path.display())]
    NoPackageRoot { path: PathBuf },
}

/// Raised while loading a module or reading a text file.
/// 在加载模块或读取文本文件时产生。
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum LoadError {
    #[error("no module named '{module}'")]
    NotFound { module: String },
    #[error("cannot read '{}': {message}", path.display())]
    Read { path: PathBuf, message: String },
    /// The module's source is invalid or raised while being executed.
    /// 模块源码无效，或在执行时抛出异常。
    #[error("importing '{module}' failed: {message}")]
    Import { module: String, message: String },
}

/// Everything that can make a target fail as a whole.
/// 所有会使目标整体失败的错误。
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum TargetError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Load(#[from] LoadError),
}
