//! # Target Classifier Module / 目标分类模块
//!
//! Decides what a raw target string names: an importable module, a module
//! source file (converted to its dotted name), or a plain text file.
//!
//! 判断原始目标字符串所指向的对象：可导入的模块、模块源文件（转换为点分名称）
//! 或纯文本文件。

use std::path::Path;
use tracing::{debug, trace};

use crate::core::error::ResolutionError;
use crate::core::models::ResolvedTarget;
use crate::infra::fs::{absolute_path, find_package_root, module_name};

/// Classifies target strings. Holds the extensions that mark module source files.
/// 对目标字符串进行分类。保存用于标识模块源文件的扩展名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetClassifier {
    source_extensions: Vec<String>,
}

impl Default for TargetClassifier {
    fn default() -> Self {
        Self::new(vec!["py".to_string()])
    }
}

impl TargetClassifier {
    pub fn new(source_extensions: Vec<String>) -> Self {
        Self { source_extensions }
    }

    pub fn source_extensions(&self) -> &[String] {
        &self.source_extensions
    }

    fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.source_extensions.iter().any(|known| known == ext))
    }

    /// Resolve `target`.
    ///
    /// A string that names nothing on disk is taken to be a module name and
    /// returned unchanged. An existing path must be a regular file; source
    /// files become dotted module names relative to their package root, any
    /// other file is a text file.
    ///
    /// 解析 `target`。
    /// 磁盘上不存在的字符串被视为模块名并原样返回。已存在的路径必须是普通文件；
    /// 源文件会转换为相对于包根目录的点分模块名，其他文件则视为文本文件。
    pub fn classify(&self, target: &str) -> Result<ResolvedTarget, ResolutionError> {
        let Ok(path) = absolute_path(Path::new(target)) else {
            trace!(raw = target, "no filesystem entry, treating as module name");
            return Ok(ResolvedTarget::module(target));
        };

        if !path.is_file() {
            return Err(ResolutionError::NotAFile {
                target: target.to_string(),
            });
        }

        if !self.is_source_file(&path) {
            debug!(path = %path.display(), "classified as text file");
            return Ok(ResolvedTarget::TextFile { path });
        }

        let root = find_package_root(&path)
            .ok_or_else(|| ResolutionError::NoPackageRoot { path: path.clone() })?;
        let name = module_name(&path, &root)
            .ok_or_else(|| ResolutionError::NoPackageRoot { path: path.clone() })?;
        debug!(%name, root = %root.display(), "classified source file as module");
        Ok(ResolvedTarget::Module {
            name,
            package_root: Some(root),
        })
    }
}
