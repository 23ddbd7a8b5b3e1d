//! # File System Operations Module / 文件系统操作模块
//!
//! Path helpers used when classifying targets: resolving paths, recognising
//! package roots and turning source files into dotted module names.
//!
//! 对目标进行分类时使用的路径辅助函数：解析路径、识别包根目录，
//! 以及将源文件转换为点分模块名。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Marks a package root on its own.
pub const POETRY_FILENAME: &str = "pyproject.toml";
/// Marks a package root when no `__init__.py` sits next to it.
pub const SETUP_FILENAME: &str = "setup.py";
/// Marks a directory as a package rather than a root.
pub const PACKAGE_INIT_FILENAME: &str = "__init__.py";

/// Gets the absolute path from a potentially relative path.
///
/// # Arguments
/// * `path` - Path to canonicalize
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}

pub fn is_poetry_root(dir: &Path) -> bool {
    dir.join(POETRY_FILENAME).is_file()
}

pub fn is_setup_py_root(dir: &Path) -> bool {
    dir.join(SETUP_FILENAME).is_file() && !dir.join(PACKAGE_INIT_FILENAME).is_file()
}

/// Checks if a directory is where dotted module names begin.
/// 检查目录是否为点分模块名的起点。
pub fn is_package_root(dir: &Path) -> bool {
    is_poetry_root(dir) || is_setup_py_root(dir)
}

/// Walks upward from the directory holding `file` to the nearest package root.
///
/// # Returns
/// The package root, or `None` once the filesystem root has been passed.
///
/// 从 `file` 所在目录向上查找最近的包根目录；越过文件系统根目录后返回 `None`。
pub fn find_package_root(file: &Path) -> Option<PathBuf> {
    file.ancestors()
        .skip(1)
        .find(|dir| is_package_root(dir))
        .map(Path::to_path_buf)
}

/// The dotted module name of `file` relative to `root`: directory names
/// followed by the file stem.
///
/// # Returns
/// `None` if `file` is not under `root`.
///
/// `file` 相对于 `root` 的点分模块名：目录名加上文件主干名。
pub fn module_name(file: &Path, root: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let mut parts: Vec<String> = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    parts.push(relative.file_stem()?.to_string_lossy().into_owned());
    Some(parts.join("."))
}

/// `path` relative to the current directory when it lies below it; otherwise
/// the input unchanged.
///
/// 当 `path` 位于当前目录之下时返回相对路径；否则原样返回输入。
pub fn relative_to_cwd(target: &str) -> String {
    let Ok(cwd) = std::env::current_dir() else {
        return target.to_string();
    };
    let path = Path::new(target);
    if !path.is_absolute() {
        return target.to_string();
    }
    path.strip_prefix(&cwd)
        .map(|relative| relative.display().to_string())
        .unwrap_or_else(|_| target.to_string())
}
