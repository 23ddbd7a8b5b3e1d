//! # Classifier Unit Tests / 分类器单元测试
//!
//! Tests for turning raw target strings into modules or text files.
//!
//! 将原始目标字符串转换为模块或文本文件的测试。

mod common;

use common::{setup_project, write_file};
use doctor_testerson::core::classifier::TargetClassifier;
use doctor_testerson::core::error::ResolutionError;
use doctor_testerson::core::models::{ResolvedTarget, TargetKind};
use doctor_testerson::infra::fs::{find_package_root, is_setup_py_root, module_name};
use std::fs;
use tempfile::tempdir;

#[cfg(test)]
mod classify_tests {
    use super::*;

    #[test]
    fn test_unknown_string_is_module_name() {
        let classifier = TargetClassifier::default();
        let resolved = classifier.classify("some.dotted_module_that_is_not_a_path").unwrap();
        assert_eq!(resolved, ResolvedTarget::module("some.dotted_module_that_is_not_a_path"));
        assert_eq!(resolved.kind(), TargetKind::Module);
    }

    #[test]
    fn test_source_file_becomes_dotted_name() {
        let project = setup_project();
        let file = write_file(project.path(), "pkg/sub/mod.py", "x = 1\n");

        let resolved = TargetClassifier::default()
            .classify(file.to_str().unwrap())
            .unwrap();

        match resolved {
            ResolvedTarget::Module { name, package_root } => {
                assert_eq!(name, "pkg.sub.mod");
                assert_eq!(package_root, Some(fs::canonicalize(project.path()).unwrap()));
            }
            other => panic!("expected a module, got {other:?}"),
        }
    }

    #[test]
    fn test_other_file_is_text_file() {
        let project = setup_project();
        let file = write_file(project.path(), "docs/guide.md", ">>> 1\n1\n");

        let resolved = TargetClassifier::default()
            .classify(file.to_str().unwrap())
            .unwrap();

        assert_eq!(resolved.kind(), TargetKind::TextFile);
        assert!(resolved.display_name().ends_with("guide.md"));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let project = setup_project();
        let target = project.path().to_str().unwrap().to_string();

        let error = TargetClassifier::default().classify(&target).unwrap_err();

        assert_eq!(error, ResolutionError::NotAFile { target });
    }

    #[test]
    fn test_source_file_without_root() {
        let dir = tempdir().unwrap();
        let file = write_file(dir.path(), "loose.py", "x = 1\n");

        let error = TargetClassifier::default()
            .classify(file.to_str().unwrap())
            .unwrap_err();

        assert!(matches!(error, ResolutionError::NoPackageRoot { .. }));
    }

    #[test]
    fn test_custom_source_extensions() {
        let project = setup_project();
        let file = write_file(project.path(), "lib/tools.ex", "x = 1\n");
        let classifier = TargetClassifier::new(vec!["ex".to_string()]);

        let resolved = classifier.classify(file.to_str().unwrap()).unwrap();

        assert_eq!(resolved.display_name(), "lib.tools");
        // `.py` is no longer a source extension.
        let py = write_file(project.path(), "other.py", "x = 1\n");
        let resolved = classifier.classify(py.to_str().unwrap()).unwrap();
        assert_eq!(resolved.kind(), TargetKind::TextFile);
    }
}

#[cfg(test)]
mod package_root_tests {
    use super::*;

    #[test]
    fn test_setup_py_marks_root_without_init() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "setup.py", "");
        assert!(is_setup_py_root(dir.path()));

        write_file(dir.path(), "__init__.py", "");
        assert!(!is_setup_py_root(dir.path()));
    }

    #[test]
    fn test_nearest_root_wins() {
        let project = setup_project();
        write_file(project.path(), "inner/pyproject.toml", "");
        let file = write_file(project.path(), "inner/a/b.py", "");

        let root = find_package_root(&file).unwrap();

        assert_eq!(root, project.path().join("inner"));
        assert_eq!(module_name(&file, &root).as_deref(), Some("a.b"));
    }

    #[test]
    fn test_module_name_outside_root() {
        let project = setup_project();
        let other = tempdir().unwrap();
        let file = write_file(other.path(), "x.py", "");
        assert_eq!(module_name(&file, project.path()), None);
    }
}
