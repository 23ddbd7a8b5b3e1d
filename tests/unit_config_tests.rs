//! # Config Module Unit Tests / Config 模块单元测试
//!
//! This module contains unit tests for the `config.rs` module, testing
//! `DoctorConfig` defaults, deserialization and the derived comparison options.
//!
//! 此模块包含 `config.rs` 模块的单元测试，
//! 测试 `DoctorConfig` 的默认值、反序列化以及派生的比较选项。

mod common;

use common::write_file;
use doctor_testerson::core::config::{load_config, resolve_config, DoctorConfig};
use doctor_testerson::interp::eval::DEFAULT_STEP_LIMIT;
use std::path::PathBuf;
use tempfile::tempdir;

#[cfg(test)]
mod deserialization_tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: DoctorConfig = toml::from_str("").unwrap();
        assert_eq!(config, DoctorConfig::default());
        assert!(config.language.is_none());
        assert!(config.normalize_whitespace);
        assert!(config.ellipsis);
        assert!(!config.fail_fast);
        assert_eq!(config.source_extensions, vec!["py".to_string()]);
        assert_eq!(config.search_paths, vec![".".to_string()]);
        assert_eq!(config.step_limit, DEFAULT_STEP_LIMIT);
    }

    #[test]
    fn test_full_config() {
        let toml_str = r#"
            language = "zh-CN"
            normalize_whitespace = false
            ellipsis = false
            fail_fast = true
            source_extensions = ["py", "pyx"]
            search_paths = ["src", "lib"]
            step_limit = 5000
        "#;

        let config: DoctorConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.language.as_deref(), Some("zh-CN"));
        assert!(!config.normalize_whitespace);
        assert!(!config.ellipsis);
        assert!(config.fail_fast);
        assert_eq!(config.source_extensions, vec!["py", "pyx"]);
        assert_eq!(config.search_paths, vec!["src", "lib"]);
        assert_eq!(config.step_limit, 5000);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result: Result<DoctorConfig, _> = toml::from_str("colour = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let result: Result<DoctorConfig, _> = toml::from_str("fail_fast = \"yes\"\n");
        assert!(result.is_err());
    }
}

#[cfg(test)]
mod options_tests {
    use super::*;

    #[test]
    fn test_comparison_options_follow_config() {
        let config = DoctorConfig {
            normalize_whitespace: false,
            ..DoctorConfig::default()
        };
        let options = config.comparison_options(false);
        assert!(!options.normalize_whitespace);
        assert!(options.ellipsis);
        assert!(!options.fail_fast);
    }

    #[test]
    fn test_fail_fast_from_either_source() {
        let config = DoctorConfig::default();
        assert!(config.comparison_options(true).fail_fast);

        let config = DoctorConfig {
            fail_fast: true,
            ..DoctorConfig::default()
        };
        assert!(config.comparison_options(false).fail_fast);
    }

    #[test]
    fn test_search_paths_expand_environment() {
        let Ok(home) = std::env::var("HOME") else {
            return;
        };
        let config = DoctorConfig {
            search_paths: vec!["$HOME/src".to_string(), ".".to_string()],
            ..DoctorConfig::default()
        };

        let paths = config.expanded_search_paths().unwrap();

        assert_eq!(paths, vec![PathBuf::from(format!("{home}/src")), PathBuf::from(".")]);
    }

    #[test]
    fn test_undefined_variable_is_an_error() {
        let config = DoctorConfig {
            search_paths: vec!["$TESTERSON_SURELY_UNDEFINED_VAR/src".to_string()],
            ..DoctorConfig::default()
        };
        assert!(config.expanded_search_paths().is_err());
    }
}

#[cfg(test)]
mod loading_tests {
    use super::*;

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "custom.toml", "fail_fast = true\n");

        let config = load_config(&path).unwrap();

        assert!(config.fail_fast);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(resolve_config(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "broken.toml", "fail_fast = [\n");
        assert!(load_config(&path).is_err());
    }
}
