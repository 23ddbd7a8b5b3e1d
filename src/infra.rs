//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for Doctor Testerson:
//! module loading, file system helpers, the clock, logging setup and i18n.
//!
//! 此模块为 Doctor Testerson 提供基础设施服务：
//! 模块加载、文件系统辅助、时钟、日志设置以及国际化支持。

pub mod clock;
pub mod fs;
pub mod loader;
pub mod logging;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
