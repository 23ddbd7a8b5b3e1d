//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Doctor Testerson:
//! target classification, example extraction and checking, the example
//! engine, the target runner and result aggregation.
//!
//! 此模块包含 Doctor Testerson 的核心功能：
//! 目标分类、示例提取与检查、示例引擎、目标运行器以及结果汇总。

pub mod aggregate;
pub mod checker;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod examples;
pub mod execution;
pub mod models;

// Re-exports
pub use checker::ComparisonOptions;
pub use classifier::TargetClassifier;
pub use config::DoctorConfig;
pub use engine::ExampleEngine;
pub use error::{LoadError, ResolutionError, TargetError};
pub use execution::TargetRunner;
pub use models::{EmptyFilter, ResolvedTarget, RunResult, Totals};
