//! # Target Execution Module / 目标执行模块
//!
//! This module runs targets end to end: classify the raw string, hand the
//! resolved target to the example engine, time the whole thing and package
//! a uniform [`RunResult`]. Target-level errors are recovered here, so every
//! supplied target yields exactly one result.
//!
//! 此模块端到端地运行目标：对原始字符串进行分类，将解析后的目标交给示例引擎，
//! 为整个过程计时并打包为统一的 [`RunResult`]。目标级错误在此处被恢复，
//! 因此每个输入的目标都恰好产生一个结果。

use tracing::{info, warn};

use crate::core::checker::ComparisonOptions;
use crate::core::classifier::TargetClassifier;
use crate::core::engine::ExampleEngine;
use crate::core::error::TargetError;
use crate::core::models::RunResult;
use crate::infra::clock::Clock;

/// Orchestrates classification and example execution for targets.
/// 为目标协调分类和示例执行。
pub struct TargetRunner<'a> {
    classifier: &'a TargetClassifier,
    engine: ExampleEngine<'a>,
    clock: &'a dyn Clock,
}

impl<'a> TargetRunner<'a> {
    pub fn new(classifier: &'a TargetClassifier, engine: ExampleEngine<'a>, clock: &'a dyn Clock) -> Self {
        Self {
            classifier,
            engine,
            clock,
        }
    }

    /// Run one target.
    ///
    /// # Arguments
    /// * `target` - Module name or file path as supplied by the user
    /// * `options` - Comparison policy for its examples
    ///
    /// # Returns
    /// A `RunResult`; errors are reported through its status, never returned.
    ///
    /// 运行单个目标。错误通过结果的状态报告，而不会被返回。
    pub fn run_target(&self, target: &str, options: &ComparisonOptions) -> RunResult {
        let start = self.clock.now();

        let resolved = match self.classifier.classify(target) {
            Ok(resolved) => resolved,
            Err(error) => {
                let elapsed = self.clock.now().saturating_duration_since(start);
                warn!(input = %target, %error, "target could not be resolved");
                return RunResult::errored(target, None, TargetError::from(error), elapsed);
            }
        };

        let outcome = self.engine.run(&resolved, options);
        let elapsed = self.clock.now().saturating_duration_since(start);
        match outcome {
            Ok(report) => {
                info!(
                    input = %target,
                    attempted = report.attempted,
                    failed = report.failed,
                    "target finished"
                );
                RunResult::completed(target, &resolved, report, elapsed)
            }
            Err(error) => {
                warn!(input = %target, %error, "target errored");
                RunResult::errored(target, Some(&resolved), error, elapsed)
            }
        }
    }

    /// Run targets sequentially, in order.
    ///
    /// With `options.fail_fast`, the first target that has a failing example
    /// or errors ends the run: every later target is reported as skipped.
    ///
    /// 按顺序依次运行目标。启用 `fail_fast` 时，第一个有失败示例或出错的目标会结束运行：
    /// 之后的所有目标都报告为已跳过。
    pub fn run_targets<S: AsRef<str>>(&self, targets: &[S], options: &ComparisonOptions) -> Vec<RunResult> {
        let mut results = Vec::with_capacity(targets.len());
        let mut stopped = false;

        for target in targets {
            let target = target.as_ref();
            if stopped {
                results.push(RunResult::skipped(target));
                continue;
            }
            let result = self.run_target(target, options);
            if options.fail_fast && result.has_failures() {
                info!(input = %target, "fail-fast: skipping remaining targets");
                stopped = true;
            }
            results.push(result);
        }

        results
    }
}
