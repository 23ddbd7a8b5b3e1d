//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures passed between the classifier,
//! the example engine, the target runner and the reporters: resolved targets,
//! example outcomes, per-target results and aggregated totals.
//!
//! 此模块定义了在分类器、示例引擎、目标运行器和报告器之间传递的数据结构：
//! 已解析的目标、示例结果、每个目标的结果以及汇总统计。

use serde::Serialize;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::TargetError;

/// What a raw target string turned out to name.
/// 原始目标字符串解析后所指向的对象。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResolvedTarget {
    /// An importable module, by dotted name.
    /// 以点分名称表示的可导入模块。
    Module {
        name: String,
        /// Set when the module was given as a file path: the directory the
        /// dotted name is relative to.
        /// 当模块以文件路径给出时设置：点分名称所相对的目录。
        package_root: Option<PathBuf>,
    },
    /// A plain text file containing examples.
    /// 包含示例的纯文本文件。
    TextFile { path: PathBuf },
}

impl ResolvedTarget {
    pub fn module(name: impl Into<String>) -> Self {
        Self::Module {
            name: name.into(),
            package_root: None,
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Module { .. } => TargetKind::Module,
            Self::TextFile { .. } => TargetKind::TextFile,
        }
    }

    /// The name shown in reports: the module name or the file path.
    /// 报告中显示的名称：模块名或文件路径。
    pub fn display_name(&self) -> String {
        match self {
            Self::Module { name, .. } => name.clone(),
            Self::TextFile { path } => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetKind {
    Module,
    TextFile,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => write!(f, "module"),
            Self::TextFile => write!(f, "text file"),
        }
    }
}

/// How a single example ended.
/// 单个示例的结束方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutcomeKind {
    Passed,
    /// The example ran but printed something other than expected.
    /// 示例运行了，但输出与预期不符。
    Mismatch,
    /// The example raised an unhandled error.
    /// 示例抛出了未处理的错误。
    Exception,
}

/// The result of running one example block.
/// 运行一个示例块的结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleOutcome {
    /// Qualified name of the owner whose documentation holds the example.
    /// 包含该示例的文档所属者的限定名称。
    pub owner: String,
    /// Source or text file the example came from, when known.
    /// 示例所在的源文件或文本文件（若已知）。
    pub file: Option<String>,
    /// 1-based line of the example's first prompt.
    pub line: usize,
    pub source: String,
    pub expected: String,
    pub actual: String,
    pub kind: OutcomeKind,
    /// Failure explanation; `None` for passing examples.
    /// 失败说明；通过的示例为 `None`。
    pub diff: Option<String>,
}

impl ExampleOutcome {
    pub fn is_failure(&self) -> bool {
        self.kind != OutcomeKind::Passed
    }
}

/// What the example engine reports for one target.
/// 示例引擎针对一个目标的报告。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExampleReport {
    pub attempted: usize,
    pub failed: usize,
    /// Time from just before the first example to just after the last.
    /// 从第一个示例开始前到最后一个示例结束后的时间。
    pub elapsed: Duration,
    /// Failed outcomes, in execution order.
    /// 按执行顺序排列的失败结果。
    pub failures: Vec<ExampleOutcome>,
}

impl ExampleReport {
    pub fn passed(&self) -> usize {
        self.attempted - self.failed
    }
}

/// Whether a target ran, could not run, or was not attempted.
/// 目标是否已运行、无法运行或未被尝试。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TargetStatus {
    Ran,
    Errored(TargetError),
    /// Not executed because an earlier target failed under fail-fast.
    /// 由于在快速失败模式下先前的目标失败而未执行。
    Skipped,
}

/// The uniform per-target record produced by the runner.
///
/// 运行器为每个目标生成的统一记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// The target string exactly as supplied.
    /// 与输入完全一致的目标字符串。
    pub target: String,
    /// Module name or file path used for display and sorting.
    /// 用于显示和排序的模块名或文件路径。
    pub name: String,
    /// `None` when the target could not be classified.
    /// 当目标无法分类时为 `None`。
    pub kind: Option<TargetKind>,
    pub status: TargetStatus,
    /// Wall time for the whole target: classification, loading and examples.
    /// 整个目标的耗时：分类、加载和示例执行。
    pub elapsed: Duration,
    /// Example execution time as measured by the engine.
    /// 由引擎测量的示例执行时间。
    pub execution_time: Duration,
    pub attempted: usize,
    pub failed: usize,
    pub failures: Vec<ExampleOutcome>,
}

impl RunResult {
    /// A target whose examples ran (whether or not they passed).
    pub fn completed(
        target: impl Into<String>,
        resolved: &ResolvedTarget,
        report: ExampleReport,
        elapsed: Duration,
    ) -> Self {
        debug_assert!(report.failed <= report.attempted);
        Self {
            target: target.into(),
            name: resolved.display_name(),
            kind: Some(resolved.kind()),
            status: TargetStatus::Ran,
            elapsed,
            execution_time: report.elapsed,
            attempted: report.attempted,
            failed: report.failed,
            failures: report.failures,
        }
    }

    /// A target that failed before or while loading.
    pub fn errored(
        target: impl Into<String>,
        resolved: Option<&ResolvedTarget>,
        error: TargetError,
        elapsed: Duration,
    ) -> Self {
        let target = target.into();
        Self {
            name: resolved.map_or_else(|| target.clone(), ResolvedTarget::display_name),
            kind: resolved.map(ResolvedTarget::kind),
            target,
            status: TargetStatus::Errored(error),
            elapsed,
            execution_time: Duration::ZERO,
            attempted: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }

    /// A target that was never attempted.
    pub fn skipped(target: impl Into<String>) -> Self {
        let target = target.into();
        Self {
            name: target.clone(),
            target,
            kind: None,
            status: TargetStatus::Skipped,
            elapsed: Duration::ZERO,
            execution_time: Duration::ZERO,
            attempted: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }

    pub fn passed(&self) -> usize {
        self.attempted - self.failed
    }

    /// No example was attempted.
    /// 没有尝试任何示例。
    pub fn is_empty(&self) -> bool {
        self.attempted == 0
    }

    pub fn error(&self) -> Option<&TargetError> {
        match &self.status {
            TargetStatus::Errored(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_errored(&self) -> bool {
        self.error().is_some()
    }

    pub fn is_skipped(&self) -> bool {
        self.status == TargetStatus::Skipped
    }

    /// Any example failed, or the target errored.
    /// 有示例失败，或目标出错。
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.is_errored()
    }
}

/// Totals over a set of results. A pure reduction: `Add` is associative and
/// commutative and `Totals::default()` is its identity.
///
/// 一组结果的汇总。纯归约：`Add` 满足结合律和交换律，`Totals::default()` 是单位元。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub targets: usize,
    pub elapsed: Duration,
    pub attempted: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl Totals {
    pub fn of(result: &RunResult) -> Self {
        Self {
            targets: 1,
            elapsed: result.elapsed,
            attempted: result.attempted,
            passed: result.passed(),
            failed: result.failed,
            errored: usize::from(result.is_errored()),
        }
    }

    /// Passed examples as a whole percentage, rounding half to even.
    /// `None` when nothing was attempted.
    ///
    /// 通过示例的百分比（四舍六入五成双）。未尝试任何示例时为 `None`。
    pub fn pass_percent(&self) -> Option<u32> {
        pass_percent(self.passed, self.attempted)
    }
}

/// Percentage of `passed` out of `attempted`, rounded half to even.
pub fn pass_percent(passed: usize, attempted: usize) -> Option<u32> {
    if attempted == 0 {
        return None;
    }
    let ratio = passed as f64 / attempted as f64 * 100.0;
    Some(ratio.round_ties_even() as u32)
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, other: Totals) -> Totals {
        Totals {
            targets: self.targets + other.targets,
            elapsed: self.elapsed + other.elapsed,
            attempted: self.attempted + other.attempted,
            passed: self.passed + other.passed,
            failed: self.failed + other.failed,
            errored: self.errored + other.errored,
        }
    }
}

impl Sum for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Totals {
        iter.fold(Totals::default(), Add::add)
    }
}

/// Which results to keep, by whether they attempted any example.
/// 按是否尝试了示例来决定保留哪些结果。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyFilter {
    #[default]
    All,
    OnlyEmpty,
    OnlyNonEmpty,
}

impl EmptyFilter {
    /// Map the `--empty` / `--no-empty` tri-state.
    /// 映射 `--empty` / `--no-empty` 三态标志。
    pub fn from_flag(empty: Option<bool>) -> Self {
        match empty {
            None => Self::All,
            Some(true) => Self::OnlyEmpty,
            Some(false) => Self::OnlyNonEmpty,
        }
    }

    pub fn keeps(self, result: &RunResult) -> bool {
        match self {
            Self::All => true,
            Self::OnlyEmpty => result.is_empty(),
            Self::OnlyNonEmpty => !result.is_empty(),
        }
    }
}
