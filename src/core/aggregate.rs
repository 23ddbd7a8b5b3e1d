//! # Result Aggregation Module / 结果汇总模块
//!
//! Reduces per-target results to [`Totals`] and filters results by whether
//! they attempted any example.
//!
//! 将每个目标的结果归约为 [`Totals`]，并按是否尝试了示例来过滤结果。

use crate::core::models::{EmptyFilter, RunResult, Totals};

/// Sum the counts and times of `results`.
///
/// ```
/// use doctor_testerson::core::aggregate::aggregate;
///
/// let totals = aggregate(&[]);
/// assert_eq!(totals.attempted, 0);
/// assert_eq!(totals.pass_percent(), None);
/// ```
pub fn aggregate(results: &[RunResult]) -> Totals {
    results.iter().map(Totals::of).sum()
}

/// Keep the results selected by `mode`, preserving their order.
/// 保留 `mode` 选中的结果，并保持其顺序。
pub fn filter(results: Vec<RunResult>, mode: EmptyFilter) -> Vec<RunResult> {
    results.into_iter().filter(|result| mode.keeps(result)).collect()
}
