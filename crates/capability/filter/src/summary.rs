//! 分群命中统计。

use crate::evaluator::filter_records;
use domain::{FilterCondition, Filterable};
use serde::Serialize;

/// 命中数量与占比（百分比，保留一位小数）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSummary {
    pub total: usize,
    pub matched: usize,
    pub percentage: f64,
}

impl SegmentSummary {
    pub fn new(total: usize, matched: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            (matched as f64 / total as f64 * 1000.0).round() / 10.0
        };
        Self {
            total,
            matched,
            percentage,
        }
    }
}

/// 对记录集合求值并汇总命中情况。
pub fn summarize<R>(records: &[R], condition: &FilterCondition) -> SegmentSummary
where
    R: Filterable,
{
    let matched = filter_records(records, condition).len();
    SegmentSummary::new(records.len(), matched)
}
