//! 列表排序。

use domain::Filterable;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 排序字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    RfmTotal,
    AddTime,
    Nickname,
}

/// 排序方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// 原地稳定排序；缺少排序字段的记录无论方向都排在最后。
pub fn sort_records<R>(records: &mut [R], field: SortField, order: SortOrder)
where
    R: Filterable,
{
    records.sort_by(|left, right| compare(left, right, field, order));
}

fn compare<R: Filterable>(left: &R, right: &R, field: SortField, order: SortOrder) -> Ordering {
    match field {
        SortField::RfmTotal => {
            compare_present(left.rfm_total(), right.rfm_total(), order, f64::total_cmp)
        }
        SortField::AddTime => compare_present(left.add_time(), right.add_time(), order, Ord::cmp),
        SortField::Nickname => {
            compare_present(left.nickname(), right.nickname(), order, |l, r| l.cmp(r))
        }
    }
}

fn compare_present<T>(
    left: Option<T>,
    right: Option<T>,
    order: SortOrder,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => match order {
            SortOrder::Asc => cmp(&left, &right),
            SortOrder::Desc => cmp(&right, &left),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
