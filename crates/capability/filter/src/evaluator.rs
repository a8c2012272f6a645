//! 条件谓词求值。

use chrono::NaiveDate;
use domain::{FilterCondition, Filterable};

/// 判断记录是否满足条件集合。
///
/// 未设置（缺省、空字符串、空数组）的字段不构成约束；空条件匹配所有记录。
pub fn matches<R>(record: &R, condition: &FilterCondition) -> bool
where
    R: Filterable + ?Sized,
{
    text_matches(record.nickname(), &condition.nickname)
        && text_matches(record.wechat_id(), &condition.wechat_id)
        && text_matches(record.phone(), &condition.phone)
        && any_tag_matches(record.tags(), &condition.tags)
        && region_matches(record.region(), &condition.regions)
        && category_matches(record.category(), condition)
        && rfm_matches(record.rfm_total(), condition.rfm_min, condition.rfm_max)
        && date_matches(
            record.add_time(),
            condition.add_time_start,
            condition.add_time_end,
        )
}

/// 按条件筛选记录，保持输入顺序。
pub fn filter_records<'a, R>(records: &'a [R], condition: &FilterCondition) -> Vec<&'a R>
where
    R: Filterable,
{
    let matched: Vec<&R> = records
        .iter()
        .filter(|record| matches(*record, condition))
        .collect();
    tracing::debug!(
        evaluated = records.len(),
        matched = matched.len(),
        "filter evaluated"
    );
    crm_telemetry::record_evaluation(records.len() as u64, matched.len() as u64);
    matched
}

/// 大小写不敏感的子串匹配。
fn text_matches(field: Option<&str>, wanted: &Option<String>) -> bool {
    let Some(wanted) = FilterCondition::text(wanted) else {
        return true;
    };
    match field {
        Some(value) => value.to_lowercase().contains(&wanted.to_lowercase()),
        None => false,
    }
}

fn any_tag_matches(tags: &[String], wanted: &[String]) -> bool {
    wanted.is_empty() || tags.iter().any(|tag| wanted.contains(tag))
}

fn region_matches(region: Option<&str>, wanted: &[String]) -> bool {
    if wanted.is_empty() {
        return true;
    }
    match region {
        Some(region) => wanted.iter().any(|item| item == region),
        None => false,
    }
}

fn category_matches(category: Option<&str>, condition: &FilterCondition) -> bool {
    match condition.active_category() {
        Some(wanted) => category == Some(wanted),
        None => true,
    }
}

/// 闭区间判断，未设置的一侧不约束。
fn rfm_matches(total: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(total) = total else {
        return false;
    };
    min.is_none_or(|min| total >= min) && max.is_none_or(|max| total <= max)
}

/// 添加日期的闭区间判断。
fn date_matches(date: Option<NaiveDate>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(date) = date else {
        return false;
    };
    start.is_none_or(|start| date >= start) && end.is_none_or(|end| date <= end)
}
