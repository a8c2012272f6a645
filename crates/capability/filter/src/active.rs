//! 生效条件统计。

use domain::FilterCondition;

/// 统计生效的顶层条件字段数量。
///
/// 数组字段非空时生效；标量字段非缺省、非空串时生效；分类为 "all" 不计入。
pub fn active_condition_count(condition: &FilterCondition) -> usize {
    [
        FilterCondition::text(&condition.nickname).is_some(),
        FilterCondition::text(&condition.wechat_id).is_some(),
        FilterCondition::text(&condition.phone).is_some(),
        !condition.tags.is_empty(),
        condition.active_category().is_some(),
        condition.rfm_min.is_some(),
        condition.rfm_max.is_some(),
        !condition.regions.is_empty(),
        condition.add_time_start.is_some(),
        condition.add_time_end.is_some(),
    ]
    .into_iter()
    .filter(|active| *active)
    .count()
}

/// 没有任何生效条件时不允许保存为方案。
pub fn can_save_scheme(condition: &FilterCondition) -> bool {
    active_condition_count(condition) > 0
}
