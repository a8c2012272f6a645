//! 筛选条件模型。
//!
//! 所有字段均可选：缺省、空字符串、空数组都表示“不约束”。
//! 序列化格式为 camelCase JSON，与已保存方案的持久化格式一致。

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// 客户分类的“全部”哨兵值，不构成约束。
pub const CATEGORY_ALL: &str = "all";

/// 筛选条件集合。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wechat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// 标签（任一命中即可）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// customer | potential | lost | all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rfm_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rfm_max: Option<f64>,
    /// 地区（任一命中即可）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub add_time_start: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub add_time_end: Option<NaiveDate>,
}

impl FilterCondition {
    /// 非空的文本条件（空字符串视为未设置）。
    pub fn text(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|value| !value.is_empty())
    }

    /// 生效的分类条件（空字符串与 "all" 视为未设置）。
    pub fn active_category(&self) -> Option<&str> {
        Self::text(&self.category).filter(|value| *value != CATEGORY_ALL)
    }

    /// 界面展示用的 RFM 区间，未设置的一侧以 0 / 15 占位。
    pub fn display_rfm_range(&self) -> (f64, f64) {
        (
            self.rfm_min.unwrap_or(crate::record::RFM_TOTAL_MIN),
            self.rfm_max.unwrap_or(crate::record::RFM_TOTAL_MAX),
        )
    }
}

/// 解析日期字段：空串视为缺省，带时间的 ISO 字符串截取日期部分。
fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_iso_date(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {value}"))),
    }
}

/// 解析 `YYYY-MM-DD`，或截取 `YYYY-MM-DDTHH:MM:SS...` 的日期部分。
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
