//! 已保存的筛选方案。

use crate::condition::FilterCondition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 方案 ID 前缀，完整格式为 `scheme_<unix 毫秒>`。
pub const SCHEME_ID_PREFIX: &str = "scheme_";

/// 当前持久化格式版本；旧数据缺少该字段时按 1 处理。
pub const SCHEME_VERSION: u32 = 1;

fn default_version() -> u32 {
    SCHEME_VERSION
}

/// 命名、带时间戳与使用次数的筛选条件集合。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterScheme {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub conditions: FilterCondition,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default = "default_version")]
    pub version: u32,
}

impl FilterScheme {
    /// 由毫秒时间戳生成方案 ID。
    pub fn id_for_millis(millis: i64) -> String {
        format!("{SCHEME_ID_PREFIX}{millis}")
    }

    /// ID 中的毫秒部分；非 `scheme_<毫秒>` 格式时为 None。
    pub fn id_millis(&self) -> Option<i64> {
        self.id.strip_prefix(SCHEME_ID_PREFIX)?.parse().ok()
    }
}
