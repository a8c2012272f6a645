//! 可被筛选的记录。
//!
//! 筛选逻辑只通过 [`Filterable`] 读取记录字段，客户、设备、内容等列表
//! 都可以按需实现其中一部分字段。

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// RFM 总分下限。
pub const RFM_TOTAL_MIN: f64 = 0.0;
/// RFM 总分上限。
pub const RFM_TOTAL_MAX: f64 = 15.0;

/// 筛选器可读取的记录字段。
///
/// 默认实现返回“无此字段”；当某个生效条件约束了记录缺失的字段时，
/// 该记录不命中。
pub trait Filterable {
    fn nickname(&self) -> Option<&str> {
        None
    }

    fn wechat_id(&self) -> Option<&str> {
        None
    }

    fn phone(&self) -> Option<&str> {
        None
    }

    fn tags(&self) -> &[String] {
        &[]
    }

    fn category(&self) -> Option<&str> {
        None
    }

    fn rfm_total(&self) -> Option<f64> {
        None
    }

    fn region(&self) -> Option<&str> {
        None
    }

    fn add_time(&self) -> Option<NaiveDate> {
        None
    }
}

/// 客户分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerCategory {
    /// 已成交客户
    Customer,
    /// 潜在客户
    Potential,
    /// 流失客户
    Lost,
}

impl CustomerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerCategory::Customer => "customer",
            CustomerCategory::Potential => "potential",
            CustomerCategory::Lost => "lost",
        }
    }
}

/// 客户价值分层。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RfmTier {
    High,
    Medium,
    Low,
}

/// RFM 评分（Recency / Frequency / Monetary）。
///
/// 筛选只使用 `total`；分项仅用于展示与计算总分。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RfmScore {
    #[serde(default)]
    pub recency: f64,
    #[serde(default)]
    pub frequency: f64,
    #[serde(default)]
    pub monetary: f64,
    pub total: f64,
}

impl RfmScore {
    /// 由三个分项计算总分，结果限制在 [0, 15]。
    pub fn from_components(recency: f64, frequency: f64, monetary: f64) -> Self {
        let total = (recency + frequency + monetary).clamp(RFM_TOTAL_MIN, RFM_TOTAL_MAX);
        Self {
            recency,
            frequency,
            monetary,
            total,
        }
    }

    /// 只有总分的评分。
    pub fn with_total(total: f64) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// 高价值 ≥ 12，中价值 ≥ 6，其余为低价值。
    pub fn tier(&self) -> RfmTier {
        if self.total >= 12.0 {
            RfmTier::High
        } else if self.total >= 6.0 {
            RfmTier::Medium
        } else {
            RfmTier::Low
        }
    }
}

/// 流量池客户记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    pub nickname: String,
    #[serde(default)]
    pub wechat_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: CustomerCategory,
    pub rfm_score: RfmScore,
    #[serde(default)]
    pub region: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub add_time: NaiveDate,
}

impl Filterable for CustomerRecord {
    fn nickname(&self) -> Option<&str> {
        Some(&self.nickname)
    }

    fn wechat_id(&self) -> Option<&str> {
        Some(&self.wechat_id)
    }

    fn phone(&self) -> Option<&str> {
        Some(&self.phone)
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn rfm_total(&self) -> Option<f64> {
        Some(self.rfm_score.total)
    }

    fn region(&self) -> Option<&str> {
        Some(&self.region)
    }

    fn add_time(&self) -> Option<NaiveDate> {
        Some(self.add_time)
    }
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    crate::condition::parse_iso_date(raw.trim())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}
