//! 命令行输出的稳定 JSON 契约。

use chrono::{DateTime, Utc};
use domain::{FilterCondition, FilterScheme};
use serde::Serialize;

/// 标准响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 方案返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub conditions: FilterCondition,
    pub active_condition_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub usage_count: u64,
}

impl SchemeDto {
    pub fn from_scheme(scheme: FilterScheme, active_condition_count: usize) -> Self {
        Self {
            id: scheme.id,
            name: scheme.name,
            description: scheme.description,
            conditions: scheme.conditions,
            active_condition_count,
            created_at: scheme.created_at,
            updated_at: scheme.updated_at,
            usage_count: scheme.usage_count,
        }
    }
}

/// 筛选结果：命中统计与命中记录。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResultDto<R> {
    pub total: usize,
    pub matched: usize,
    pub percentage: f64,
    pub active_condition_count: usize,
    pub records: Vec<R>,
}

/// 应用方案的返回：方案 ID、条件与筛选结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplySchemeDto<R> {
    pub scheme_id: String,
    pub conditions: FilterCondition,
    pub result: FilterResultDto<R>,
}

/// 删除结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSchemeDto {
    pub scheme_id: String,
    pub deleted: bool,
}
