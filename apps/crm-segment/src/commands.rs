//! 子命令处理
//!
//! - filter：按条件筛选客户
//! - schemes list / save / apply / rename / delete：筛选方案管理
//!
//! 处理函数只返回数据或 [`CommandError`]，输出格式由 main 统一封装。

use crate::AppState;
use api_contract::{ApplySchemeDto, DeleteSchemeDto, FilterResultDto, SchemeDto};
use crm_filter::{
    SegmentSummary, SortField, SortOrder, active_condition_count, can_save_scheme,
    filter_records, sort_records,
};
use crm_storage::{SchemeCreate, SchemeUpdate, StorageError};
use domain::{CustomerRecord, FilterCondition, FilterScheme};

/// 命令执行错误。
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("invalid conditions: {0}")]
    InvalidConditions(String),
    #[error("no active conditions, nothing to save")]
    NoActiveConditions,
    #[error("scheme not found: {0}")]
    SchemeNotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CommandError {
    /// 输出用的错误码。
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::InvalidConditions(_) => "FILTER.INVALID_CONDITIONS",
            CommandError::NoActiveConditions => "SCHEME.NO_ACTIVE_CONDITIONS",
            CommandError::SchemeNotFound(_) => "SCHEME.NOT_FOUND",
            CommandError::Storage(StorageError::Validation(_)) => "SCHEME.VALIDATION",
            CommandError::Storage(_) => "STORAGE.ERROR",
        }
    }
}

/// 排序参数。
pub type SortChoice = Option<(SortField, SortOrder)>;

/// 解析 `--conditions` JSON，缺省为空条件。
pub fn parse_conditions(raw: Option<&str>) -> Result<FilterCondition, CommandError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(FilterCondition::default()),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|err| CommandError::InvalidConditions(err.to_string())),
    }
}

/// 按条件筛选客户
pub async fn run_filter(
    state: &AppState,
    conditions: &FilterCondition,
    sort: SortChoice,
) -> Result<FilterResultDto<CustomerRecord>, CommandError> {
    let customers = state.customers.list_customers().await?;
    Ok(evaluate(&customers, conditions, sort))
}

/// 列出方案
pub async fn list_schemes(state: &AppState) -> Result<Vec<SchemeDto>, CommandError> {
    let schemes = state.schemes.list_schemes().await?;
    Ok(schemes.into_iter().map(scheme_to_dto).collect())
}

/// 保存当前条件为方案
pub async fn save_scheme(
    state: &AppState,
    name: String,
    description: Option<String>,
    conditions: FilterCondition,
) -> Result<SchemeDto, CommandError> {
    if !can_save_scheme(&conditions) {
        return Err(CommandError::NoActiveConditions);
    }
    let scheme = state
        .schemes
        .create_scheme(SchemeCreate {
            name,
            description,
            conditions,
        })
        .await?;
    Ok(scheme_to_dto(scheme))
}

/// 应用方案并返回筛选结果
pub async fn apply_scheme(
    state: &AppState,
    scheme_id: &str,
    sort: SortChoice,
) -> Result<ApplySchemeDto<CustomerRecord>, CommandError> {
    let conditions = state
        .schemes
        .apply_scheme(scheme_id)
        .await?
        .ok_or_else(|| CommandError::SchemeNotFound(scheme_id.to_string()))?;
    let customers = state.customers.list_customers().await?;
    let result = evaluate(&customers, &conditions, sort);
    Ok(ApplySchemeDto {
        scheme_id: scheme_id.to_string(),
        conditions,
        result,
    })
}

/// 编辑方案名称与描述
pub async fn rename_scheme(
    state: &AppState,
    scheme_id: &str,
    name: String,
    description: Option<String>,
) -> Result<SchemeDto, CommandError> {
    let scheme = state
        .schemes
        .update_scheme(scheme_id, SchemeUpdate { name, description })
        .await?
        .ok_or_else(|| CommandError::SchemeNotFound(scheme_id.to_string()))?;
    Ok(scheme_to_dto(scheme))
}

/// 删除方案（重复删除不报错）
pub async fn delete_scheme(
    state: &AppState,
    scheme_id: &str,
) -> Result<DeleteSchemeDto, CommandError> {
    let deleted = state.schemes.delete_scheme(scheme_id).await?;
    Ok(DeleteSchemeDto {
        scheme_id: scheme_id.to_string(),
        deleted,
    })
}

fn evaluate(
    customers: &[CustomerRecord],
    conditions: &FilterCondition,
    sort: SortChoice,
) -> FilterResultDto<CustomerRecord> {
    let mut records: Vec<CustomerRecord> = filter_records(customers, conditions)
        .into_iter()
        .cloned()
        .collect();
    if let Some((field, order)) = sort {
        sort_records(&mut records, field, order);
    }
    let summary = SegmentSummary::new(customers.len(), records.len());
    FilterResultDto {
        total: summary.total,
        matched: summary.matched,
        percentage: summary.percentage,
        active_condition_count: active_condition_count(conditions),
        records,
    }
}

fn scheme_to_dto(scheme: FilterScheme) -> SchemeDto {
    let active = active_condition_count(&scheme.conditions);
    SchemeDto::from_scheme(scheme, active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_storage::{InMemoryCustomerSource, InMemoryKeyValue, KvSchemeStore};
    use std::sync::Arc;

    fn demo_state() -> AppState {
        AppState {
            schemes: Arc::new(KvSchemeStore::new(Arc::new(InMemoryKeyValue::new()))),
            customers: Arc::new(InMemoryCustomerSource::with_demo_customers()),
        }
    }

    fn nicknames(records: &[CustomerRecord]) -> Vec<&str> {
        records.iter().map(|record| record.nickname.as_str()).collect()
    }

    #[test]
    fn parse_conditions_defaults_to_empty() {
        assert_eq!(parse_conditions(None).expect("parse"), FilterCondition::default());
        assert_eq!(
            parse_conditions(Some("  ")).expect("parse"),
            FilterCondition::default()
        );
        assert!(matches!(
            parse_conditions(Some("{tags")),
            Err(CommandError::InvalidConditions(_))
        ));
    }

    #[tokio::test]
    async fn filter_sorted_by_rfm() {
        let state = demo_state();
        let conditions = parse_conditions(Some(r#"{"tags":["VIP"]}"#)).expect("parse");
        let result = run_filter(
            &state,
            &conditions,
            Some((SortField::RfmTotal, SortOrder::Asc)),
        )
        .await
        .expect("filter");
        assert_eq!(result.total, 4);
        assert_eq!(result.matched, 2);
        assert_eq!(result.percentage, 50.0);
        assert_eq!(result.active_condition_count, 1);
        assert_eq!(nicknames(&result.records), vec!["王五", "张三"]);
    }

    #[tokio::test]
    async fn save_requires_active_conditions() {
        let state = demo_state();
        let err = save_scheme(&state, "空方案".to_string(), None, FilterCondition::default())
            .await
            .expect_err("rejected");
        assert_eq!(err.code(), "SCHEME.NO_ACTIVE_CONDITIONS");

        let conditions = parse_conditions(Some(r#"{"regions":["北京"]}"#)).expect("parse");
        let err = save_scheme(&state, " ".to_string(), None, conditions)
            .await
            .expect_err("rejected");
        assert_eq!(err.code(), "SCHEME.VALIDATION");
        assert!(list_schemes(&state).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn save_apply_rename_delete() {
        let state = demo_state();
        let conditions =
            parse_conditions(Some(r#"{"regions":["北京"],"rfmMin":12}"#)).expect("parse");
        let saved = save_scheme(&state, "北京高价值客户".to_string(), None, conditions.clone())
            .await
            .expect("save");
        assert_eq!(saved.usage_count, 0);
        assert_eq!(saved.active_condition_count, 2);

        let applied = apply_scheme(&state, &saved.id, None)
            .await
            .expect("apply");
        assert_eq!(applied.conditions, conditions);
        assert_eq!(nicknames(&applied.result.records), vec!["张三", "王五"]);

        let listed = list_schemes(&state).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].usage_count, 1);

        let renamed = rename_scheme(&state, &saved.id, "京城 VIP".to_string(), None)
            .await
            .expect("rename");
        assert_eq!(renamed.name, "京城 VIP");

        assert!(delete_scheme(&state, &saved.id).await.expect("delete").deleted);
        assert!(!delete_scheme(&state, &saved.id).await.expect("delete").deleted);
    }

    #[tokio::test]
    async fn apply_unknown_scheme_reports_not_found() {
        let state = demo_state();
        let err = apply_scheme(&state, "scheme_404", None)
            .await
            .expect_err("missing");
        assert_eq!(err.code(), "SCHEME.NOT_FOUND");
    }
}
