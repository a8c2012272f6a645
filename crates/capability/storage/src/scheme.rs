//! 筛选方案存储实现
//!
//! 整个方案集合以 JSON 数组保存在单个键下。每次修改都读取完整集合、
//! 修改后整体写回，不做局部更新。
//!
//! 集合中个别条目无法解析时只丢弃这些条目；修改前会把原始内容备份到
//! `<key>.corrupt`，避免写回时丢失数据。
//!
//! 同一进程内的修改通过异步互斥锁串行化；多个进程（或多个浏览器标签页）
//! 同时写入同一个键时仍可能互相覆盖。

use crate::error::StorageError;
use crate::models::{SchemeCreate, SchemeUpdate};
use crate::traits::{KeyValueBackend, SchemeStore};
use crate::validation::{ensure_scheme_name, normalize_description};
use chrono::{DateTime, TimeDelta, Utc};
use domain::{FilterCondition, FilterScheme, SCHEME_VERSION};
use std::sync::Arc;
use tokio::sync::Mutex;

/// 默认存储键。
pub const DEFAULT_SCHEME_KEY: &str = "filterSchemes";

/// 损坏内容备份键的后缀。
pub const CORRUPT_BACKUP_SUFFIX: &str = ".corrupt";

/// 基于键值后端的方案存储
pub struct KvSchemeStore {
    backend: Arc<dyn KeyValueBackend>,
    key: String,
    /// 写锁，同时记录本实例已发出的最大 ID 毫秒值。
    write_lock: Mutex<i64>,
}

/// 一次读取的结果。
struct Loaded {
    schemes: Vec<FilterScheme>,
    /// 内容有无法解析的部分时保留原文。
    corrupt_raw: Option<String>,
}

impl KvSchemeStore {
    /// 使用默认键 `filterSchemes`。
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self::with_key(backend, DEFAULT_SCHEME_KEY)
    }

    pub fn with_key(backend: Arc<dyn KeyValueBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            write_lock: Mutex::new(i64::MIN),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// 损坏内容的备份键。
    pub fn backup_key(&self) -> String {
        format!("{}{CORRUPT_BACKUP_SUFFIX}", self.key)
    }

    /// 读取完整集合；键不存在时为空，无法解析的条目被跳过。
    async fn read(&self) -> Result<Loaded, StorageError> {
        let Some(data) = self.backend.get(&self.key).await? else {
            return Ok(Loaded {
                schemes: Vec::new(),
                corrupt_raw: None,
            });
        };
        let items = match serde_json::from_str::<Vec<serde_json::Value>>(&data) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "stored schemes unreadable, treating as empty");
                crm_telemetry::record_corrupt_read();
                return Ok(Loaded {
                    schemes: Vec::new(),
                    corrupt_raw: Some(data),
                });
            }
        };
        let mut schemes = Vec::with_capacity(items.len());
        let mut skipped = 0usize;
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<FilterScheme>(item) {
                Ok(scheme) => schemes.push(scheme),
                Err(err) => {
                    tracing::warn!(key = %self.key, index, error = %err, "skipping unreadable scheme");
                    skipped += 1;
                }
            }
        }
        if skipped == 0 {
            return Ok(Loaded {
                schemes,
                corrupt_raw: None,
            });
        }
        crm_telemetry::record_corrupt_read();
        Ok(Loaded {
            schemes,
            corrupt_raw: Some(data),
        })
    }

    async fn load(&self) -> Result<Vec<FilterScheme>, StorageError> {
        Ok(self.read().await?.schemes)
    }

    /// 修改前读取；内容有损坏时先备份原文，再交给调用方整体写回。
    async fn load_for_update(&self) -> Result<Vec<FilterScheme>, StorageError> {
        let loaded = self.read().await?;
        if let Some(raw) = loaded.corrupt_raw {
            let backup_key = self.backup_key();
            self.backend.set(&backup_key, raw).await?;
            tracing::warn!(key = %self.key, backup_key = %backup_key, "unreadable schemes backed up");
        }
        Ok(loaded.schemes)
    }

    /// 整体写回集合；集合为空时移除该键。
    async fn save(&self, schemes: &[FilterScheme]) -> Result<(), StorageError> {
        if schemes.is_empty() {
            return self.backend.remove(&self.key).await;
        }
        let data = serde_json::to_string(schemes)?;
        self.backend.set(&self.key, data).await
    }
}

/// 生成 `scheme_<毫秒>` ID 的毫秒值。
///
/// 不早于当前时间，且大于集合中已有 ID 与本实例发出过的 ID，
/// 删除后在同一毫秒内新建也不会复用旧 ID。
fn next_scheme_millis(schemes: &[FilterScheme], now: DateTime<Utc>, last_issued: i64) -> i64 {
    let existing = schemes
        .iter()
        .filter_map(FilterScheme::id_millis)
        .max()
        .unwrap_or(i64::MIN);
    let mut millis = now
        .timestamp_millis()
        .max(existing.saturating_add(1))
        .max(last_issued.saturating_add(1));
    while schemes
        .iter()
        .any(|scheme| scheme.id == FilterScheme::id_for_millis(millis))
    {
        millis += 1;
    }
    millis
}

/// 新的 updated_at，保证严格晚于上一次。
fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + TimeDelta::milliseconds(1)
    }
}

#[async_trait::async_trait]
impl SchemeStore for KvSchemeStore {
    async fn list_schemes(&self) -> Result<Vec<FilterScheme>, StorageError> {
        let mut schemes = self.load().await?;
        schemes.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
        Ok(schemes)
    }

    async fn find_scheme(&self, scheme_id: &str) -> Result<Option<FilterScheme>, StorageError> {
        let scheme = self
            .load()
            .await?
            .into_iter()
            .find(|scheme| scheme.id == scheme_id);
        Ok(scheme)
    }

    async fn create_scheme(&self, create: SchemeCreate) -> Result<FilterScheme, StorageError> {
        let name = ensure_scheme_name(&create.name)?;
        let mut last_issued = self.write_lock.lock().await;
        let mut schemes = self.load_for_update().await?;
        let now = Utc::now();
        let millis = next_scheme_millis(&schemes, now, *last_issued);
        let scheme = FilterScheme {
            id: FilterScheme::id_for_millis(millis),
            name,
            description: normalize_description(create.description),
            conditions: create.conditions,
            created_at: now,
            updated_at: now,
            usage_count: 0,
            version: SCHEME_VERSION,
        };
        schemes.push(scheme.clone());
        self.save(&schemes).await?;
        *last_issued = millis;
        tracing::info!(scheme_id = %scheme.id, name = %scheme.name, "scheme created");
        crm_telemetry::record_scheme_created();
        Ok(scheme)
    }

    async fn apply_scheme(
        &self,
        scheme_id: &str,
    ) -> Result<Option<FilterCondition>, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut schemes = self.load_for_update().await?;
        let Some(scheme) = schemes.iter_mut().find(|scheme| scheme.id == scheme_id) else {
            tracing::debug!(scheme_id, "apply skipped, scheme not found");
            return Ok(None);
        };
        scheme.usage_count += 1;
        scheme.updated_at = next_updated_at(scheme.updated_at);
        let conditions = scheme.conditions.clone();
        let usage_count = scheme.usage_count;
        self.save(&schemes).await?;
        tracing::info!(scheme_id, usage_count, "scheme applied");
        crm_telemetry::record_scheme_applied();
        Ok(Some(conditions))
    }

    async fn update_scheme(
        &self,
        scheme_id: &str,
        update: SchemeUpdate,
    ) -> Result<Option<FilterScheme>, StorageError> {
        let name = ensure_scheme_name(&update.name)?;
        let _guard = self.write_lock.lock().await;
        let mut schemes = self.load_for_update().await?;
        let Some(scheme) = schemes.iter_mut().find(|scheme| scheme.id == scheme_id) else {
            return Ok(None);
        };
        scheme.name = name;
        scheme.description = normalize_description(update.description);
        scheme.updated_at = next_updated_at(scheme.updated_at);
        let updated = scheme.clone();
        self.save(&schemes).await?;
        tracing::info!(scheme_id, name = %updated.name, "scheme updated");
        crm_telemetry::record_scheme_updated();
        Ok(Some(updated))
    }

    async fn delete_scheme(&self, scheme_id: &str) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut schemes = self.load_for_update().await?;
        let before = schemes.len();
        schemes.retain(|scheme| scheme.id != scheme_id);
        if schemes.len() == before {
            return Ok(false);
        }
        self.save(&schemes).await?;
        tracing::info!(scheme_id, "scheme deleted");
        crm_telemetry::record_scheme_deleted();
        Ok(true)
    }
}
