//! 存储接口 Trait 定义
//!
//! - KeyValueBackend：按键读写整段文本的持久化后端
//! - SchemeStore：筛选方案的增删改查与应用
//! - CustomerSource：客户记录来源
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 查找不到目标以 None / false 表示，不作为错误
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{SchemeCreate, SchemeUpdate};
use async_trait::async_trait;
use domain::{CustomerRecord, FilterCondition, FilterScheme};

/// 键值持久化后端。
///
/// 语义与浏览器本地存储一致：每个键对应一段 UTF-8 文本，整体读写。
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// 读取键对应的值，不存在时返回 None
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// 覆盖写入
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// 删除键，键不存在时不报错
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// 筛选方案存储接口。
#[async_trait]
pub trait SchemeStore: Send + Sync {
    /// 列出全部方案（按 updated_at 倒序）
    async fn list_schemes(&self) -> Result<Vec<FilterScheme>, StorageError>;

    /// 查找指定方案
    async fn find_scheme(&self, scheme_id: &str) -> Result<Option<FilterScheme>, StorageError>;

    /// 保存新方案，名称为空时返回校验错误
    async fn create_scheme(&self, create: SchemeCreate) -> Result<FilterScheme, StorageError>;

    /// 应用方案：使用次数 +1 并刷新 updated_at，返回保存的条件
    async fn apply_scheme(&self, scheme_id: &str)
    -> Result<Option<FilterCondition>, StorageError>;

    /// 编辑方案名称与描述
    async fn update_scheme(
        &self,
        scheme_id: &str,
        update: SchemeUpdate,
    ) -> Result<Option<FilterScheme>, StorageError>;

    /// 删除方案，返回是否实际删除
    async fn delete_scheme(&self, scheme_id: &str) -> Result<bool, StorageError>;
}

/// 客户记录来源（替代页面内的静态数组）。
#[async_trait]
pub trait CustomerSource: Send + Sync {
    async fn list_customers(&self) -> Result<Vec<CustomerRecord>, StorageError>;
}
