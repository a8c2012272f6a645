//! # CRM Storage 模块
//!
//! 筛选方案与客户记录的存储抽象层，支持多种后端实现。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：`KeyValueBackend`、`SchemeStore`、`CustomerSource`
//! 2. **数据模型层** (`models.rs`)：方案创建/编辑输入
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **验证辅助层** (`validation.rs`)：方案名称与存储键校验
//! 5. **方案存储** (`scheme.rs`)：基于任意键值后端的 `KvSchemeStore`
//! 6. **后端实现**：
//!    - `in_memory/`：内存键值与演示客户（用于测试和演示）
//!    - `file.rs`：本地数据目录（对应浏览器本地存储）
//!    - `redis.rs`：服务端存储
//!
//! ## 持久化格式
//!
//! 方案集合以 JSON 数组整体保存在单个键（默认 `filterSchemes`）下，
//! 每个方案带 `version` 字段以便后续迁移。无法解析的条目被跳过并记录告警，
//! 下一次修改前原文备份到 `<key>.corrupt`；集合删空后移除该键。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use crm_storage::{FileKeyValue, KvSchemeStore, SchemeCreate, SchemeStore};
//! use domain::FilterCondition;
//! use std::sync::Arc;
//!
//! let store = KvSchemeStore::new(Arc::new(FileKeyValue::new("./data")));
//! let scheme = store
//!     .create_scheme(SchemeCreate {
//!         name: "北京高价值客户".to_string(),
//!         description: None,
//!         conditions: FilterCondition::default(),
//!     })
//!     .await?;
//! let conditions = store.apply_scheme(&scheme.id).await?;
//! ```

pub mod error;
pub mod file;
pub mod in_memory;
pub mod models;
pub mod redis;
pub mod scheme;
pub mod traits;
pub mod validation;

pub use error::*;
pub use file::{FileKeyValue, JsonFileCustomerSource};
pub use in_memory::{InMemoryCustomerSource, InMemoryKeyValue};
pub use models::*;
pub use crate::redis::RedisKeyValue;
pub use scheme::{CORRUPT_BACKUP_SUFFIX, DEFAULT_SCHEME_KEY, KvSchemeStore};
pub use traits::*;
pub use validation::*;
