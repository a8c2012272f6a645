//! 键值内存存储实现
//!
//! 仅用于测试和演示，进程退出即丢失。

use crate::error::StorageError;
use crate::traits::KeyValueBackend;
use std::collections::HashMap;
use std::sync::RwLock;

/// 键值内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
#[derive(Default)]
pub struct InMemoryKeyValue {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置原始内容（用于模拟已有或损坏的数据）。
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait::async_trait]
impl KeyValueBackend for InMemoryKeyValue {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .entries
            .read()
            .map_err(|_| StorageError::backend("lock failed"))?
            .get(key)
            .cloned();
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| StorageError::backend("lock failed"))?;
        map.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| StorageError::backend("lock failed"))?;
        map.remove(key);
        Ok(())
    }
}
