//! 本地文件存储实现
//!
//! - FileKeyValue：数据目录下每个键一个 `<key>.json` 文件
//! - JsonFileCustomerSource：从 JSON 数组文件读取客户记录

use crate::error::StorageError;
use crate::traits::{CustomerSource, KeyValueBackend};
use crate::validation::ensure_storage_key;
use domain::CustomerRecord;
use std::io::ErrorKind;
use std::path::PathBuf;

/// 本地文件键值存储
///
/// 写入先落到临时文件再重命名，避免进程中断留下半截内容。
pub struct FileKeyValue {
    dir: PathBuf,
}

impl FileKeyValue {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        ensure_storage_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait::async_trait]
impl KeyValueBackend for FileKeyValue {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp_path = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp_path, value).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        tracing::debug!(path = %path.display(), "key written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// JSON 文件客户来源
pub struct JsonFileCustomerSource {
    path: PathBuf,
}

impl JsonFileCustomerSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CustomerSource for JsonFileCustomerSource {
    async fn list_customers(&self) -> Result<Vec<CustomerRecord>, StorageError> {
        let data = tokio::fs::read_to_string(&self.path).await.map_err(|err| {
            StorageError::backend(format!("read {}: {err}", self.path.display()))
        })?;
        let customers: Vec<CustomerRecord> = serde_json::from_str(&data)?;
        tracing::debug!(path = %self.path.display(), count = customers.len(), "customers loaded");
        Ok(customers)
    }
}
