//! 存储层错误类型
//!
//! 统一封装存储相关错误：
//! - 输入校验失败（方案名称为空等）
//! - 底层后端错误（文件 I/O、Redis）
//! - 序列化错误
//!
//! 查找不到目标（apply/update/delete 未知 ID）不是错误，以 `None` / `false` 返回。

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        Self::Backend(err.to_string())
    }
}
