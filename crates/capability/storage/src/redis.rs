//! Redis 键值存储实现
//!
//! 服务端存储，可替换本地文件后端；方案集合仍是单键下的整段 JSON。

use crate::error::StorageError;
use crate::traits::KeyValueBackend;
use redis::AsyncCommands;

/// Redis 键值存储
pub struct RedisKeyValue {
    client: redis::Client,
    prefix: String,
}

impl RedisKeyValue {
    pub fn new(client: redis::Client) -> Self {
        Self {
            client,
            prefix: String::new(),
        }
    }

    pub fn connect(redis_url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self::new(client))
    }

    /// 为所有键加统一前缀（如 `crm:`），便于与其他数据共用实例。
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait::async_trait]
impl KeyValueBackend for RedisKeyValue {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut connection = self.client.get_multiplexed_tokio_connection().await?;
        let data: Option<String> = connection.get(self.full_key(key)).await?;
        Ok(data)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut connection = self.client.get_multiplexed_tokio_connection().await?;
        connection
            .set::<_, _, ()>(self.full_key(key), value)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut connection = self.client.get_multiplexed_tokio_connection().await?;
        connection.del::<_, ()>(self.full_key(key)).await?;
        Ok(())
    }
}
