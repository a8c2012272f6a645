//! 应用运行配置加载。

use std::env;
use std::path::PathBuf;

/// 默认的方案存储键。
pub const DEFAULT_SCHEME_KEY: &str = "filterSchemes";

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 方案存储后端类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeBackend {
    /// 进程内存（退出即丢失）
    Memory,
    /// 本地数据目录下的 JSON 文件
    File,
    /// Redis 服务端存储
    Redis,
}

impl SchemeBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "file" => Some(Self::File),
            "redis" => Some(Self::Redis),
            _ => None,
        }
    }
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scheme_backend: SchemeBackend,
    pub data_dir: PathBuf,
    pub redis_url: String,
    pub scheme_key: String,
    pub records_path: Option<PathBuf>,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let scheme_backend = match read_optional("CRM_SCHEME_BACKEND") {
            Some(value) => SchemeBackend::parse(&value)
                .ok_or_else(|| ConfigError::Invalid("CRM_SCHEME_BACKEND".to_string(), value))?,
            None => SchemeBackend::File,
        };
        let data_dir = PathBuf::from(
            read_optional("CRM_DATA_DIR").unwrap_or_else(|| "./data".to_string()),
        );
        let redis_url = read_optional("CRM_REDIS_URL")
            .unwrap_or_else(|| "redis://127.0.0.1:6379".to_string());
        let scheme_key =
            read_optional("CRM_SCHEME_KEY").unwrap_or_else(|| DEFAULT_SCHEME_KEY.to_string());
        if scheme_key.trim().is_empty() {
            return Err(ConfigError::Invalid("CRM_SCHEME_KEY".to_string(), scheme_key));
        }
        let records_path = read_optional("CRM_RECORDS_PATH").map(PathBuf::from);

        Ok(Self {
            scheme_backend,
            data_dir,
            redis_url,
            scheme_key,
            records_path,
        })
    }
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
