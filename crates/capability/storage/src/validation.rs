//! 验证辅助函数
//!
//! - ensure_scheme_name：方案名称去除首尾空白后不能为空
//! - normalize_description：空描述按未填写处理
//! - ensure_storage_key：存储键只允许安全字符（文件后端直接用作文件名）

use crate::error::StorageError;

/// 返回去除首尾空白后的方案名称。
pub fn ensure_scheme_name(name: &str) -> Result<String, StorageError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StorageError::validation("scheme name required"));
    }
    Ok(trimmed.to_string())
}

pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// 存储键：非空，仅包含字母、数字、`-`、`_`、`.`，且不以 `.` 开头。
pub fn ensure_storage_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'));
    if !valid {
        return Err(StorageError::validation(format!("invalid storage key: {key}")));
    }
    Ok(())
}
