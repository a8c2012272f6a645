//! 方案存储的输入模型
//!
//! - SchemeCreate：保存新方案
//! - SchemeUpdate：编辑方案名称与描述

use domain::FilterCondition;

/// 新方案输入。
#[derive(Debug, Clone)]
pub struct SchemeCreate {
    pub name: String,
    pub description: Option<String>,
    pub conditions: FilterCondition,
}

/// 方案编辑输入（名称必填，描述整体替换）。
#[derive(Debug, Clone)]
pub struct SchemeUpdate {
    pub name: String,
    pub description: Option<String>,
}
