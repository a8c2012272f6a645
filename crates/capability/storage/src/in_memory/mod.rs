//! 内存存储实现模块
//!
//! 仅用于测试和演示。
//!
//! 包含以下实现：
//! - KeyValueBackend: InMemoryKeyValue
//! - CustomerSource: InMemoryCustomerSource

pub mod customer;
pub mod kv;

pub use customer::*;
pub use kv::*;
