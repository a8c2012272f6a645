//! 流量池客户分群的核心领域模型。
//!
//! - [`condition`]：筛选条件集合（FilterCondition）
//! - [`record`]：可被筛选的记录抽象与客户记录
//! - [`scheme`]：已保存的筛选方案（FilterScheme）

pub mod condition;
pub mod record;
pub mod scheme;

pub use condition::{CATEGORY_ALL, FilterCondition};
pub use record::{CustomerCategory, CustomerRecord, Filterable, RfmScore, RfmTier};
pub use scheme::{FilterScheme, SCHEME_ID_PREFIX, SCHEME_VERSION};
