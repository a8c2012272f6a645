//! # CRM Filter 模块
//!
//! 流量池、高级筛选等列表页共用的条件筛选逻辑：
//!
//! - [`evaluator`]：判断单条记录是否满足条件集合，以及批量筛选
//! - [`active`]：统计生效条件数量（驱动角标与“保存方案”按钮）
//! - [`sort`]：列表排序
//! - [`summary`]：命中数量与占比
//!
//! 字段之间为 AND 关系；`tags`、`regions` 内部为 OR 关系（任一命中）。
//! 筛选逻辑不依赖任何存储实现，只通过 [`domain::Filterable`] 读取记录。

pub mod active;
pub mod evaluator;
pub mod sort;
pub mod summary;

pub use active::{active_condition_count, can_save_scheme};
pub use evaluator::{filter_records, matches};
pub use sort::{SortField, SortOrder, sort_records};
pub use summary::{SegmentSummary, summarize};
