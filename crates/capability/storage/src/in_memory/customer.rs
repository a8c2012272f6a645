//! 客户记录内存来源
//!
//! 内置演示数据，替代列表页中硬编码的客户数组。

use crate::error::StorageError;
use crate::traits::CustomerSource;
use chrono::NaiveDate;
use domain::{CustomerCategory, CustomerRecord, RfmScore};

/// 客户记录内存来源
pub struct InMemoryCustomerSource {
    customers: Vec<CustomerRecord>,
}

impl InMemoryCustomerSource {
    pub fn new(customers: Vec<CustomerRecord>) -> Self {
        Self { customers }
    }

    /// 内置演示客户
    pub fn with_demo_customers() -> Self {
        Self::new(vec![
            demo_customer(
                "cust-1",
                "张三",
                "wxid_zhangsan",
                "13800138001",
                &["VIP", "活跃用户"],
                CustomerCategory::Customer,
                RfmScore {
                    recency: 4.5,
                    frequency: 4.5,
                    monetary: 4.5,
                    total: 13.5,
                },
                "北京",
                (2024, 1, 15),
            ),
            demo_customer(
                "cust-2",
                "李四",
                "wxid_lisi",
                "13900139002",
                &["普通"],
                CustomerCategory::Potential,
                RfmScore {
                    recency: 2.8,
                    frequency: 2.0,
                    monetary: 2.0,
                    total: 6.8,
                },
                "上海",
                (2024, 1, 22),
            ),
            demo_customer(
                "cust-3",
                "王五",
                "wxid_wangwu",
                "13700137003",
                &["VIP", "高消费"],
                CustomerCategory::Customer,
                RfmScore::from_components(4.0, 4.0, 5.0),
                "北京",
                (2024, 2, 3),
            ),
            demo_customer(
                "cust-4",
                "赵六",
                "wxid_zhaoliu",
                "13600136004",
                &["沉睡用户"],
                CustomerCategory::Lost,
                RfmScore::from_components(1.0, 1.0, 1.5),
                "广州",
                (2023, 11, 8),
            ),
        ])
    }
}

#[async_trait::async_trait]
impl CustomerSource for InMemoryCustomerSource {
    async fn list_customers(&self) -> Result<Vec<CustomerRecord>, StorageError> {
        Ok(self.customers.clone())
    }
}

#[allow(clippy::too_many_arguments)]
fn demo_customer(
    id: &str,
    nickname: &str,
    wechat_id: &str,
    phone: &str,
    tags: &[&str],
    category: CustomerCategory,
    rfm_score: RfmScore,
    region: &str,
    add_time: (i32, u32, u32),
) -> CustomerRecord {
    CustomerRecord {
        id: id.to_string(),
        nickname: nickname.to_string(),
        wechat_id: wechat_id.to_string(),
        phone: phone.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        category,
        rfm_score,
        region: region.to_string(),
        add_time: NaiveDate::from_ymd_opt(add_time.0, add_time.1, add_time.2).unwrap_or_default(),
    }
}
