use chrono::NaiveDate;
use crm_storage::{
    InMemoryKeyValue, KeyValueBackend, KvSchemeStore, SchemeCreate, SchemeStore, SchemeUpdate,
};
use domain::{FilterCondition, FilterScheme};
use std::sync::Arc;

fn beijing_high_value() -> FilterCondition {
    FilterCondition {
        regions: vec!["北京".to_string()],
        rfm_min: Some(12.0),
        ..FilterCondition::default()
    }
}

fn create(name: &str, conditions: FilterCondition) -> SchemeCreate {
    SchemeCreate {
        name: name.to_string(),
        description: None,
        conditions,
    }
}

fn store_with_backend() -> (KvSchemeStore, Arc<InMemoryKeyValue>) {
    let backend = Arc::new(InMemoryKeyValue::new());
    (KvSchemeStore::new(backend.clone()), backend)
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let (store, _) = store_with_backend();
    assert!(store.list_schemes().await.expect("list").is_empty());
}

#[tokio::test]
async fn create_then_list_round_trips() {
    let (store, _) = store_with_backend();
    let conditions = FilterCondition {
        nickname: Some("张".to_string()),
        tags: vec!["VIP".to_string()],
        add_time_start: NaiveDate::from_ymd_opt(2024, 1, 1),
        ..FilterCondition::default()
    };
    store
        .create_scheme(create("X", conditions.clone()))
        .await
        .expect("create");

    let schemes = store.list_schemes().await.expect("list");
    assert_eq!(schemes.len(), 1);
    assert_eq!(schemes[0].name, "X");
    assert_eq!(schemes[0].conditions, conditions);
    assert_eq!(schemes[0].usage_count, 0);
    assert_eq!(schemes[0].created_at, schemes[0].updated_at);
    assert!(schemes[0].id.starts_with("scheme_"));
}

#[tokio::test]
async fn save_beijing_scheme_then_apply() {
    let (store, _) = store_with_backend();
    let created = store
        .create_scheme(create("北京高价值客户", beijing_high_value()))
        .await
        .expect("create");

    let schemes = store.list_schemes().await.expect("list");
    assert_eq!(schemes.len(), 1);
    assert_eq!(schemes[0].usage_count, 0);

    let applied = store
        .apply_scheme(&created.id)
        .await
        .expect("apply")
        .expect("found");
    assert_eq!(applied, beijing_high_value());

    let stored = store
        .find_scheme(&created.id)
        .await
        .expect("find")
        .expect("scheme");
    assert_eq!(stored.usage_count, 1);
}

#[tokio::test]
async fn apply_twice_counts_twice() {
    let (store, _) = store_with_backend();
    let created = store
        .create_scheme(create("X", beijing_high_value()))
        .await
        .expect("create");

    store.apply_scheme(&created.id).await.expect("apply");
    let first = store
        .find_scheme(&created.id)
        .await
        .expect("find")
        .expect("scheme");
    store.apply_scheme(&created.id).await.expect("apply");
    let second = store
        .find_scheme(&created.id)
        .await
        .expect("find")
        .expect("scheme");

    assert_eq!(second.usage_count, 2);
    assert!(first.updated_at > created.updated_at);
    assert!(second.updated_at > first.updated_at);
    assert_eq!(second.created_at, created.created_at);
}

#[tokio::test]
async fn empty_name_is_rejected_without_writing() {
    let (store, backend) = store_with_backend();
    let err = store
        .create_scheme(create("", beijing_high_value()))
        .await
        .expect_err("rejected");
    assert!(err.is_validation());

    let err = store
        .create_scheme(create("   ", beijing_high_value()))
        .await
        .expect_err("rejected");
    assert!(err.is_validation());

    assert!(store.list_schemes().await.expect("list").is_empty());
    assert!(backend.get("filterSchemes").await.expect("get").is_none());
}

#[tokio::test]
async fn name_and_description_are_trimmed() {
    let (store, _) = store_with_backend();
    let scheme = store
        .create_scheme(SchemeCreate {
            name: "  高价值  ".to_string(),
            description: Some("   ".to_string()),
            conditions: beijing_high_value(),
        })
        .await
        .expect("create");
    assert_eq!(scheme.name, "高价值");
    assert!(scheme.description.is_none());
}

#[tokio::test]
async fn unknown_id_is_a_no_op() {
    let (store, backend) = store_with_backend();
    assert!(store.apply_scheme("scheme_0").await.expect("apply").is_none());
    assert!(
        store
            .update_scheme(
                "scheme_0",
                SchemeUpdate {
                    name: "x".to_string(),
                    description: None,
                },
            )
            .await
            .expect("update")
            .is_none()
    );
    assert!(!store.delete_scheme("scheme_0").await.expect("delete"));
    assert!(backend.get("filterSchemes").await.expect("get").is_none());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (store, _) = store_with_backend();
    let keep = store
        .create_scheme(create("keep", beijing_high_value()))
        .await
        .expect("create");
    let gone = store
        .create_scheme(create("gone", beijing_high_value()))
        .await
        .expect("create");

    assert!(store.delete_scheme(&gone.id).await.expect("delete"));
    let once = store.list_schemes().await.expect("list");
    assert!(!store.delete_scheme(&gone.id).await.expect("delete"));
    let twice = store.list_schemes().await.expect("list");

    assert_eq!(once, twice);
    assert_eq!(twice.len(), 1);
    assert_eq!(twice[0].id, keep.id);
}

#[tokio::test]
async fn update_renames_and_refreshes_timestamp() {
    let (store, _) = store_with_backend();
    let created = store
        .create_scheme(create("旧名称", beijing_high_value()))
        .await
        .expect("create");

    let err = store
        .update_scheme(
            &created.id,
            SchemeUpdate {
                name: " ".to_string(),
                description: None,
            },
        )
        .await
        .expect_err("rejected");
    assert!(err.is_validation());

    let updated = store
        .update_scheme(
            &created.id,
            SchemeUpdate {
                name: "新名称".to_string(),
                description: Some("北京地区 RFM ≥ 12".to_string()),
            },
        )
        .await
        .expect("update")
        .expect("scheme");
    assert_eq!(updated.name, "新名称");
    assert_eq!(updated.description.as_deref(), Some("北京地区 RFM ≥ 12"));
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.usage_count, 0);
    assert_eq!(updated.conditions, beijing_high_value());
}

#[tokio::test]
async fn ids_are_unique_and_list_is_newest_first() {
    let (store, _) = store_with_backend();
    let first = store
        .create_scheme(create("first", FilterCondition::default()))
        .await
        .expect("create");
    let second = store
        .create_scheme(create("second", FilterCondition::default()))
        .await
        .expect("create");
    let third = store
        .create_scheme(create("third", FilterCondition::default()))
        .await
        .expect("create");
    assert_ne!(first.id, second.id);
    assert_ne!(second.id, third.id);
    assert_ne!(first.id, third.id);

    store.apply_scheme(&first.id).await.expect("apply");
    let schemes = store.list_schemes().await.expect("list");
    assert_eq!(schemes[0].id, first.id);
    for pair in schemes.windows(2) {
        assert!(pair[0].updated_at >= pair[1].updated_at);
    }
}

#[tokio::test]
async fn persisted_value_is_a_json_array_under_one_key() {
    let (store, backend) = store_with_backend();
    store
        .create_scheme(create("北京高价值客户", beijing_high_value()))
        .await
        .expect("create");

    let raw = backend
        .get("filterSchemes")
        .await
        .expect("get")
        .expect("stored");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
    let array = value.as_array().expect("array");
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["name"], "北京高价值客户");
    assert_eq!(array[0]["usageCount"], 0);
    assert_eq!(array[0]["version"], 1);
    assert_eq!(array[0]["conditions"]["regions"][0], "北京");
    assert_eq!(array[0]["conditions"]["rfmMin"], 12.0);
    assert!(array[0]["createdAt"].is_string());
}

#[tokio::test]
async fn corrupt_storage_reads_as_empty() {
    let backend = Arc::new(InMemoryKeyValue::with_entry("filterSchemes", "{not json"));
    let store = KvSchemeStore::new(backend.clone());
    assert!(store.list_schemes().await.expect("list").is_empty());

    let scheme = store
        .create_scheme(create("recovered", beijing_high_value()))
        .await
        .expect("create");
    let raw = backend
        .get("filterSchemes")
        .await
        .expect("get")
        .expect("stored");
    let stored: Vec<FilterScheme> = serde_json::from_str(&raw).expect("json");
    assert_eq!(stored, vec![scheme]);
    let backup = backend
        .get("filterSchemes.corrupt")
        .await
        .expect("get")
        .expect("backup");
    assert_eq!(backup, "{not json");
}

const READABLE_SCHEME: &str = r#"{"id":"scheme_1705305600000","name":"A","conditions":{"regions":["北京"]},"createdAt":"2024-01-15T08:00:00Z","updatedAt":"2024-01-15T08:00:00Z","usageCount":3,"version":1}"#;
const BAD_DATE_SCHEME: &str = r#"{"id":"scheme_1705305600001","name":"B","conditions":{"addTimeStart":"2024/01/01"},"createdAt":"2024-01-15T08:00:00Z","updatedAt":"2024-01-15T08:00:00Z","usageCount":1,"version":1}"#;

#[tokio::test]
async fn partly_corrupt_collection_keeps_readable_schemes() {
    let raw = format!("[{READABLE_SCHEME},{BAD_DATE_SCHEME}]");
    let backend = Arc::new(InMemoryKeyValue::with_entry("filterSchemes", raw.clone()));
    let store = KvSchemeStore::new(backend.clone());

    let listed = store.list_schemes().await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "A");
    assert!(backend.get("filterSchemes.corrupt").await.expect("get").is_none());

    store
        .create_scheme(create("new", beijing_high_value()))
        .await
        .expect("create");

    let schemes = store.list_schemes().await.expect("list");
    let kept = schemes
        .iter()
        .find(|scheme| scheme.id == "scheme_1705305600000")
        .expect("A survives");
    assert_eq!(kept.usage_count, 3);
    assert_eq!(schemes.len(), 2);

    let backup = backend
        .get("filterSchemes.corrupt")
        .await
        .expect("get")
        .expect("backup");
    assert_eq!(backup, raw);
}

#[tokio::test]
async fn deleting_last_scheme_removes_the_key() {
    let (store, backend) = store_with_backend();
    let only = store
        .create_scheme(create("only", beijing_high_value()))
        .await
        .expect("create");
    assert!(backend.get("filterSchemes").await.expect("get").is_some());

    assert!(store.delete_scheme(&only.id).await.expect("delete"));
    assert!(backend.get("filterSchemes").await.expect("get").is_none());
    assert!(store.list_schemes().await.expect("list").is_empty());
}

#[tokio::test]
async fn deleted_id_is_not_reused() {
    let (store, _) = store_with_backend();
    let first = store
        .create_scheme(create("first", FilterCondition::default()))
        .await
        .expect("create");
    assert!(store.delete_scheme(&first.id).await.expect("delete"));
    let second = store
        .create_scheme(create("second", FilterCondition::default()))
        .await
        .expect("create");
    assert_ne!(first.id, second.id);
    assert!(second.id_millis() > first.id_millis());
}

#[tokio::test]
async fn new_id_follows_highest_stored_id() {
    let future = r#"[{"id":"scheme_9999999999999","name":"future","conditions":{},"createdAt":"2024-01-15T08:00:00Z","updatedAt":"2024-01-15T08:00:00Z"}]"#;
    let backend = Arc::new(InMemoryKeyValue::with_entry("filterSchemes", future));
    let store = KvSchemeStore::new(backend);

    let created = store
        .create_scheme(create("next", FilterCondition::default()))
        .await
        .expect("create");
    assert_eq!(created.id, "scheme_10000000000000");
}

#[tokio::test]
async fn custom_key_is_isolated() {
    let backend = Arc::new(InMemoryKeyValue::new());
    let devices = KvSchemeStore::with_key(backend.clone(), "deviceFilterSchemes");
    let customers = KvSchemeStore::new(backend.clone());
    devices
        .create_scheme(create("在线设备", FilterCondition::default()))
        .await
        .expect("create");

    assert_eq!(devices.key(), "deviceFilterSchemes");
    assert_eq!(devices.list_schemes().await.expect("list").len(), 1);
    assert!(customers.list_schemes().await.expect("list").is_empty());
}
