/// In-memory store tests
///
/// Run with: cargo test --test in_memory_store_tests
use std::sync::Arc;
use unitofwork::store::memory::STRING_TOO_LONG;
use unitofwork::{
    CommitExecutor, DataApi, DataApiConfig, FieldValue, InMemoryDataStore, ObjectSchema, Record,
    UnitOfWorkBuilder,
};

fn account(name: &str) -> Record {
    Record::builder("Account")
        .with_field("Name", name)
        .unwrap()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_rejected_batch_leaves_earlier_commits_intact() {
    let store = Arc::new(InMemoryDataStore::default());
    let api = DataApi::new(store.clone(), DataApiConfig::default());

    let mut first = api.new_unit_of_work_builder();
    first.register_create(account("Acme")).unwrap();
    api.commit_unit_of_work(first.build().unwrap()).await.unwrap();

    let mut second = api.new_unit_of_work_builder();
    second.register_create(account("Globex")).unwrap();
    second.register_create(account(&"x".repeat(256))).unwrap();
    let err = api.commit_unit_of_work(second.build().unwrap()).await.unwrap_err();

    assert_eq!(err.api_errors()[0].error_code(), STRING_TOO_LONG);
    assert_eq!(store.count("Account").await, 1);
}

#[tokio::test]
async fn test_all_violations_reported_in_order() {
    let store = InMemoryDataStore::default();
    let mut uow = UnitOfWorkBuilder::new();
    uow.register_create(account(&"a".repeat(300))).unwrap();
    let contact = Record::builder("Contact")
        .with_field("FirstName", "b".repeat(41))
        .unwrap()
        .with_field("LastName", "c".repeat(81))
        .unwrap()
        .build()
        .unwrap();
    uow.register_create(contact).unwrap();

    let err = store.commit(uow.build().unwrap()).await.unwrap_err();
    let fields: Vec<&str> = err
        .api_errors()
        .iter()
        .map(|e| e.fields()[0].as_str())
        .collect();
    assert_eq!(fields, vec!["Name", "FirstName", "LastName"]);
}

#[tokio::test]
async fn test_reference_within_same_entity_type() {
    let store = InMemoryDataStore::default();
    let mut uow = UnitOfWorkBuilder::new();
    let parent = uow.register_create(account("Parent")).unwrap();
    let child = Record::builder("Account")
        .with_field("Name", "Child")
        .unwrap()
        .with_field("ParentId", &parent)
        .unwrap()
        .build()
        .unwrap();
    let child_ref = uow.register_create(child).unwrap();

    let result = store.commit(uow.build().unwrap()).await.unwrap();
    let parent_id = result.resolve(&parent).unwrap();
    let stored_child = store.get(result.resolve(&child_ref).unwrap()).await.unwrap();
    assert_eq!(stored_child.string_field("ParentId"), Some(parent_id.as_str()));
}

#[tokio::test]
async fn test_ids_are_unique_across_commits() {
    let store = Arc::new(InMemoryDataStore::default());
    let api = DataApi::new(store.clone(), DataApiConfig::default());

    let a = api.create(account("a")).await.unwrap();
    let b = api.create(account("b")).await.unwrap();

    assert_ne!(a.id(), b.id());
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn test_non_string_values_are_stored_as_is() {
    let store = Arc::new(
        InMemoryDataStore::default().with_schema(ObjectSchema::new("Meter__c", "a02").unwrap()),
    );
    let api = DataApi::new(store.clone(), DataApiConfig::default());

    let meter = Record::builder("Meter__c")
        .with_field("Reading__c", 42.5)
        .unwrap()
        .with_field("Active__c", false)
        .unwrap()
        .build()
        .unwrap();
    let created = api.create(meter).await.unwrap();

    let stored = store.get(created.id()).await.unwrap();
    assert!(created.id().as_str().starts_with("a02"));
    assert_eq!(stored.get("Reading__c"), Some(&FieldValue::Number(42.5)));
    assert_eq!(stored.get("Active__c"), Some(&FieldValue::Boolean(false)));
}

#[tokio::test]
async fn test_custom_schema_ids_are_eighteen_chars() {
    let store = Arc::new(
        InMemoryDataStore::default().with_schema(ObjectSchema::new("Meter__c", "a02").unwrap()),
    );
    let api = DataApi::new(store, DataApiConfig::default());

    let meter = Record::builder("Meter__c")
        .with_field("Serial__c", "M-1")
        .unwrap()
        .build()
        .unwrap();
    let created = api.create(meter).await.unwrap();
    assert_eq!(created.id().as_str().len(), 18);

    assert!(ObjectSchema::new("Meter__c", "a0").is_err());
    assert!(ObjectSchema::new("Meter__c", "a002").is_err());
}

#[tokio::test]
async fn test_large_integer_stored_exactly() {
    let store = Arc::new(InMemoryDataStore::default());
    let api = DataApi::new(store.clone(), DataApiConfig::default());

    let big = 9_007_199_254_740_993i64;
    let account = Record::builder("Account")
        .with_field("Name", "Acme")
        .unwrap()
        .with_field("Big__c", big)
        .unwrap()
        .build()
        .unwrap();
    let created = api.create(account).await.unwrap();

    let stored = store.get(created.id()).await.unwrap();
    assert_eq!(stored.get("Big__c"), Some(&FieldValue::Integer(big)));
}
