mod common;

use std::sync::Arc;

use chatrag::domain::models::ProviderKind;

use common::{insert_raw, setup_context, FakeFactory, LOCAL_DIMENSION};

const LEGACY: &str = "document_embeddings";

#[tokio::test]
async fn test_empty_legacy_collection_migrates_nothing() {
    let (_pool, ctx) = setup_context(Arc::new(FakeFactory::new("ok"))).await;

    let report = ctx.migration.migrate(ProviderKind::OpenAi).await.unwrap();
    assert_eq!(report.migrated_count, 0);
    assert_eq!(report.provider, ProviderKind::OpenAi);
    assert_eq!(ctx.repository.count(&ctx.config.store.collection).await.unwrap(), 0);
}

#[tokio::test]
async fn test_migration_reembeds_and_annotates() {
    let (pool, ctx) = setup_context(Arc::new(FakeFactory::new("ok"))).await;
    insert_raw(&pool, LEGACY, "a", Some("first legacy doc"), Some(r#"{"source":"https://a.se","tags":["old"]}"#)).await;
    insert_raw(&pool, LEGACY, "b", Some("second legacy doc"), None).await;
    insert_raw(&pool, LEGACY, "c", None, Some(r#"{"source":"broken"}"#)).await;
    insert_raw(&pool, LEGACY, "d", Some(""), None).await;

    let report = ctx.migration.migrate(ProviderKind::Ollama).await.unwrap();
    assert_eq!(report.migrated_count, 2);

    let store = ctx.store(Some(ProviderKind::Ollama)).await.unwrap();
    let records = store.scan_all().await.unwrap();
    assert_eq!(records.len(), 2);

    let first = records.iter().find(|r| r.content == "first legacy doc").unwrap();
    assert_eq!(first.dimension(), LOCAL_DIMENSION);
    assert_eq!(first.metadata["source"], "https://a.se");
    assert_eq!(first.metadata["tags"], serde_json::json!(["old"]));
    assert_eq!(first.metadata["migratedFrom"], LEGACY);
    assert_eq!(first.metadata["provider"], "ollama");
    assert!(first.metadata["migrationDate"].as_str().unwrap().ends_with('Z'));
    assert_ne!(first.id, "a");

    // Legacy rows stay where they were
    assert_eq!(ctx.repository.count(LEGACY).await.unwrap(), 4);
    assert_eq!(ctx.registry.current_provider().await, Some(ProviderKind::Ollama));
}

#[tokio::test]
async fn test_migration_report_serializes_camel_case() {
    let (pool, ctx) = setup_context(Arc::new(FakeFactory::new("ok"))).await;
    insert_raw(&pool, LEGACY, "a", Some("doc"), None).await;

    let report = ctx.migration.migrate(ProviderKind::OpenAi).await.unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json, serde_json::json!({ "migratedCount": 1, "provider": "openai" }));
}

#[tokio::test]
async fn test_migration_fails_when_provider_unavailable() {
    let factory = Arc::new(FakeFactory::new("ok"));
    let (pool, ctx) = setup_context(Arc::clone(&factory)).await;
    insert_raw(&pool, LEGACY, "a", Some("doc"), None).await;
    factory.break_embeddings();

    let err = ctx.migration.migrate(ProviderKind::OpenAi).await.unwrap_err();
    assert!(err.is_provider());
    assert_eq!(ctx.repository.count(&ctx.config.store.collection).await.unwrap(), 0);
}
