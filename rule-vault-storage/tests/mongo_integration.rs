//! MongoDB integration tests
//!
//! Run with: cargo test --test mongo_integration --features mongodb -- --ignored
//!
//! Prerequisites:
//! - MongoDB running (docker run -d -p 27017:27017 mongo)
//! - MONGO_URL pointing at it (defaults to mongodb://localhost:27017)

use rule_vault_core::{Model, Rule};
use rule_vault_storage::{
    Adapter, MongoAdapter, MongoConfig, RuleStore, StorageError, DEFAULT_DATABASE,
};

fn mongo_url() -> String {
    std::env::var("MONGO_URL").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

/// `MONGO_URL` with any database path (and options) removed
fn server_url() -> String {
    let url = mongo_url();
    let host_start = url.find("://").map_or(0, |i| i + 3);
    match url[host_start..].find(|c: char| c == '/' || c == '?') {
        Some(end) => url[..host_start + end].to_string(),
        None => url,
    }
}

/// Each test gets its own collection so runs do not interfere
fn test_config(name: &str) -> MongoConfig {
    MongoConfig {
        collection: format!("casbin_rule_test_{}", name),
        ..MongoConfig::from_url(mongo_url())
    }
}

fn rule(fields: &[&str]) -> Rule {
    fields.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn it_defaults_the_database_name() {
    let config = MongoConfig {
        collection: "casbin_rule_test_default_db".to_string(),
        ..MongoConfig::from_url(server_url())
    };
    let mut adapter = MongoAdapter::with_config(config)
        .await
        .expect("Failed to connect to MongoDB");

    assert_eq!(adapter.store().database(), DEFAULT_DATABASE);
    assert_eq!(adapter.store().collection_name(), "casbin_rule_test_default_db");
    adapter.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn it_creates_single_field_indexes() {
    let mut adapter = MongoAdapter::with_config(test_config("indexes"))
        .await
        .expect("Failed to connect to MongoDB");

    let names = adapter.store().index_names().await.unwrap();
    for field in ["ptype", "v0", "v1", "v2", "v3", "v4", "v5"] {
        let expected = format!("{}_1", field);
        assert!(names.contains(&expected), "missing index {}", expected);
    }

    adapter.drop_all().await.unwrap();
    adapter.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn it_round_trips_policy() {
    let mut adapter = MongoAdapter::with_config(test_config("round_trip"))
        .await
        .expect("Failed to connect to MongoDB");

    let mut model = Model::new();
    model.add_policy("p", "p", rule(&["alice", "data1", "read"]));
    model.add_policy("g", "g", rule(&["alice", "admin"]));
    adapter.save_policy(&model).await.unwrap();

    let mut loaded = Model::new();
    adapter.load_policy(&mut loaded).await.unwrap();
    assert_eq!(loaded.get_policy("p", "p"), &[rule(&["alice", "data1", "read"])]);
    assert_eq!(loaded.get_policy("g", "g"), &[rule(&["alice", "admin"])]);

    adapter.drop_all().await.unwrap();
    adapter.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn it_drops_a_missing_collection() {
    let mut adapter = MongoAdapter::with_config(test_config("missing"))
        .await
        .expect("Failed to connect to MongoDB");

    adapter.drop_all().await.unwrap();
    adapter.drop_all().await.unwrap();
    adapter.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn it_rejects_operations_after_close() {
    let mut adapter = MongoAdapter::with_config(test_config("closed"))
        .await
        .expect("Failed to connect to MongoDB");

    adapter.close().await.unwrap();
    adapter.close().await.unwrap();
    assert!(matches!(
        adapter.store().find_all().await,
        Err(StorageError::Closed)
    ));
}

#[tokio::test]
async fn it_rejects_a_malformed_url() {
    let result = MongoAdapter::connect("not-a-mongo-url").await;
    assert!(matches!(result, Err(StorageError::Config(_))));
}
