//! Integration tests for the event store
//!
//! Tests can be filtered by database backend using the DATABASE_BACKEND
//! environment variable:
//! - `DATABASE_BACKEND=sqlite cargo test` - Run only SQLite tests
//! - `DATABASE_BACKEND=postgres cargo test` - Run only PostgreSQL tests
//!   (requires DATABASE_URL pointing at a test database)
//! - By default, both backends are tested

use mailtrack::models::EventType;
use mailtrack::storage::{PostgresStorage, SqliteStorage, Storage};
use std::sync::Arc;

/// Get the database backend to test from environment variable
fn should_test_backend(backend: &str) -> bool {
    match std::env::var("DATABASE_BACKEND") {
        Ok(val) => val.to_lowercase() == backend.to_lowercase(),
        Err(_) => true, // Test all backends if not specified
    }
}

/// Helper to create SQLite test storage
async fn create_sqlite_storage() -> Arc<dyn Storage> {
    let storage = SqliteStorage::new("sqlite::memory:", 5).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

/// Helper to create PostgreSQL test storage
async fn create_postgres_storage() -> Option<Arc<dyn Storage>> {
    let db_url = std::env::var("DATABASE_URL").ok()?;
    let storage = PostgresStorage::new(&db_url, 5).await.ok()?;
    storage.init().await.ok()?;
    Some(Arc::new(storage))
}

#[tokio::test]
async fn test_insert_returns_populated_event_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let storage = create_sqlite_storage().await;

    let before = chrono::Utc::now();
    let event = storage
        .insert("a@b.com", "1.2.3.4", EventType::Open)
        .await
        .unwrap();
    let after = chrono::Utc::now();

    assert_eq!(event.email, "a@b.com");
    assert_eq!(event.ip, "1.2.3.4");
    assert_eq!(event.event_type, "open");
    assert!(event.id > 0, "store must assign a positive id");
    assert!(
        event.timestamp >= before && event.timestamp <= after,
        "timestamp should be the moment of insertion"
    );
}

#[tokio::test]
async fn test_repeated_inserts_get_distinct_increasing_ids_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    // The same email tracked N times must produce N rows, not one
    let storage = create_sqlite_storage().await;

    let mut last_id = 0;
    for _ in 0..5 {
        let event = storage
            .insert("repeat@example.com", "10.0.0.1", EventType::Open)
            .await
            .unwrap();
        assert!(event.id > last_id, "ids must be strictly increasing");
        last_id = event.id;
    }

    let events = storage.list_all().await.unwrap();
    assert_eq!(events.len(), 5);
}

#[tokio::test]
async fn test_empty_email_is_accepted_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let storage = create_sqlite_storage().await;

    let event = storage.insert("", "1.2.3.4", EventType::Click).await.unwrap();
    assert_eq!(event.email, "");
    assert_eq!(event.event_type, "click");
}

#[tokio::test]
async fn test_list_all_returns_every_event_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let storage = create_sqlite_storage().await;

    storage
        .insert("one@example.com", "1.1.1.1", EventType::Open)
        .await
        .unwrap();
    storage
        .insert("two@example.com", "2.2.2.2", EventType::Click)
        .await
        .unwrap();
    storage
        .insert("one@example.com", "1.1.1.1", EventType::Click)
        .await
        .unwrap();

    let events = storage.list_all().await.unwrap();
    assert_eq!(events.len(), 3, "no omissions");

    let mut ids: Vec<i64> = events.iter().map(|e| e.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 3, "no duplicates");

    let types: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types, vec!["open", "click", "click"]);
}

#[tokio::test]
async fn test_init_is_idempotent_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let storage = SqliteStorage::new("sqlite::memory:", 5).await.unwrap();
    storage.init().await.unwrap();
    storage.init().await.unwrap();

    let event = storage
        .insert("again@example.com", "3.3.3.3", EventType::Open)
        .await
        .unwrap();
    assert_eq!(event.id, 1);
}

#[tokio::test]
async fn test_concurrent_inserts_all_recorded_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    // Requests are independent; the pool serializes nothing above the engine
    let storage = create_sqlite_storage().await;

    let mut handles = vec![];
    for i in 0..10 {
        let storage_clone = Arc::clone(&storage);
        handles.push(tokio::spawn(async move {
            storage_clone
                .insert(&format!("user{}@example.com", i), "127.0.0.1", EventType::Open)
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let events = storage.list_all().await.unwrap();
    assert_eq!(events.len(), 10);

    let mut ids: Vec<i64> = events.iter().map(|e| e.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10, "ids are never reused");
}

#[tokio::test]
async fn test_insert_and_list_postgres() {
    if !should_test_backend("postgres") {
        return;
    }

    let Some(storage) = create_postgres_storage().await else {
        return; // No test database available
    };

    let event = storage
        .insert("pg@example.com", "4.4.4.4", EventType::Open)
        .await
        .unwrap();
    assert_eq!(event.event_type, "open");

    let events = storage.list_all().await.unwrap();
    assert!(events.iter().any(|e| e.id == event.id));
}
