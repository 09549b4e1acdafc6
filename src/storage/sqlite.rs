use crate::models::{Event, EventType};
use crate::storage::{Storage, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn init(&self) -> Result<()> {
        // Table name kept as `clicks` for compatibility with existing deployments
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clicks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL,
                ip TEXT NOT NULL,
                event_type TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_clicks_email ON clicks(email)")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn insert(&self, email: &str, ip: &str, event_type: EventType) -> StorageResult<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO clicks (email, ip, event_type, timestamp)
            VALUES (?, ?, ?, ?)
            RETURNING id, email, ip, event_type, timestamp
            "#,
        )
        .bind(email)
        .bind(ip)
        .bind(event_type.as_str())
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(event)
    }

    async fn list_all(&self) -> StorageResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, email, ip, event_type, timestamp
            FROM clicks
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(events)
    }
}
