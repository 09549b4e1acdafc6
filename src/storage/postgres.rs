use crate::models::{Event, EventType};
use crate::storage::{Storage, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn init(&self) -> Result<()> {
        // Table name kept as `clicks` for compatibility with existing deployments
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clicks (
                id BIGSERIAL PRIMARY KEY,
                email TEXT NOT NULL,
                ip TEXT NOT NULL,
                event_type TEXT NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL
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
            VALUES ($1, $2, $3, $4)
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
