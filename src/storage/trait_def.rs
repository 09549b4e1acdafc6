use crate::models::{Event, EventType};
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create the events table if absent).
    /// Idempotent; run once at process start.
    async fn init(&self) -> Result<()>;

    /// Append one event. The store assigns the id and the write is durable
    /// before this returns.
    async fn insert(&self, email: &str, ip: &str, event_type: EventType) -> StorageResult<Event>;

    /// Every stored event, unfiltered and unpaginated.
    async fn list_all(&self) -> StorageResult<Vec<Event>>;
}
