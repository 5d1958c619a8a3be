//! Storage for created events.
//!
//! The server only ever needs the most recently created record, so the
//! default backend is a single in-memory slot. It sits behind [`EventStore`]
//! so handlers receive it explicitly instead of reaching for a global.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredEvent {
    /// Starts at 1 and grows with every write, including after `clear`.
    pub revision: u64,
    pub stored_at: DateTime<Utc>,
    /// The request body exactly as it was received.
    pub body: Value,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Replaces whatever is stored with `body`.
    async fn put(&self, body: Value) -> Result<StoredEvent>;
    async fn latest(&self) -> Result<Option<StoredEvent>>;
    async fn clear(&self) -> Result<()>;
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Slot {
    last_revision: u64,
    current: Option<StoredEvent>,
}

/// Single-slot, last-write-wins store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    slot: Arc<RwLock<Slot>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn put(&self, body: Value) -> Result<StoredEvent> {
        let mut slot = self.slot.write().await;
        slot.last_revision += 1;
        let stored = StoredEvent {
            revision: slot.last_revision,
            stored_at: Utc::now(),
            body,
        };
        slot.current = Some(stored.clone());
        Ok(stored)
    }

    async fn latest(&self) -> Result<Option<StoredEvent>> {
        Ok(self.slot.read().await.current.clone())
    }

    async fn clear(&self) -> Result<()> {
        self.slot.write().await.current = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
