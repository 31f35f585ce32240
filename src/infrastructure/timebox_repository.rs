use crate::domain::models::TimeBox;
use crate::infrastructure::error::JournalError;
use crate::infrastructure::storage::KeyValueStore;
use std::sync::Arc;

/// Storage key the whole record set is serialized under. Matches the key
/// used by earlier versions of the app.
pub const TIMEBOXES_KEY: &str = "timeboxes";

/// Persists the full time box set as a JSON array under one fixed key.
/// Single-writer semantics only: two overlapping writes race last-write-wins
/// on the underlying blob.
#[derive(Debug, Clone)]
pub struct TimeBoxRepository<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> TimeBoxRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Reads the persisted set. An absent key is an empty set; a read or
    /// deserialization failure is surfaced so the caller can decide whether
    /// to swallow it.
    pub async fn get_all(&self) -> Result<Vec<TimeBox>, JournalError> {
        let Some(raw) = self.store.read(TIMEBOXES_KEY).await? else {
            return Ok(Vec::new());
        };
        let boxes = serde_json::from_str(&raw)?;
        Ok(boxes)
    }

    pub async fn put_all(&self, boxes: &[TimeBox]) -> Result<(), JournalError> {
        let raw = serde_json::to_string(boxes)?;
        self.store.write(TIMEBOXES_KEY, &raw).await
    }
}
