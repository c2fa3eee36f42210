use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::kv::{parse_counter, KeyValueStore, StorageError};

/// Non-durable store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<u64, StorageError> {
        // Holding the write guard across read and write keeps this atomic
        let mut entries = self.entries.write().await;
        let next = parse_counter(key, entries.get(key).map(String::as_str)) + 1;
        entries.insert(key.to_string(), next.to_string());
        Ok(next)
    }
}
