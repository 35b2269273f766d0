use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::kv::KvStorage;
use crate::errors::ServiceError;

/// In-memory storage for tests and ephemeral sessions. Counts writes so tests
/// can observe persistence traffic.
#[derive(Default)]
pub struct MemoryKvStorage {
    items: Mutex<HashMap<String, Value>>,
    writes: Mutex<u64>,
}

impl MemoryKvStorage {
    pub fn new() -> Self { Self::default() }

    pub fn with_item(key: &str, value: Value) -> Self {
        let s = Self::default();
        s.lock_items().insert(key.to_string(), value);
        s
    }

    pub fn write_count(&self) -> u64 {
        *self.writes.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn lock_items(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.items.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn bump_writes(&self) {
        *self.writes.lock().unwrap_or_else(|p| p.into_inner()) += 1;
    }
}

#[async_trait]
impl KvStorage for MemoryKvStorage {
    async fn get_item(&self, key: &str) -> Result<Option<Value>, ServiceError> {
        Ok(self.lock_items().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: Value) -> Result<(), ServiceError> {
        self.lock_items().insert(key.to_string(), value);
        self.bump_writes();
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<bool, ServiceError> {
        let existed = self.lock_items().remove(key).is_some();
        self.bump_writes();
        Ok(existed)
    }

    async fn clear(&self) -> Result<(), ServiceError> {
        self.lock_items().clear();
        self.bump_writes();
        Ok(())
    }
}
