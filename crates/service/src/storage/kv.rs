use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;

/// Named-record storage, one JSON value per key.
/// Implementations can be file-backed, in-memory, or remote.
#[async_trait]
pub trait KvStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<Value>, ServiceError>;
    async fn set_item(&self, key: &str, value: Value) -> Result<(), ServiceError>;
    /// Returns whether the key existed.
    async fn remove_item(&self, key: &str) -> Result<bool, ServiceError>;
    async fn clear(&self) -> Result<(), ServiceError>;
}
