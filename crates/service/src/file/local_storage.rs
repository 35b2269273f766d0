use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;
use crate::storage::kv::KvStorage;

/// File-backed local storage: every named record lives in one JSON file,
/// mapped `key -> value`.
#[derive(Clone)]
pub struct FileKvStorage {
    store: Arc<JsonMapStore<String, Value>>,
}

impl FileKvStorage {
    /// Initialize the storage from the given file path. Creates the file if missing.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, Value>::new(path).await?;
        Ok(Arc::new(Self { store }))
    }

    /// Names of all stored records.
    pub async fn keys(&self) -> Vec<String> {
        self.store.list().await.into_iter().map(|(k, _)| k).collect()
    }
}

#[async_trait]
impl KvStorage for FileKvStorage {
    async fn get_item(&self, key: &str) -> Result<Option<Value>, ServiceError> {
        Ok(self.store.get(&key.to_string()).await)
    }

    async fn set_item(&self, key: &str, value: Value) -> Result<(), ServiceError> {
        self.store.insert(key.to_string(), value).await
    }

    async fn remove_item(&self, key: &str) -> Result<bool, ServiceError> {
        self.store.remove(&key.to_string()).await
    }

    async fn clear(&self) -> Result<(), ServiceError> {
        self.store
            .update_map(|m| {
                m.clear();
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn records_survive_reopen() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("local_storage_{}.json", Uuid::new_v4()));
        let storage = FileKvStorage::new(&tmp).await?;

        storage.set_item("cart-storage", json!({"items": [], "totalItems": 0, "totalPrice": 0.0})).await?;
        storage.set_item("theme", json!("dark")).await?;
        assert!(storage.remove_item("theme").await?);

        let reopened = FileKvStorage::new(&tmp).await?;
        assert_eq!(reopened.keys().await, vec!["cart-storage".to_string()]);
        let rec = reopened.get_item("cart-storage").await?.ok_or_else(|| anyhow::anyhow!("missing record"))?;
        assert_eq!(rec["totalItems"], 0);

        reopened.clear().await?;
        let emptied = FileKvStorage::new(&tmp).await?;
        assert!(emptied.keys().await.is_empty());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
