//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so the binary can prepare the data
//! directory without depending on `common` for it.

use configs::StorageConfig;

/// Make sure the configured data directory exists before the cart file is opened.
pub async fn ensure_storage(cfg: &StorageConfig) -> anyhow::Result<()> {
    common::env::ensure_data_dir(&cfg.data_dir).await
}
