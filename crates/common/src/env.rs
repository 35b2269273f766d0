//! Environment/runtime helpers
//!
//! Sanity checks to ensure the local data directory exists at startup.

use std::path::Path;

use tracing::debug;

/// Ensure the data directory exists, creating it (and parents) when missing.
pub async fn ensure_data_dir(data_dir: impl AsRef<Path>) -> anyhow::Result<()> {
    let data_dir = data_dir.as_ref();
    if tokio::fs::metadata(data_dir).await.is_ok() {
        return Ok(());
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    debug!(data_dir = %data_dir.display(), "created data directory");
    Ok(())
}
