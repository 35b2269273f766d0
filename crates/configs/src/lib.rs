use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Where the client-local records live.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_cart_file")]
    pub cart_file: String,
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), cart_file: default_cart_file(), cart_key: default_cart_key() }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: String::new(), timeout_secs: default_timeout_secs() }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CheckoutConfig {
    #[serde(default = "default_free_shipping_over")]
    pub free_shipping_over: f64,
    #[serde(default = "default_flat_shipping_fee")]
    pub flat_shipping_fee: f64,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self { free_shipping_over: default_free_shipping_over(), flat_shipping_fee: default_flat_shipping_fee() }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CatalogConfig {
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self { Self { per_page: default_per_page() } }
}

fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_cart_file() -> String { "local_storage.json".into() }
fn default_cart_key() -> String { "cart-storage".into() }
fn default_timeout_secs() -> u64 { 15 }
fn default_free_shipping_over() -> f64 { 5000.0 }
fn default_flat_shipping_fee() -> f64 { 350.0 }
fn default_per_page() -> u32 { 6 }

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load from `CONFIG_PATH` (or `config.toml`), falling back to defaults
    /// when the file does not exist, then normalize.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => {
                debug!("no config file found; using defaults");
                AppConfig::default()
            }
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.storage.normalize();
        self.api.normalize_from_env();
        self.api.validate()?;
        self.checkout.validate()?;
        if self.catalog.per_page == 0 {
            self.catalog.per_page = default_per_page();
        }
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl StorageConfig {
    fn normalize(&mut self) {
        if self.cart_file.trim().is_empty() {
            self.cart_file = default_cart_file();
        }
        if self.cart_key.trim().is_empty() {
            self.cart_key = default_cart_key();
        }
    }

    /// Full path of the JSON file holding the local records.
    pub fn cart_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.cart_file)
    }
}

impl ApiConfig {
    /// Fill the base URL from `API_URL` when the TOML leaves it empty.
    pub fn normalize_from_env(&mut self) {
        if self.base_url.trim().is_empty() {
            self.base_url = std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        }
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
    }

    pub fn validate(&self) -> Result<()> {
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("api.base_url must start with http:// or https://"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("api.timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

impl CheckoutConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.free_shipping_over.is_finite() && self.free_shipping_over >= 0.0) {
            return Err(anyhow!("checkout.free_shipping_over must be >= 0"));
        }
        if !(self.flat_shipping_fee.is_finite() && self.flat_shipping_fee >= 0.0) {
            return Err(anyhow!("checkout.flat_shipping_fee must be >= 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() -> Result<()> {
        let cfg: AppConfig = toml::from_str("")?;
        assert_eq!(cfg.storage.cart_key, "cart-storage");
        assert_eq!(cfg.storage.cart_path(), PathBuf::from("data").join("local_storage.json"));
        assert_eq!(cfg.checkout.free_shipping_over, 5000.0);
        assert_eq!(cfg.checkout.flat_shipping_fee, 350.0);
        assert_eq!(cfg.catalog.per_page, 6);
        assert_eq!(cfg.api.timeout_secs, 15);
        Ok(())
    }

    #[test]
    fn partial_sections_keep_field_defaults() -> Result<()> {
        let cfg: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://api.example.com/"

            [checkout]
            flat_shipping_fee = 200.0
            "#,
        )?;
        let mut cfg = cfg;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.api.base_url, "https://api.example.com");
        assert_eq!(cfg.checkout.flat_shipping_fee, 200.0);
        assert_eq!(cfg.checkout.free_shipping_over, 5000.0);
        Ok(())
    }

    #[test]
    fn rejects_non_http_base_url() {
        let api = ApiConfig { base_url: "ftp://files".into(), timeout_secs: 5 };
        assert!(api.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let api = ApiConfig { base_url: "http://localhost".into(), timeout_secs: 0 };
        assert!(api.validate().is_err());
    }

    #[test]
    fn rejects_negative_shipping_fee() {
        let c = CheckoutConfig { free_shipping_over: 5000.0, flat_shipping_fee: -1.0 };
        assert!(c.validate().is_err());
    }

    #[test]
    fn load_from_file_reads_toml() -> Result<()> {
        let path = std::env::temp_dir().join(format!("storefront_cfg_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[storage]\ndata_dir = \"/tmp/cart\"\ncart_key = \"\"\n")?;
        let mut cfg = load_from_file(path.to_str().ok_or_else(|| anyhow!("non-utf8 path"))?)?;
        cfg.storage.normalize();
        assert_eq!(cfg.storage.data_dir, PathBuf::from("/tmp/cart"));
        assert_eq!(cfg.storage.cart_key, "cart-storage");
        let _ = std::fs::remove_file(&path);
        Ok(())
    }
}
