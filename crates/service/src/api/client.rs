use async_trait::async_trait;
use configs::ApiConfig;
use models::{CreateProductRequest, OrderPayload, OrderReceipt, Product, SignUpRequest, User};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, instrument};

use super::{AuthApi, Envelope, OrderApi, ProductApi, ProductListQuery, ProductListing};
use crate::errors::ServiceError;

/// JSON-over-HTTP client for the storefront backend.
#[derive(Clone)]
pub struct HttpApiClient {
    http: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    pub fn from_config(cfg: &ApiConfig) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(cfg.timeout())
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        Ok(Self::new(cfg.base_url.clone(), http))
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

    /// Unwrap `{ data }` from a 2xx response, or turn the backend's `message`
    /// into `ServiceError::Api`.
    async fn read_envelope<T: DeserializeOwned>(resp: Response) -> Result<Envelope<T>, ServiceError> {
        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(ServiceError::Api { status: status.as_u16(), message });
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl OrderApi for HttpApiClient {
    #[instrument(skip(self, payload), fields(lines = payload.items.len(), total = payload.total_amount))]
    async fn create_order(&self, payload: &OrderPayload) -> Result<OrderReceipt, ServiceError> {
        let resp = self.http.post(self.url("/api/v1/orders")).json(payload).send().await?;
        let envelope: Envelope<OrderReceipt> = Self::read_envelope(resp).await?;
        let receipt = envelope
            .data
            .ok_or_else(|| ServiceError::Serialization("order response without data".into()))?;
        info!(order_id = %receipt.id, "order_created");
        Ok(receipt)
    }
}

#[async_trait]
impl ProductApi for HttpApiClient {
    #[instrument(skip(self), fields(page = query.page, search = %query.search))]
    async fn list_products(&self, query: &ProductListQuery) -> Result<ProductListing, ServiceError> {
        let resp = self.http.get(self.url("/api/v1/products")).query(query).send().await?;
        let envelope: Envelope<Vec<models::Product>> = Self::read_envelope(resp).await?;
        let total_pages = envelope.pagination.and_then(|p| p.total_pages).unwrap_or(1);
        let products = envelope.data.unwrap_or_default();
        debug!(count = products.len(), total_pages, "products fetched");
        Ok(ProductListing { products, page: query.page, total_pages })
    }

    #[instrument(skip(self, request), fields(name = %request.product.name, created_by = %request.created_by))]
    async fn create_product(&self, request: &CreateProductRequest) -> Result<Option<Product>, ServiceError> {
        request.product.validate()?;
        let resp = self.http.post(self.url("/api/v1/products")).json(request).send().await?;
        let envelope: Envelope<Product> = Self::read_envelope(resp).await?;
        info!(name = %request.product.name, "product_created");
        Ok(envelope.data)
    }
}

#[async_trait]
impl AuthApi for HttpApiClient {
    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let body = json!({ "email": email, "password": password });
        let resp = self.http.post(self.url("/api/v1/auth/signin")).json(&body).send().await?;
        let envelope: Envelope<User> = Self::read_envelope(resp).await?;
        if let Some(message) = &envelope.message {
            debug!(%message, "signin response");
        }
        envelope
            .data
            .ok_or_else(|| ServiceError::Serialization("signin response without data".into()))
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ServiceError> {
        request.validate()?;
        let resp = self.http.post(self.url("/api/v1/auth/signup")).json(request).send().await?;
        let envelope: Envelope<serde_json::Value> = Self::read_envelope(resp).await?;
        info!(message = envelope.message.as_deref().unwrap_or(""), "account_created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slashes_are_trimmed() {
        let c = HttpApiClient::new("http://localhost:5000//", Client::new());
        assert_eq!(c.base_url(), "http://localhost:5000");
        assert_eq!(c.url("/api/v1/orders"), "http://localhost:5000/api/v1/orders");
    }

    #[test]
    fn from_config_uses_configured_base() -> Result<(), anyhow::Error> {
        let cfg = ApiConfig { base_url: "https://api.example.com".into(), timeout_secs: 3 };
        let c = HttpApiClient::from_config(&cfg)?;
        assert_eq!(c.base_url(), "https://api.example.com");
        Ok(())
    }
}
