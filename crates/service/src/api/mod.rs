//! Backend REST contracts consumed by the storefront.
//!
//! The traits are the seams the checkout and catalog services depend on;
//! `client::HttpApiClient` implements all of them over `reqwest`.

pub mod client;

use async_trait::async_trait;
use models::{CreateProductRequest, OrderPayload, OrderReceipt, Product, SignUpRequest, User};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

pub use client::HttpApiClient;

/// Query string of `GET /api/v1/products`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
}

impl Default for ProductListQuery {
    fn default() -> Self { Self { page: 1, limit: 5, search: String::new() } }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProductListing {
    pub products: Vec<Product>,
    pub page: u32,
    pub total_pages: u32,
}

/// Standard response envelope: `{ data, message, pagination }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Envelope<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub pagination: Option<PaginationInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaginationInfo {
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn create_order(&self, payload: &OrderPayload) -> Result<OrderReceipt, ServiceError>;
}

#[async_trait]
pub trait ProductApi: Send + Sync {
    async fn list_products(&self, query: &ProductListQuery) -> Result<ProductListing, ServiceError>;
    /// Admin only. Returns the stored product when the backend echoes it.
    async fn create_product(&self, request: &CreateProductRequest) -> Result<Option<Product>, ServiceError>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ServiceError>;
    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ServiceError>;
}
