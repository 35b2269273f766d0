//! App-wide storefront context: session, cart and backend client in one place.

use std::sync::Arc;

use common::pagination::{Page, Pagination};
use configs::AppConfig;
use models::{NewProduct, OrderReceipt, Product, Role, SignUpRequest, User};
use tracing::{info, instrument, warn};

use crate::api::{AuthApi, OrderApi, ProductApi, ProductListQuery, ProductListing};
use crate::cart::CartStore;
use crate::catalog::{browse, CatalogQuery};
use crate::checkout::{CheckoutDraft, CheckoutService, CheckoutSummary, ShippingPolicy};
use crate::errors::ServiceError;
use crate::session::Session;
use crate::storage::KvStorage;

pub struct Storefront<A>
where
    A: OrderApi + ProductApi + AuthApi,
{
    api: Arc<A>,
    storage: Arc<dyn KvStorage>,
    cart_key: String,
    session: Session,
    cart: CartStore,
    checkout: CheckoutService<A>,
    per_page: u32,
}

impl<A> Storefront<A>
where
    A: OrderApi + ProductApi + AuthApi,
{
    pub async fn open(cfg: &AppConfig, storage: Arc<dyn KvStorage>, api: Arc<A>) -> Self {
        let cart_key = cfg.storage.cart_key.clone();
        let cart = CartStore::open(storage.clone(), cart_key.clone()).await;
        let checkout = CheckoutService::new(api.clone(), ShippingPolicy::from(&cfg.checkout));
        Self { api, storage, cart_key, session: Session::new(), cart, checkout, per_page: cfg.catalog.per_page }
    }

    pub fn session(&self) -> &Session { &self.session }

    pub fn cart(&self) -> &CartStore { &self.cart }

    pub fn cart_mut(&mut self) -> &mut CartStore { &mut self.cart }

    pub fn summary(&self) -> CheckoutSummary { self.checkout.summarize(self.cart.state()) }

    #[instrument(skip(self, password))]
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<&User, ServiceError> {
        self.session.set_loading(true);
        match self.api.sign_in(email, password).await {
            Ok(user) => {
                self.session.sign_in(user);
                self.session.user().ok_or_else(|| ServiceError::not_found("user"))
            }
            Err(e) => {
                warn!(error = %e, "sign in failed");
                self.session.set_loading(false);
                Err(e)
            }
        }
    }

    /// Register a retailer account; the shopper signs in afterwards.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ServiceError> {
        self.api.sign_up(request).await
    }

    /// Publish a product as the signed-in admin, who is recorded as its creator.
    pub async fn create_product(&self, product: NewProduct) -> Result<Option<Product>, ServiceError> {
        let admin = match self.session.user() {
            Some(user) if user.role == Role::Admin => user,
            _ => return Err(ServiceError::Validation("only a signed-in admin can create products".into())),
        };
        let created_by = admin.id.clone().ok_or_else(|| ServiceError::not_found("admin id"))?;
        let request = product.into_request(created_by)?;
        self.api.create_product(&request).await
    }

    /// Reset the session and restart the cart store. The stored cart record
    /// is left in place, so the reopened cart shows the same lines.
    pub async fn sign_out(&mut self) {
        self.session.sign_out();
        let previous = std::mem::take(&mut self.cart);
        previous.close().await;
        self.cart = CartStore::open(self.storage.clone(), self.cart_key.clone()).await;
        info!(key = %self.cart_key, "cart store restarted after sign out");
    }

    /// One page of the remote listing at the configured page size.
    pub async fn list_products(&self, page: u32, search: &str) -> Result<ProductListing, ServiceError> {
        let query = ProductListQuery { page: page.max(1), limit: self.per_page, search: search.to_string() };
        self.api.list_products(&query).await
    }

    /// Filter and page an already fetched listing.
    pub fn browse(&self, products: &[Product], query: &CatalogQuery, page: u32) -> Page<Product> {
        browse(products, query, Pagination::new(page, self.per_page))
    }

    pub async fn place_order(&mut self, draft: &CheckoutDraft) -> Result<OrderReceipt, ServiceError> {
        self.checkout.place_order(&mut self.cart, draft).await
    }

    /// Flush and stop the cart writer.
    pub async fn shutdown(self) {
        self.cart.close().await;
    }
}
