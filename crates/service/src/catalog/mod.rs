//! Product listing helpers: local filtering and paging, plus the stock check
//! the storefront performs before handing a product to the cart.

pub mod filter;

use models::Product;
use tracing::warn;

use crate::cart::{CartStore, Outcome};
use crate::errors::ServiceError;

pub use filter::{browse, categories, filter_products, CatalogQuery};

/// Add a listed product to the cart, refusing unavailable products up front.
/// The cart itself would silently ignore a zero-stock add.
pub fn add_product_to_cart(
    cart: &mut CartStore,
    product: &Product,
    variant: Option<&str>,
    quantity: i64,
) -> Result<Outcome, ServiceError> {
    if !product.is_available() {
        warn!(product_id = %product.id, "add to cart refused: out of stock");
        return Err(ServiceError::Validation(format!("{} is out of stock", product.name)));
    }
    let descriptor = product.to_descriptor(variant)?;
    Ok(cart.add_to_cart(descriptor, quantity))
}
