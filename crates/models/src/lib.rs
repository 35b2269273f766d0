//! Domain types shared by the storefront: catalog products, cart lines,
//! orders and the signed-in user. Field names follow the backend's JSON.

pub mod cart;
pub mod errors;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{CartLine, PersistedCart};
pub use errors::ModelError;
pub use order::{CardType, DeliveryAddress, OrderLine, OrderPayload, OrderReceipt};
pub use product::{CreateProductRequest, NewProduct, Product, ProductDescriptor, PRODUCT_CATEGORIES};
pub use user::{Role, SignUpRequest, User};
