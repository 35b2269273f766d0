//! Service layer of the wholesale storefront.
//! - The cart store with its reducer and persistence adapter.
//! - Catalog helpers, checkout and the signed-in session.
//! - Backend REST client behind small async traits.

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod context;
pub mod errors;
pub mod file;
pub mod runtime;
pub mod session;
pub mod storage;

pub use cart::CartStore;
pub use context::Storefront;
pub use errors::ServiceError;
