//! Checkout: totals with the shipping rule, the step-by-step flow and the
//! service that submits the order and clears the cart.

pub mod flow;
pub mod service;
pub mod summary;

pub use flow::{CheckoutDraft, CheckoutFlow, CheckoutStep};
pub use service::CheckoutService;
pub use summary::{CheckoutSummary, ShippingPolicy, SummaryLine};
