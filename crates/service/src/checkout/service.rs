use std::sync::Arc;

use models::{OrderLine, OrderPayload, OrderReceipt};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::flow::{CheckoutDraft, CheckoutFlow};
use super::summary::{CheckoutSummary, ShippingPolicy};
use crate::api::OrderApi;
use crate::cart::{CartState, CartStore};
use crate::errors::ServiceError;

/// Turns the cart into an order on the backend. The backend is the authority;
/// the cart is only cleared once it has accepted the order.
pub struct CheckoutService<A: OrderApi> {
    api: Arc<A>,
    policy: ShippingPolicy,
}

impl<A: OrderApi> CheckoutService<A> {
    pub fn new(api: Arc<A>, policy: ShippingPolicy) -> Self { Self { api, policy } }

    pub fn summarize(&self, cart: &CartState) -> CheckoutSummary {
        CheckoutSummary::from_cart(cart, &self.policy)
    }

    pub fn build_payload(&self, cart: &CartState, draft: &CheckoutDraft) -> Result<OrderPayload, ServiceError> {
        if cart.is_empty() {
            return Err(ServiceError::Validation("cart is empty".into()));
        }
        draft.address.validate()?;
        let summary = self.summarize(cart);
        Ok(OrderPayload {
            items: cart.items().iter().map(OrderLine::from).collect(),
            shipping_address: draft.address.clone(),
            payment_method: draft.card_type,
            subtotal: summary.subtotal,
            shipping: summary.shipping,
            total_amount: summary.total,
            client_reference: Uuid::new_v4(),
        })
    }

    /// POST the order; clear the cart on success, leave it untouched on failure.
    #[instrument(skip_all, fields(lines = cart.items().len(), total_items = cart.total_items()))]
    pub async fn place_order(&self, cart: &mut CartStore, draft: &CheckoutDraft) -> Result<OrderReceipt, ServiceError> {
        let payload = self.build_payload(cart.state(), draft)?;
        match self.api.create_order(&payload).await {
            Ok(receipt) => {
                cart.clear_cart();
                info!(order_id = %receipt.id, total = payload.total_amount, reference = %payload.client_reference, "order_placed");
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, code = e.code(), "order placement failed; cart kept");
                Err(e)
            }
        }
    }

    /// Submit a flow that has reached the payment step.
    pub async fn submit(&self, flow: &mut CheckoutFlow, cart: &mut CartStore) -> Result<OrderReceipt, ServiceError> {
        let draft = flow
            .draft()
            .ok_or_else(|| ServiceError::Validation(format!("checkout is at the {} step", flow.step())))?;
        let receipt = self.place_order(cart, &draft).await?;
        flow.mark_placed(receipt.clone());
        Ok(receipt)
    }
}
