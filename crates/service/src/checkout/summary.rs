use configs::CheckoutConfig;
use serde::Serialize;

use crate::cart::CartState;

/// Flat shipping fee, waived strictly above a subtotal threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShippingPolicy {
    pub free_over: f64,
    pub flat_fee: f64,
}

impl Default for ShippingPolicy {
    fn default() -> Self { Self { free_over: 5000.0, flat_fee: 350.0 } }
}

impl From<&CheckoutConfig> for ShippingPolicy {
    fn from(cfg: &CheckoutConfig) -> Self {
        Self { free_over: cfg.free_shipping_over, flat_fee: cfg.flat_shipping_fee }
    }
}

impl ShippingPolicy {
    pub fn shipping_for(&self, subtotal: f64, empty: bool) -> f64 {
        if empty || subtotal > self.free_over { 0.0 } else { self.flat_fee }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    pub product_id: String,
    pub name: String,
    pub variant: Option<String>,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_total: f64,
}

/// Order totals as shown on the cart and checkout pages.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub lines: Vec<SummaryLine>,
    pub item_count: u64,
    pub subtotal: f64,
    pub shipping: f64,
    pub total: f64,
}

impl CheckoutSummary {
    pub fn from_cart(cart: &CartState, policy: &ShippingPolicy) -> Self {
        let lines = cart
            .items()
            .iter()
            .map(|line| SummaryLine {
                product_id: line.id().to_string(),
                name: line.product.name.clone(),
                variant: line.product.selected_variant.clone(),
                unit_price: line.product.unit_price(),
                quantity: line.quantity,
                line_total: line.line_total(),
            })
            .collect();
        let subtotal = cart.total_price();
        let shipping = policy.shipping_for(subtotal, cart.is_empty());
        Self { lines, item_count: cart.total_items(), subtotal, shipping, total: subtotal + shipping }
    }

    pub fn is_free_shipping(&self) -> bool { self.shipping == 0.0 }
}
