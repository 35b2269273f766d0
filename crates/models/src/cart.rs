use serde::{Deserialize, Serialize};

use crate::product::ProductDescriptor;

/// One retained product in the cart.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: ProductDescriptor,
    pub quantity: u32,
}

impl CartLine {
    pub fn id(&self) -> &str { &self.product.id }

    pub fn stock(&self) -> u32 { self.product.stock }

    pub fn line_total(&self) -> f64 { self.product.unit_price() * self.quantity as f64 }
}

/// The record written to client-local storage. The cart's visibility flag is
/// deliberately not part of it.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCart {
    #[serde(default)]
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_price: f64,
}
