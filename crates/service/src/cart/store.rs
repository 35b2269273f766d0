use std::sync::Arc;

use models::{CartLine, ProductDescriptor};
use tracing::{debug, info};

use super::persist::{CartPersister, PersistHandle};
use super::reducer::{reduce, CartAction, CartState, Outcome};
use crate::storage::KvStorage;

/// The shopper's cart: owned state plus an optional persistence side effect.
///
/// Every mutation runs the pure reducer first, swaps in the new snapshot and
/// then queues it for the writer task. Nothing here returns an error; the
/// returned [`Outcome`] says what was applied, including any stock clamp.
pub struct CartStore {
    state: CartState,
    persist: Option<PersistHandle>,
}

impl CartStore {
    /// A cart that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self { state: CartState::new(), persist: None }
    }

    /// Rehydrate from `storage[key]` and keep persisting there.
    pub async fn open(storage: Arc<dyn KvStorage>, key: impl Into<String>) -> Self {
        let persister = CartPersister::new(storage, key);
        let state = CartState::from_persisted(persister.load().await);
        info!(key = %persister.key(), lines = state.items().len(), total_items = state.total_items(), "cart opened");
        Self { state, persist: Some(persister.spawn()) }
    }

    /// Add with the default quantity of one.
    pub fn add_one(&mut self, product: ProductDescriptor) -> Outcome {
        self.add_to_cart(product, 1)
    }

    pub fn add_to_cart(&mut self, product: ProductDescriptor, quantity: i64) -> Outcome {
        self.dispatch(CartAction::Add { product, quantity })
    }

    pub fn remove_from_cart(&mut self, product_id: &str) -> Outcome {
        self.dispatch(CartAction::Remove { product_id: product_id.to_string() })
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> Outcome {
        self.dispatch(CartAction::UpdateQuantity { product_id: product_id.to_string(), quantity })
    }

    pub fn clear_cart(&mut self) -> Outcome {
        self.dispatch(CartAction::Clear)
    }

    /// Flip the visibility flag and return the new value.
    pub fn toggle_cart(&mut self) -> bool {
        self.dispatch(CartAction::Toggle);
        self.state.is_open()
    }

    pub fn get_cart_item(&self, product_id: &str) -> Option<&CartLine> {
        self.state.get(product_id)
    }

    pub fn state(&self) -> &CartState { &self.state }

    pub fn items(&self) -> &[CartLine] { self.state.items() }

    pub fn total_items(&self) -> u64 { self.state.total_items() }

    pub fn total_price(&self) -> f64 { self.state.total_price() }

    pub fn is_open(&self) -> bool { self.state.is_open() }

    pub fn is_persistent(&self) -> bool { self.persist.is_some() }

    fn dispatch(&mut self, action: CartAction) -> Outcome {
        let (next, outcome) = reduce(&self.state, action);
        self.state = next;
        match &outcome {
            Outcome::Added { product_id, requested, quantity, clamped }
            | Outcome::Updated { product_id, requested, quantity, clamped } => {
                debug!(%product_id, requested, applied = quantity, clamped, "cart line set");
            }
            Outcome::Removed { product_id } => debug!(%product_id, "cart line removed"),
            Outcome::Cleared => debug!("cart cleared"),
            Outcome::Toggled { open } => debug!(open, "cart toggled"),
            Outcome::Unchanged => {}
        }
        if outcome.touches_items() {
            if let Some(persist) = &self.persist {
                persist.save(self.state.to_persisted());
            }
        }
        outcome
    }

    /// Wait for queued writes; a no-op for in-memory carts.
    pub async fn flush(&self) {
        if let Some(persist) = &self.persist {
            persist.flush().await;
        }
    }

    /// Tear down: flush pending writes and stop the writer task. The stored
    /// record is kept.
    pub async fn close(self) {
        if let Some(persist) = self.persist {
            persist.close().await;
        }
    }
}

impl Default for CartStore {
    fn default() -> Self { Self::in_memory() }
}
